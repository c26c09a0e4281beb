//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use hybrid_gateway::{Request, ResponseCapture};

/// Minimal REST proxy event.
pub fn rest_event(method: &str, path: &str) -> Value {
    json!({
        "httpMethod": method,
        "path": path,
        "requestContext": { "resourcePath": path, "requestId": "rest-req-1" }
    })
}

/// Minimal HTTP API v2 event.
pub fn http_v2_event(method: &str, path: &str) -> Value {
    json!({
        "rawPath": path,
        "requestContext": { "http": { "method": method }, "requestId": "v2-req-1" }
    })
}

/// Minimal ALB target group event.
pub fn alb_event(method: &str, path: &str) -> Value {
    json!({
        "httpMethod": method,
        "path": path,
        "requestContext": { "elb": { "targetGroupArn": "arn:aws:elasticloadbalancing:tg" } }
    })
}

/// Every variant's minimal event for the same request line.
pub fn all_variants(method: &str, path: &str) -> Vec<(&'static str, Value)> {
    vec![
        ("rest_proxy", rest_event(method, path)),
        ("http_api_v2", http_v2_event(method, path)),
        ("alb_target_group", alb_event(method, path)),
    ]
}

pub fn to_bytes(event: &Value) -> Vec<u8> {
    serde_json::to_vec(event).unwrap()
}

/// What a [`recording_handler`] saw on its last call.
#[derive(Debug, Clone, Default)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub base_path_applied: bool,
    pub request_id: Option<String>,
}

/// Handler that records the request it receives and answers 204.
pub fn recording_handler() -> (
    impl Fn(&Request, &mut ResponseCapture) + Send + Sync + 'static,
    Arc<Mutex<Option<Seen>>>,
) {
    let slot = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&slot);
    let handler = move |request: &Request, response: &mut ResponseCapture| {
        let seen = Seen {
            method: request.method().to_string(),
            path: request.path().to_string(),
            query: request
                .query()
                .pairs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: request
                .headers()
                .pairs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: request.body().to_vec(),
            base_path_applied: request.base_path_applied(),
            request_id: request.request_id().map(str::to_string),
        };
        *sink.lock().unwrap() = Some(seen);
        response.set_status(204);
    };
    (handler, slot)
}

/// An outcome the mock runtime received for one invocation.
#[derive(Debug, Clone)]
pub enum Outcome {
    Response { request_id: String, body: Value },
    Error { request_id: String, error_type: Option<String>, body: Value },
}

#[derive(Clone)]
struct RuntimeState {
    queue: Arc<Mutex<VecDeque<(String, Vec<u8>)>>>,
    outcomes: mpsc::UnboundedSender<Outcome>,
    deadline_ms: u64,
}

/// In-process stand-in for the serverless runtime API.
pub struct MockRuntime {
    pub addr: SocketAddr,
    pub outcomes: mpsc::UnboundedReceiver<Outcome>,
}

impl MockRuntime {
    pub async fn next_outcome(&mut self) -> Outcome {
        tokio::time::timeout(Duration::from_secs(5), self.outcomes.recv())
            .await
            .expect("runtime outcome timed out")
            .expect("runtime outcome channel closed")
    }
}

/// Serve `events` (request id, payload) in order; once drained, `next` long-polls forever.
pub async fn start_mock_runtime(events: Vec<(String, Vec<u8>)>, budget: Duration) -> MockRuntime {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let (tx, rx) = mpsc::unbounded_channel();
    let state = RuntimeState {
        queue: Arc::new(Mutex::new(events.into_iter().collect())),
        outcomes: tx,
        deadline_ms: now_ms + budget.as_millis() as u64,
    };

    let app = Router::new()
        .route("/2018-06-01/runtime/invocation/next", get(next_invocation))
        .route("/2018-06-01/runtime/invocation/{id}/response", post(post_response))
        .route("/2018-06-01/runtime/invocation/{id}/error", post(post_error))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockRuntime { addr, outcomes: rx }
}

async fn next_invocation(State(state): State<RuntimeState>) -> Response {
    let next = state.queue.lock().unwrap().pop_front();
    let Some((request_id, payload)) = next else {
        return std::future::pending().await;
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        "Lambda-Runtime-Aws-Request-Id",
        HeaderValue::from_str(&request_id).unwrap(),
    );
    headers.insert(
        "Lambda-Runtime-Deadline-Ms",
        HeaderValue::from_str(&state.deadline_ms.to_string()).unwrap(),
    );
    (StatusCode::OK, headers, payload).into_response()
}

async fn post_response(
    State(state): State<RuntimeState>,
    Path(request_id): Path<String>,
    body: Bytes,
) -> StatusCode {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let _ = state.outcomes.send(Outcome::Response { request_id, body });
    StatusCode::ACCEPTED
}

async fn post_error(
    State(state): State<RuntimeState>,
    Path(request_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let error_type = headers
        .get("Lambda-Runtime-Function-Error-Type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let _ = state.outcomes.send(Outcome::Error {
        request_id,
        error_type,
        body,
    });
    StatusCode::ACCEPTED
}
