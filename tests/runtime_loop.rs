//! Event mode against an in-process runtime API.

use std::time::Duration;

use serde_json::json;

use hybrid_gateway::runtime::{EventLoop, RuntimeClient};
use hybrid_gateway::{AdapterConfig, EventAdapter, Request, ResponseCapture, Shutdown};

mod common;

use common::{start_mock_runtime, to_bytes, Outcome};

fn demo(request: &Request, response: &mut ResponseCapture) {
    match request.path() {
        "/panic" => panic!("runtime panic"),
        "/slow" => {
            std::thread::sleep(Duration::from_millis(500));
            response.write_body(b"late");
        }
        path => {
            response.headers_mut().set("X-Request-Id", request.request_id().unwrap_or("-"));
            response.write_body(path.as_bytes());
        }
    }
}

#[tokio::test]
async fn answers_events_in_order() {
    let mut runtime = start_mock_runtime(
        vec![
            ("id-1".into(), to_bytes(&common::rest_event("GET", "/api/one"))),
            ("id-2".into(), to_bytes(&common::alb_event("GET", "/api/two"))),
        ],
        Duration::from_secs(30),
    )
    .await;

    let shutdown = Shutdown::new();
    let adapter = EventAdapter::new(demo, AdapterConfig::default().with_base_path("/api"));
    let event_loop = EventLoop::new(RuntimeClient::new(&runtime.addr.to_string()), adapter);
    let handle = tokio::spawn(event_loop.run(shutdown.subscribe()));

    match runtime.next_outcome().await {
        Outcome::Response { request_id, body } => {
            assert_eq!(request_id, "id-1");
            assert_eq!(body["statusCode"], 200);
            assert_eq!(body["body"], "/one");
            assert_eq!(body["headers"]["X-Request-Id"], "id-1");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    match runtime.next_outcome().await {
        Outcome::Response { request_id, body } => {
            assert_eq!(request_id, "id-2");
            assert_eq!(body["body"], "/two");
            assert_eq!(body["statusDescription"], "200 OK");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("event loop did not stop");
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn failures_are_reported_and_loop_continues() {
    let mut runtime = start_mock_runtime(
        vec![
            ("bad".into(), to_bytes(&json!({ "path": "/" }))),
            ("boom".into(), to_bytes(&common::http_v2_event("GET", "/panic"))),
            ("ok".into(), to_bytes(&common::http_v2_event("GET", "/fine"))),
        ],
        Duration::from_secs(30),
    )
    .await;

    let shutdown = Shutdown::new();
    let adapter = EventAdapter::new(demo, AdapterConfig::default());
    let event_loop = EventLoop::new(RuntimeClient::new(&runtime.addr.to_string()), adapter);
    let handle = tokio::spawn(event_loop.run(shutdown.subscribe()));

    match runtime.next_outcome().await {
        Outcome::Error {
            request_id,
            error_type,
            body,
        } => {
            assert_eq!(request_id, "bad");
            assert_eq!(error_type.as_deref(), Some("Unhandled"));
            assert_eq!(body["errorType"], "UnsupportedIntegration");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    match runtime.next_outcome().await {
        Outcome::Error { request_id, body, .. } => {
            assert_eq!(request_id, "boom");
            assert_eq!(body["errorType"], "HandlerPanicked");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    match runtime.next_outcome().await {
        Outcome::Response { request_id, body } => {
            assert_eq!(request_id, "ok");
            assert_eq!(body["body"], "/fine");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    shutdown.trigger();
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
}

#[tokio::test]
async fn deadline_from_runtime_is_enforced() {
    let mut runtime = start_mock_runtime(
        vec![("slow".into(), to_bytes(&common::rest_event("GET", "/slow")))],
        Duration::from_millis(100),
    )
    .await;

    let shutdown = Shutdown::new();
    let adapter = EventAdapter::new(demo, AdapterConfig::default());
    let event_loop = EventLoop::new(RuntimeClient::new(&runtime.addr.to_string()), adapter);
    let handle = tokio::spawn(event_loop.run(shutdown.subscribe()));

    match runtime.next_outcome().await {
        Outcome::Error { request_id, body, .. } => {
            assert_eq!(request_id, "slow");
            assert_eq!(body["errorType"], "DeadlineExceeded");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    shutdown.trigger();
    let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
}
