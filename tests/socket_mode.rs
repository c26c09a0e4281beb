//! Socket-mode hosting: the same handler behind a plain HTTP listener.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode};
use tower::ServiceExt;

use hybrid_gateway::config::TlsConfig;
use hybrid_gateway::{GatewayConfig, HttpServer, Request, ResponseCapture, Shutdown};

fn echo(request: &Request, response: &mut ResponseCapture) {
    match request.path() {
        "/status" => response.set_status(418),
        "/tags" => {
            response.headers_mut().add("X-Tag", "one");
            response.headers_mut().add("X-Tag", "two");
            response.write_body(b"tagged");
        }
        "/panic" => panic!("socket panic"),
        path => {
            let q = request.query().get("q").unwrap_or("-").to_string();
            let id = request.request_id().unwrap_or("-").to_string();
            response.headers_mut().set("X-Seen-Id", id);
            response.write_body(format!("{} {} q={} body={}", request.method(), path, q, request.body().len()).as_bytes());
        }
    }
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn routes_every_request_to_handler() {
    let server = HttpServer::new(Arc::new(echo), GatewayConfig::default());

    let response = server
        .router()
        .oneshot(
            HttpRequest::builder()
                .method("POST")
                .uri("/things?q=rust")
                .body(Body::from("abc"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/plain; charset=utf-8");
    assert_eq!(response.headers()["content-length"], "26");
    assert_eq!(body_string(response).await, "POST /things q=rust body=3");
}

#[tokio::test]
async fn request_id_is_generated_and_echoed() {
    let server = HttpServer::new(Arc::new(echo), GatewayConfig::default());

    let response = server
        .router()
        .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!generated.is_empty());
    assert_eq!(response.headers()["x-seen-id"], generated.as_str());

    let response = server
        .router()
        .oneshot(
            HttpRequest::builder()
                .uri("/")
                .header("x-request-id", "caller-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "caller-id");
    assert_eq!(response.headers()["x-seen-id"], "caller-id");
}

#[tokio::test]
async fn status_and_repeated_headers_pass_through() {
    let server = HttpServer::new(Arc::new(echo), GatewayConfig::default());

    let response = server
        .router()
        .oneshot(HttpRequest::builder().uri("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 418);
    assert_eq!(response.headers()["content-length"], "0");

    let response = server
        .router()
        .oneshot(HttpRequest::builder().uri("/tags").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let tags: Vec<_> = response.headers().get_all("x-tag").iter().collect();
    assert_eq!(tags, vec!["one", "two"]);
}

#[tokio::test]
async fn base_path_is_stripped() {
    let mut config = GatewayConfig::default();
    config.adapter.base_path = "/api".into();
    let server = HttpServer::new(Arc::new(echo), config);

    let response = server
        .router()
        .oneshot(HttpRequest::builder().uri("/api/things").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "GET /things q=- body=0");
}

#[tokio::test]
async fn panic_becomes_500() {
    let server = HttpServer::new(Arc::new(echo), GatewayConfig::default());

    let response = server
        .router()
        .oneshot(HttpRequest::builder().uri("/panic").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut config = GatewayConfig::default();
    config.listener.max_body_bytes = 4;
    let server = HttpServer::new(Arc::new(echo), config);

    let response = server
        .router()
        .oneshot(
            HttpRequest::builder()
                .method("POST")
                .uri("/")
                .body(Body::from("too large"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn serves_over_tcp_until_shutdown() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(Arc::new(echo), GatewayConfig::default());
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client
        .get(format!("http://{}/hello?q=x", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "GET /hello q=x body=0");
    drop(client);

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn encoded_paths_are_decoded_and_bad_escapes_rejected() {
    let server = HttpServer::new(Arc::new(echo), GatewayConfig::default());

    let response = server
        .router()
        .oneshot(HttpRequest::builder().uri("/my%20resource").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_string(response).await, "GET /my resource q=- body=0");

    let response = server
        .router()
        .oneshot(HttpRequest::builder().uri("/a%zz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tls_with_missing_certificate_fails_to_start() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

    let mut config = GatewayConfig::default();
    config.listener.tls = Some(TlsConfig {
        cert_path: "/no/such/cert.pem".into(),
        key_path: "/no/such/key.pem".into(),
    });
    let server = HttpServer::new(Arc::new(echo), config);

    let shutdown = Shutdown::new();
    let err = server.run(listener, shutdown.subscribe()).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}
