//! Metrics accounting for event invocations.
//!
//! Installs the process-wide Prometheus recorder, so it lives in its own test binary.

use std::time::{Duration, Instant};

use axum::body::Bytes;
use metrics_exporter_prometheus::PrometheusBuilder;

use hybrid_gateway::{AdapterConfig, AdapterError, EventAdapter, InvocationContext, Request, ResponseCapture};

mod common;

#[tokio::test]
async fn late_handler_is_counted_once_as_rejected() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("recorder already installed");

    let adapter = EventAdapter::new(
        |_: &Request, response: &mut ResponseCapture| {
            std::thread::sleep(Duration::from_millis(200));
            response.write_body(b"late");
        },
        AdapterConfig::default(),
    );
    let context = InvocationContext {
        request_id: Some("late-1".into()),
        deadline: Some(Instant::now() + Duration::from_millis(50)),
    };

    let err = adapter
        .invoke_async(Bytes::from(common::to_bytes(&common::rest_event("GET", "/"))), context)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::DeadlineExceeded));

    // Let the detached handler finish before reading the counters.
    tokio::time::sleep(Duration::from_millis(400)).await;

    let rendered = handle.render();
    assert!(
        rendered.contains(r#"gateway_rejected_events_total{kind="DeadlineExceeded"} 1"#),
        "{rendered}"
    );
    assert!(!rendered.contains("gateway_invocations_total"), "{rendered}");
}
