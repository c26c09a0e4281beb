//! Event invocation entry point.
//!
//! # Responsibilities
//! - Run the full pipeline for one event: classify, build, serve, encode
//! - Enforce the invocation deadline
//! - Record per-invocation logs and metrics
//!
//! # Cancellation
//! The deadline is checked before the handler starts and raced against it in
//! [`EventAdapter::invoke_async`]. A synchronous handler cannot be preempted:
//! when the deadline fires first, its eventual output is discarded. Handlers
//! that want to stop early can poll [`Request::remaining_time`].

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use tracing::Instrument;

use crate::adapter::handler::{serve_captured, Handler};
use crate::canonical::{Request, RequestContext};
use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::event::{classify, Variant};
use crate::observability::metrics;
use crate::response::encode;

/// Per-invocation metadata from the hosting runtime.
pub type InvocationContext = RequestContext;

/// Translates trigger events to canonical requests for one wrapped handler.
///
/// Cheap to clone; the handler and configuration are shared read-only.
pub struct EventAdapter<H> {
    handler: Arc<H>,
    config: Arc<AdapterConfig>,
}

impl<H> Clone for EventAdapter<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: Handler> EventAdapter<H> {
    pub fn new(handler: H, config: AdapterConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Build an adapter around a handler that is also served elsewhere.
    pub fn from_shared(handler: Arc<H>, config: AdapterConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config.normalized()),
        }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Translate one raw event into wire response bytes.
    ///
    /// Runs the handler on the calling thread.
    pub fn invoke(&self, event: &[u8], context: &InvocationContext) -> Result<Vec<u8>, AdapterError> {
        let result = self.translate(event, context);
        record_outcome(&result);
        result.map(|encoded| encoded.bytes)
    }

    /// Run the pipeline inside the invocation span without recording metrics.
    fn translate(&self, event: &[u8], context: &InvocationContext) -> Result<Encoded, AdapterError> {
        let span = tracing::info_span!(
            "invocation",
            request_id = context.request_id.as_deref().unwrap_or("-"),
            variant = tracing::field::Empty,
        );
        let _entered = span.enter();

        let start = Instant::now();
        let event = classify(event)?;
        let variant = event.variant();
        span.record("variant", variant.name());

        let request = Request::from_event(event, &self.config, context.clone())?;
        tracing::debug!(
            variant = %variant,
            method = %request.method(),
            path = %request.path(),
            base_path_applied = request.base_path_applied(),
            "Dispatching request"
        );

        if let Some(deadline) = context.deadline {
            if Instant::now() >= deadline {
                return Err(AdapterError::DeadlineExceeded);
            }
        }

        let capture = serve_captured(self.handler.as_ref(), &request)?;
        let response = encode(capture, variant, &self.config);
        tracing::debug!(
            status = response.status_code,
            base64 = response.is_base64_encoded,
            "Response encoded"
        );

        Ok(Encoded {
            bytes: response.to_bytes()?,
            variant,
            status: response.status_code,
            start,
        })
    }

    /// Translate one event on the blocking pool, bounded by the context deadline.
    ///
    /// Metrics are recorded once the race is decided; output that arrives
    /// after the deadline is neither delivered nor counted.
    pub async fn invoke_async(
        &self,
        event: Bytes,
        context: InvocationContext,
    ) -> Result<Vec<u8>, AdapterError> {
        let deadline = context.deadline;
        let adapter = self.clone();
        let task = tokio::task::spawn_blocking(move || adapter.translate(&event, &context));

        let joined = match deadline {
            Some(deadline) => {
                let deadline = tokio::time::Instant::from_std(deadline);
                match tokio::time::timeout_at(deadline, task)
                    .instrument(tracing::debug_span!("deadline_wait"))
                    .await
                {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::warn!("Deadline reached before handler returned, discarding output");
                        let err = AdapterError::DeadlineExceeded;
                        metrics::record_rejected(err.error_type());
                        return Err(err);
                    }
                }
            }
            None => task.await,
        };

        let result = match joined {
            Ok(result) => result,
            Err(e) => Err(AdapterError::HandlerPanicked(e.to_string())),
        };
        record_outcome(&result);
        result.map(|encoded| encoded.bytes)
    }
}

/// An encoded response plus what the metrics need to know about it.
struct Encoded {
    bytes: Vec<u8>,
    variant: Variant,
    status: u16,
    start: Instant,
}

fn record_outcome(result: &Result<Encoded, AdapterError>) {
    match result {
        Ok(encoded) => metrics::record_invocation(encoded.variant.name(), encoded.status, encoded.start),
        Err(e) => {
            tracing::warn!(error = %e, "Invocation failed");
            metrics::record_rejected(e.error_type());
        }
    }
}
