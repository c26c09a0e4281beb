//! Adapter error types.
//!
//! Every failure on the invocation path is surfaced as an [`AdapterError`].
//! Nothing is partially processed: when one of these is returned, no canonical
//! request reached the handler or no wire response was produced.

use thiserror::Error;

/// Errors produced while translating between wire events and canonical HTTP.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The event is not valid JSON, or a field has the wrong JSON type.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// No known integration marker was found under `requestContext`.
    #[error("unsupported integration, supported integrations are: ALB, API Gateway REST, API Gateway HTTP")]
    UnsupportedIntegration,

    /// The event decoded cleanly but does not describe a valid HTTP request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The invocation deadline passed before the handler produced a response.
    #[error("invocation deadline exceeded")]
    DeadlineExceeded,

    /// The wrapped handler panicked.
    #[error("handler panicked: {0}")]
    HandlerPanicked(String),

    /// The wire response could not be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AdapterError {
    /// Stable name reported to the invocation runtime as the error type.
    pub fn error_type(&self) -> &'static str {
        match self {
            AdapterError::MalformedEvent(_) => "MalformedEvent",
            AdapterError::UnsupportedIntegration => "UnsupportedIntegration",
            AdapterError::InvalidRequest(_) => "InvalidRequest",
            AdapterError::DeadlineExceeded => "DeadlineExceeded",
            AdapterError::HandlerPanicked(_) => "HandlerPanicked",
            AdapterError::Encode(_) => "EncodeError",
        }
    }
}
