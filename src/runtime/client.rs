//! Client for the serverless invocation runtime API.
//!
//! # Endpoints
//! - `GET  /2018-06-01/runtime/invocation/next`            long-poll the next event
//! - `POST /2018-06-01/runtime/invocation/{id}/response`   deliver the wire response
//! - `POST /2018-06-01/runtime/invocation/{id}/error`      report a failed invocation

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use axum::body::Bytes;
use reqwest::header::HeaderMap;
use serde::Serialize;
use thiserror::Error;

use crate::error::AdapterError;

const API_VERSION: &str = "2018-06-01";
pub const REQUEST_ID_HEADER: &str = "Lambda-Runtime-Aws-Request-Id";
pub const DEADLINE_HEADER: &str = "Lambda-Runtime-Deadline-Ms";
const ERROR_TYPE_HEADER: &str = "Lambda-Runtime-Function-Error-Type";

/// Errors talking to the runtime API.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("runtime API response missing header {0}")]
    MissingHeader(&'static str),

    #[error("runtime API returned status {status} for {endpoint}")]
    Status { endpoint: &'static str, status: u16 },
}

/// One event handed out by the runtime.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub request_id: String,
    pub deadline: Option<Instant>,
    pub payload: Bytes,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorReport<'a> {
    error_message: String,
    error_type: &'a str,
}

/// HTTP client bound to one runtime API address.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    client: reqwest::Client,
    base_url: String,
}

impl RuntimeClient {
    /// `api_address` is the bare `host:port` the runtime advertises.
    pub fn new(api_address: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{}/{}/runtime", api_address, API_VERSION),
        }
    }

    /// Block until the runtime hands out the next event.
    pub async fn next_invocation(&self) -> Result<Invocation, RuntimeError> {
        let res = self
            .client
            .get(format!("{}/invocation/next", self.base_url))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(RuntimeError::Status {
                endpoint: "invocation/next",
                status: res.status().as_u16(),
            });
        }

        let request_id = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(RuntimeError::MissingHeader(REQUEST_ID_HEADER))?;
        let deadline = parse_deadline(res.headers());
        let payload = res.bytes().await?;

        Ok(Invocation {
            request_id,
            deadline,
            payload,
        })
    }

    /// Deliver a successful wire response.
    pub async fn send_response(&self, request_id: &str, body: Vec<u8>) -> Result<(), RuntimeError> {
        let res = self
            .client
            .post(format!("{}/invocation/{}/response", self.base_url, request_id))
            .body(body)
            .send()
            .await?;
        check_accepted(res.status(), "invocation/response")
    }

    /// Report a failed invocation.
    pub async fn send_error(&self, request_id: &str, error: &AdapterError) -> Result<(), RuntimeError> {
        let report = ErrorReport {
            error_message: error.to_string(),
            error_type: error.error_type(),
        };
        let res = self
            .client
            .post(format!("{}/invocation/{}/error", self.base_url, request_id))
            .header(ERROR_TYPE_HEADER, "Unhandled")
            .json(&report)
            .send()
            .await?;
        check_accepted(res.status(), "invocation/error")
    }
}

fn check_accepted(status: reqwest::StatusCode, endpoint: &'static str) -> Result<(), RuntimeError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RuntimeError::Status {
            endpoint,
            status: status.as_u16(),
        })
    }
}

/// Convert the epoch-millisecond deadline header into a local `Instant`.
fn parse_deadline(headers: &HeaderMap) -> Option<Instant> {
    let deadline_ms: u64 = headers.get(DEADLINE_HEADER)?.to_str().ok()?.parse().ok()?;
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()?
        .as_millis() as u64;
    Some(Instant::now() + Duration::from_millis(deadline_ms.saturating_sub(now_ms)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn deadline_in_future() {
        let now_ms = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as u64;
        let mut headers = HeaderMap::new();
        headers.insert(
            DEADLINE_HEADER,
            HeaderValue::from_str(&(now_ms + 5_000).to_string()).unwrap(),
        );

        let deadline = parse_deadline(&headers).unwrap();
        let remaining = deadline.saturating_duration_since(Instant::now());
        assert!(remaining > Duration::from_secs(3));
        assert!(remaining <= Duration::from_secs(5));
    }

    #[test]
    fn past_deadline_is_now() {
        let mut headers = HeaderMap::new();
        headers.insert(DEADLINE_HEADER, HeaderValue::from_static("1000"));
        let deadline = parse_deadline(&headers).unwrap();
        assert!(deadline <= Instant::now());
    }

    #[test]
    fn garbage_deadline_is_ignored() {
        let mut headers = HeaderMap::new();
        assert!(parse_deadline(&headers).is_none());
        headers.insert(DEADLINE_HEADER, HeaderValue::from_static("soon"));
        assert!(parse_deadline(&headers).is_none());
    }

    #[test]
    fn error_report_shape() {
        let report = ErrorReport {
            error_message: AdapterError::UnsupportedIntegration.to_string(),
            error_type: AdapterError::UnsupportedIntegration.error_type(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["errorType"], "UnsupportedIntegration");
        assert!(json["errorMessage"].as_str().unwrap().starts_with("unsupported integration"));
    }
}
