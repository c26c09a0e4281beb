//! Canonical request construction.
//!
//! # Responsibilities
//! - Build a format-neutral request from a decoded wire event
//! - Build the same request from a live HTTP request (socket mode)
//! - Apply the base-path rewrite, then percent-decode the path
//! - Merge single and multi-value query parameters and headers
//! - Decode base64 bodies
//!
//! # Design Decisions
//! - The rewritten path is always absolute; an empty result becomes `/`
//! - Paths are decoded the same way for every source, so a handler sees `/a b` whether
//!   the gateway sent `/a b` or `/a%20b`
//! - The prefix only matches on a segment boundary, so `/api` never eats `/apiary`
//! - Multi-value request headers stay distinct unless joining is configured

use std::io::Cursor;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{request::Parts, Method};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::percent_decode_str;

use crate::canonical::multimap::MultiMap;
use crate::config::AdapterConfig;
use crate::error::AdapterError;
use crate::event::wire::WireEvent;

/// Per-invocation metadata supplied by the hosting runtime.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Runtime or gateway request identifier.
    pub request_id: Option<String>,
    /// Point after which the caller stops waiting for a response.
    pub deadline: Option<Instant>,
}

/// Format-neutral HTTP request handed to the wrapped handler.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: MultiMap,
    headers: MultiMap,
    body: Bytes,
    base_path_applied: bool,
    context: RequestContext,
}

impl Request {
    /// Build a request from a classified wire event.
    pub fn from_event(
        event: WireEvent,
        config: &AdapterConfig,
        mut context: RequestContext,
    ) -> Result<Self, AdapterError> {
        let spec = event.variant().spec();
        let parts = event.into_parts();

        let method = parse_method(&parts.method)
            .map_err(|msg| AdapterError::InvalidRequest(format!("{}: {}", spec.method_field, msg)))?;
        let (path, base_path_applied) = rewrite_path(&parts.path, &config.base_path);
        let path = decode_path(&path)
            .map_err(|msg| AdapterError::InvalidRequest(format!("{}: {}", spec.path_field, msg)))?;

        let mut query = MultiMap::query();
        for (key, value) in parts.query {
            query.add(key, value);
        }
        for (key, values) in parts.multi_value_query {
            for value in values {
                query.add(key.clone(), value);
            }
        }

        let mut headers = MultiMap::headers();
        for (name, value) in parts.headers {
            headers.add(name, value);
        }
        for (name, values) in parts.multi_value_headers {
            if config.join_multi_value_headers {
                headers.add(name, values.join(","));
            } else {
                for value in values {
                    headers.add(name.clone(), value);
                }
            }
        }
        if !parts.cookies.is_empty() {
            headers.add("Cookie", parts.cookies.join("; "));
        }

        let body = match parts.body {
            Some(body) if parts.is_base64_encoded => STANDARD
                .decode(body.as_bytes())
                .map(Bytes::from)
                .map_err(|e| AdapterError::MalformedEvent(format!("body is not valid base64: {}", e)))?,
            Some(body) => Bytes::from(body),
            None => Bytes::new(),
        };

        if context.request_id.is_none() {
            context.request_id = parts.request_id;
        }

        Ok(Self {
            method,
            path,
            query,
            headers,
            body,
            base_path_applied,
            context,
        })
    }

    /// Build a request from a live HTTP request received in socket mode.
    pub fn from_http(
        parts: &Parts,
        body: Bytes,
        config: &AdapterConfig,
        context: RequestContext,
    ) -> Result<Self, AdapterError> {
        let (path, base_path_applied) = rewrite_path(parts.uri.path(), &config.base_path);
        let path = decode_path(&path).map_err(|msg| AdapterError::InvalidRequest(format!("path: {}", msg)))?;

        let mut query = MultiMap::query();
        if let Some(raw) = parts.uri.query() {
            for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
                query.add(key, value);
            }
        }

        let mut headers = MultiMap::headers();
        for (name, value) in parts.headers.iter() {
            headers.add(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }

        Ok(Self {
            method: parts.method.clone(),
            path,
            query,
            headers,
            body,
            base_path_applied,
            context,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute path after base-path rewriting.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &MultiMap {
        &self.query
    }

    pub fn headers(&self) -> &MultiMap {
        &self.headers
    }

    /// Fully buffered body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as a readable stream.
    pub fn body_reader(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.body[..])
    }

    /// True when the configured base path was stripped from the incoming path.
    pub fn base_path_applied(&self) -> bool {
        self.base_path_applied
    }

    pub fn request_id(&self) -> Option<&str> {
        self.context.request_id.as_deref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.context.deadline
    }

    /// Time left before the deadline, or `None` when no deadline applies.
    pub fn remaining_time(&self) -> Option<Duration> {
        self.context
            .deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Query parameters re-encoded as `application/x-www-form-urlencoded`.
    pub fn query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.pairs())
            .finish()
    }

    /// Path plus query string, as it would appear in a request line.
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }
}

fn parse_method(method: &str) -> Result<Method, String> {
    if method.is_empty() {
        return Err("method is empty".to_string());
    }
    Method::from_bytes(method.as_bytes()).map_err(|_| format!("'{}' is not a valid method", method))
}

/// Percent-decode a request path.
///
/// Every `%` must start a two-digit hex escape and the decoded bytes must be
/// UTF-8 without control characters.
fn decode_path(path: &str) -> Result<String, String> {
    let bytes = path.as_bytes();
    for (idx, _) in path.match_indices('%') {
        let escape_ok = bytes
            .get(idx + 1..idx + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !escape_ok {
            return Err(format!("invalid percent escape at byte {}", idx));
        }
    }

    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| "path is not valid UTF-8 once decoded".to_string())?;
    if decoded.chars().any(|c| c.is_control()) {
        return Err("path contains control characters".to_string());
    }
    Ok(decoded.into_owned())
}

/// Strip `base_path` from `path` once, on a segment boundary.
///
/// Returns the rewritten absolute path and whether the prefix was removed.
/// `base_path` is expected in normalized form (see [`AdapterConfig::normalized`]).
pub fn rewrite_path(path: &str, base_path: &str) -> (String, bool) {
    if !base_path.is_empty() {
        if let Some(rest) = path.strip_prefix(base_path) {
            if rest.is_empty() {
                return ("/".to_string(), true);
            }
            if rest.starts_with('/') {
                return (rest.to_string(), true);
            }
        }
    }

    if path.starts_with('/') {
        (path.to_string(), false)
    } else {
        (format!("/{}", path), false)
    }
}
