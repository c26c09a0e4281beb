//! Response finalization and wire encoding.
//!
//! # Responsibilities
//! - Fill in `Content-Type` (sniffed) and `Content-Length` when the handler left them unset
//! - Decide between literal text and base64 bodies
//! - Fold headers into single-value and multi-value groups
//! - Produce the variant's wire response

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indexmap::IndexMap;

use crate::canonical::MultiMap;
use crate::config::AdapterConfig;
use crate::event::variant::Variant;
use crate::event::wire::WireResponse;
use crate::response::capture::ResponseCapture;
use crate::response::sniff::detect_content_type;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";

/// A captured response with its derived headers filled in.
#[derive(Debug)]
pub struct FinalizedResponse {
    pub status: u16,
    pub headers: MultiMap,
    pub body: Vec<u8>,
}

impl FinalizedResponse {
    pub fn content_type(&self) -> &str {
        self.headers.get(CONTENT_TYPE).unwrap_or_default()
    }
}

/// Apply the Content-Type and Content-Length defaults to a finished capture.
pub fn finalize(capture: ResponseCapture) -> FinalizedResponse {
    let (status, mut headers, body) = capture.into_parts();

    if !headers.contains(CONTENT_TYPE) {
        headers.set(CONTENT_TYPE, detect_content_type(&body));
    }
    if !headers.contains(CONTENT_LENGTH) {
        headers.set(CONTENT_LENGTH, body.len().to_string());
    }

    FinalizedResponse {
        status,
        headers,
        body,
    }
}

/// True when `content_type` starts with any configured binary prefix.
pub fn is_binary(content_type: &str, binary_prefixes: &[String]) -> bool {
    binary_prefixes
        .iter()
        .any(|prefix| content_type.starts_with(prefix.as_str()))
}

/// Split headers by value count: one value → single map, two or more → multi map.
pub fn fold_headers(headers: &MultiMap) -> (IndexMap<String, String>, IndexMap<String, Vec<String>>) {
    let mut single = IndexMap::new();
    let mut multi = IndexMap::new();

    for (name, values) in headers.iter() {
        match values {
            [] => {}
            [value] => {
                single.insert(name.to_string(), value.clone());
            }
            _ => {
                multi.insert(name.to_string(), values.to_vec());
            }
        }
    }

    (single, multi)
}

/// Encode a finished capture into the wire response for `variant`.
pub fn encode(capture: ResponseCapture, variant: Variant, config: &AdapterConfig) -> WireResponse {
    let response = finalize(capture);
    let binary = is_binary(response.content_type(), &config.binary_content_types);

    let body = if binary {
        STANDARD.encode(&response.body)
    } else {
        String::from_utf8_lossy(&response.body).into_owned()
    };

    let status_description = variant.spec().status_description.then(|| {
        match StatusCode::from_u16(response.status)
            .ok()
            .and_then(|code| code.canonical_reason())
        {
            Some(reason) => format!("{} {}", response.status, reason),
            None => response.status.to_string(),
        }
    });

    let (headers, multi_value_headers) = fold_headers(&response.headers);

    WireResponse {
        status_code: response.status,
        status_description,
        headers,
        multi_value_headers,
        body,
        is_base64_encoded: binary,
    }
}
