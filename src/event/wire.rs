//! Typed wire shapes for the three trigger integrations.
//!
//! Events are decoded straight into one of three mutually exclusive request
//! structs. Maps keep the order in which keys appeared on the wire.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::event::variant::Variant;

type StringMap = IndexMap<String, String>;
type MultiStringMap = IndexMap<String, Vec<String>>;

/// API Gateway REST proxy request (payload v1).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestProxyRequest {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<StringMap>,
    #[serde(default)]
    pub multi_value_query_string_parameters: Option<MultiStringMap>,
    #[serde(default)]
    pub headers: Option<StringMap>,
    #[serde(default)]
    pub multi_value_headers: Option<MultiStringMap>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
    pub request_context: RestProxyContext,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestProxyContext {
    #[serde(default)]
    pub request_id: Option<String>,
}

/// API Gateway HTTP API request (payload v2).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiV2Request {
    pub raw_path: String,
    #[serde(default)]
    pub query_string_parameters: Option<StringMap>,
    #[serde(default)]
    pub headers: Option<StringMap>,
    #[serde(default)]
    pub cookies: Option<Vec<String>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
    pub request_context: HttpApiV2Context,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpApiV2Context {
    pub http: HttpDescription,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpDescription {
    pub method: String,
}

/// Application load balancer target group request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbTargetGroupRequest {
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub query_string_parameters: Option<StringMap>,
    #[serde(default)]
    pub multi_value_query_string_parameters: Option<MultiStringMap>,
    #[serde(default)]
    pub headers: Option<StringMap>,
    #[serde(default)]
    pub multi_value_headers: Option<MultiStringMap>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: Option<bool>,
}

/// A decoded event, tagged by integration.
#[derive(Debug, Clone)]
pub enum WireEvent {
    RestProxy(RestProxyRequest),
    HttpApiV2(HttpApiV2Request),
    AlbTargetGroup(AlbTargetGroupRequest),
}

/// Variant-neutral view of the request fields, before any rewriting.
#[derive(Debug, Clone, Default)]
pub struct EventParts {
    pub method: String,
    pub path: String,
    pub query: StringMap,
    pub multi_value_query: MultiStringMap,
    pub headers: StringMap,
    pub multi_value_headers: MultiStringMap,
    pub cookies: Vec<String>,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
    pub request_id: Option<String>,
}

impl WireEvent {
    pub fn variant(&self) -> Variant {
        match self {
            WireEvent::RestProxy(_) => Variant::RestProxy,
            WireEvent::HttpApiV2(_) => Variant::HttpApiV2,
            WireEvent::AlbTargetGroup(_) => Variant::AlbTargetGroup,
        }
    }

    pub fn into_parts(self) -> EventParts {
        match self {
            WireEvent::RestProxy(event) => EventParts {
                method: event.http_method,
                path: event.path,
                query: event.query_string_parameters.unwrap_or_default(),
                multi_value_query: event.multi_value_query_string_parameters.unwrap_or_default(),
                headers: event.headers.unwrap_or_default(),
                multi_value_headers: event.multi_value_headers.unwrap_or_default(),
                cookies: Vec::new(),
                body: event.body,
                is_base64_encoded: event.is_base64_encoded.unwrap_or(false),
                request_id: event.request_context.request_id,
            },
            WireEvent::HttpApiV2(event) => EventParts {
                method: event.request_context.http.method,
                path: event.raw_path,
                query: event.query_string_parameters.unwrap_or_default(),
                multi_value_query: IndexMap::new(),
                headers: event.headers.unwrap_or_default(),
                multi_value_headers: IndexMap::new(),
                cookies: event.cookies.unwrap_or_default(),
                body: event.body,
                is_base64_encoded: event.is_base64_encoded.unwrap_or(false),
                request_id: event.request_context.request_id,
            },
            WireEvent::AlbTargetGroup(event) => EventParts {
                method: event.http_method,
                path: event.path,
                query: event.query_string_parameters.unwrap_or_default(),
                multi_value_query: event.multi_value_query_string_parameters.unwrap_or_default(),
                headers: event.headers.unwrap_or_default(),
                multi_value_headers: event.multi_value_headers.unwrap_or_default(),
                cookies: Vec::new(),
                body: event.body,
                is_base64_encoded: event.is_base64_encoded.unwrap_or(false),
                request_id: None,
            },
        }
    }
}

/// Wire response; the same field set for every variant.
///
/// A header name appears in exactly one of `headers` and `multi_value_headers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireResponse {
    pub status_code: u16,
    /// Only emitted for the load balancer variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
    pub headers: StringMap,
    pub multi_value_headers: MultiStringMap,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl WireResponse {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
