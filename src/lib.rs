//! Hybrid HTTP gateway library.
//!
//! Runs one synchronous "serve a request, write a response" handler either
//! behind a listening socket or behind serverless HTTP triggers (REST proxy,
//! HTTP API v2, ALB target group), translating each trigger's wire format to
//! a canonical request and the handler's output back to the matching wire
//! response.

pub mod adapter;
pub mod canonical;
pub mod config;
pub mod error;
pub mod event;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod response;
pub mod runtime;

pub use adapter::{EventAdapter, Handler, InvocationContext};
pub use canonical::{MultiMap, Request};
pub use config::{AdapterConfig, GatewayConfig};
pub use error::AdapterError;
pub use event::Variant;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use response::ResponseCapture;
