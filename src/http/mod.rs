//! HTTP protocol handling subsystem (socket mode).
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and echoed)
//!     → canonical::Request::from_http (base path, query, headers, body)
//!     → Handler::serve on the blocking pool
//!     → response::finalize → axum Response
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{into_http_response, HttpServer};
