//! Adapter subsystem: the invocation entry point.
//!
//! # Data Flow
//! ```text
//! raw event bytes + InvocationContext
//!     → event::classify (variant + typed fields)
//!     → canonical::Request::from_event (base path, query/header merge, body)
//!     → handler.rs (Handler::serve with a fresh ResponseCapture, panics caught)
//!     → response::encode (finalize, base64, header folding)
//!     → wire response bytes
//! ```
//!
//! # Design Decisions
//! - One event in, one response out; nothing is shared between invocations
//!   except the read-only handler and configuration
//! - Any failure aborts the invocation before a response is built

pub mod handler;
pub mod invoke;

pub use handler::{serve_captured, Handler};
pub use invoke::{EventAdapter, InvocationContext};
