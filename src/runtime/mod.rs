//! Invocation runtime subsystem (event mode).
//!
//! # Data Flow
//! ```text
//! runtime API
//!     → client.rs (long-poll next event, request id, deadline)
//!     → event_loop.rs (one invocation at a time)
//!     → adapter::EventAdapter::invoke_async (bounded by the deadline)
//!     → client.rs (post response or error report)
//! ```
//!
//! # Design Decisions
//! - No retries here; the runtime owns redelivery
//! - The runtime API address comes from config or `AWS_LAMBDA_RUNTIME_API`

pub mod client;
pub mod event_loop;

pub use client::{Invocation, RuntimeClient, RuntimeError};
pub use event_loop::EventLoop;
