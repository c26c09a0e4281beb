//! Response subsystem.
//!
//! # Data Flow
//! ```text
//! handler writes
//!     → capture.rs (status commit state machine, header multi-map, body buffer)
//! handler returns
//!     → encode.rs::finalize (sniff.rs Content-Type, Content-Length)
//!     → encode.rs::encode (base64 decision, header folding)
//!     → WireResponse (event mode) / axum Response (socket mode)
//! ```
//!
//! # Design Decisions
//! - Responses are fully buffered; the wire formats have no streaming
//! - Only the numeric status locks at commit; headers stay mutable
//! - Binary detection is a literal prefix match on the final Content-Type

pub mod capture;
pub mod encode;
pub mod sniff;

pub use capture::ResponseCapture;
pub use encode::{encode, finalize, fold_headers, is_binary, FinalizedResponse};
pub use sniff::detect_content_type;
