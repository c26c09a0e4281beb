//! Canonical request model.
//!
//! # Data Flow
//! ```text
//! WireEvent (event mode)          axum request parts + body (socket mode)
//!     → request.rs (method, base-path rewrite, query/header merge, body decode)
//!     → Request, handed to the wrapped handler
//! ```

pub mod multimap;
pub mod request;

pub use multimap::MultiMap;
pub use request::{rewrite_path, Request, RequestContext};
