//! Trigger event subsystem.
//!
//! # Data Flow
//! ```text
//! raw event bytes
//!     → classify.rs (JSON parse, probe requestContext markers)
//!     → variant.rs (static marker/field table, probe order elb → http → resourcePath)
//!     → wire.rs (typed decode into one of three request shapes)
//!     → WireEvent, handed to the canonical request builder
//! ```
//!
//! # Design Decisions
//! - Classification and field decoding happen once, at parse time
//! - A field with the wrong JSON type is `MalformedEvent`, never a panic
//! - Response shape is shared; only the ALB variant adds `statusDescription`

pub mod classify;
pub mod variant;
pub mod wire;

pub use classify::{classify, detect_variant};
pub use variant::{Variant, VariantSpec};
pub use wire::{EventParts, WireEvent, WireResponse};
