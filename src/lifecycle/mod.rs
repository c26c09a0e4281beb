//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Detect mode → Start metrics → Run socket server or event loop
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting / polling → Drain → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{detect_mode, run, Mode, StartupError};
