//! Network layer subsystem.
//!
//! Socket mode only. Event mode never opens a listener.
//!
//! # Data Flow
//! ```text
//! config.listener.tls
//!     → tls.rs (PEM certificate and key → rustls config)
//!     → http::server (axum-server TLS acceptor)
//! ```

pub mod tls;
