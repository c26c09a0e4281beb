//! Startup orchestration.
//!
//! # Responsibilities
//! - Decide between socket mode and event mode
//! - Start the metrics exporter when enabled
//! - Run the chosen host until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The same handler instance backs either mode

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::adapter::{EventAdapter, Handler};
use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::observability::metrics;
use crate::runtime::{EventLoop, RuntimeClient, RuntimeError};

/// Environment variable the serverless runtime sets to its API address.
pub const RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

/// How the handler is hosted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Listen on a socket and serve HTTP directly.
    Socket,
    /// Pull trigger events from the runtime API at the given address.
    Events { api_address: String },
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("listener error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error("event mode requested but no runtime API address is configured or set in AWS_LAMBDA_RUNTIME_API")]
    NoRuntimeApi,
}

/// Pick the hosting mode: a configured or advertised runtime API means event mode.
pub fn detect_mode(config: &GatewayConfig) -> Mode {
    let env_address = std::env::var(RUNTIME_API_ENV).ok();
    select_mode(config.runtime.api_address.clone(), env_address)
}

fn select_mode(configured: Option<String>, env: Option<String>) -> Mode {
    match configured.or(env).filter(|addr| !addr.is_empty()) {
        Some(api_address) => Mode::Events { api_address },
        None => Mode::Socket,
    }
}

/// Resolve event mode explicitly, failing when no runtime API address is known.
pub fn require_events_mode(config: &GatewayConfig) -> Result<Mode, StartupError> {
    match detect_mode(config) {
        Mode::Socket => Err(StartupError::NoRuntimeApi),
        events => Ok(events),
    }
}

/// Host `handler` in `mode` until `shutdown` fires.
pub async fn run<H: Handler>(
    handler: H,
    config: GatewayConfig,
    mode: Mode,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let handler = Arc::new(handler);

    match mode {
        Mode::Socket => {
            let listener = TcpListener::bind(config.listener.bind_address.as_str()).await?;
            tracing::info!(
                address = %listener.local_addr()?,
                base_path = %config.adapter.base_path,
                "Starting in socket mode"
            );
            HttpServer::new(handler, config)
                .run(listener, shutdown.subscribe())
                .await?;
        }
        Mode::Events { api_address } => {
            tracing::info!(
                runtime_api = %api_address,
                base_path = %config.adapter.base_path,
                "Starting in event mode"
            );
            let adapter = EventAdapter::from_shared(handler, config.adapter);
            EventLoop::new(RuntimeClient::new(&api_address), adapter)
                .run(shutdown.subscribe())
                .await?;
        }
    }

    Ok(())
}
