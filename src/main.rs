//! Hybrid HTTP gateway.
//!
//! Hosts a demo handler either on a listening socket or behind serverless
//! HTTP triggers, depending on the environment.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────────┐
//!                     │                      HYBRID GATEWAY                        │
//!                     │                                                            │
//!   Trigger event     │  ┌──────────┐   ┌──────────┐   ┌───────────┐               │
//!   ──────────────────┼─▶│ runtime  │──▶│  event   │──▶│ canonical │──┐            │
//!                     │  │  client  │   │ classify │   │  request  │  │            │
//!                     │  └──────────┘   └──────────┘   └───────────┘  │            │
//!                     │                                               ▼            │
//!   HTTP request      │  ┌──────────┐                 ┌──────────────────┐         │
//!   ──────────────────┼─▶│   http   │────────────────▶│ Handler::serve   │         │
//!                     │  │  server  │                 │ + ResponseCapture│         │
//!                     │  └──────────┘                 └────────┬─────────┘         │
//!                     │       ▲                                │                   │
//!                     │       │        ┌──────────────┐        │                   │
//!                     │       └────────│   response   │◀───────┘                   │
//!                     │                │ finalize /   │──────▶ wire response       │
//!                     │                │ encode       │        to runtime          │
//!                     │                └──────────────┘                            │
//!                     └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use hybrid_gateway::config::{load_config, GatewayConfig};
use hybrid_gateway::lifecycle::signals::forward_signals;
use hybrid_gateway::lifecycle::startup::{detect_mode, require_events_mode, run, Mode};
use hybrid_gateway::lifecycle::Shutdown;
use hybrid_gateway::observability::logging::init_logging;
use hybrid_gateway::{Request, ResponseCapture};

#[derive(Parser)]
#[command(name = "hybrid-gateway")]
#[command(about = "Serve one HTTP handler on a socket or behind serverless triggers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hosting mode; `auto` picks event mode when a runtime API is advertised.
    #[arg(short, long, value_enum, default_value_t = ModeArg::Auto)]
    mode: ModeArg,

    /// Override the configured base path.
    #[arg(long)]
    base_path: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Auto,
    Socket,
    Events,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(base_path) = cli.base_path {
        config.adapter.base_path = base_path;
    }
    config.adapter = config.adapter.normalized();

    init_logging(&config.observability);
    tracing::info!("hybrid-gateway v0.1.0 starting");

    let mode = match cli.mode {
        ModeArg::Auto => detect_mode(&config),
        ModeArg::Socket => Mode::Socket,
        ModeArg::Events => require_events_mode(&config)?,
    };

    let shutdown = Shutdown::new();
    tokio::spawn(forward_signals(shutdown.clone()));

    run(demo, config, mode, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Demo routes: `/`, `/header`, `/json`, `/error`, `/panic`.
fn demo(request: &Request, response: &mut ResponseCapture) {
    match request.path() {
        "/" => {
            response.set_status(200);
            response.write_body(b"hello\n");
        }
        "/header" => {
            let values = request.headers().get_all("X-Custom").join(",");
            response.write_body(values.as_bytes());
        }
        "/json" => {
            response.headers_mut().set("Content-Type", "application/json");
            let body = serde_json::json!({ "name": "alice cooper", "age": 25 });
            if let Err(e) = serde_json::to_writer(&mut *response, &body) {
                tracing::error!(error = %e, "Failed to write JSON body");
            }
            response.write_body(b"\n");
        }
        "/error" => response.set_status(500),
        "/panic" => panic!("panic route"),
        _ => {
            response.set_status(404);
            response.write_body(b"not found\n");
        }
    }
}
