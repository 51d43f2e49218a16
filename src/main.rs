//! calc-web: front end for the `Add` procedure server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                ┌──────────────────────── calc-web ────────────────────────┐
//!     ───────────────────────┼─▶ GET /        → static page                             │
//!     ───────────────────────┼─▶ POST /api/add → coerce a, b ─▶ BackendConnection ──────┼──▶ calc-server
//!     ◀──────────────────────┼── {"sum": n} / {"error": ...} ◀─ (one HTTP/2 channel) ◀──┼───
//!                            └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The connection is established and readiness-checked before the HTTP
//! listener is bound; startup aborts with a non-zero exit if it fails.

use std::path::PathBuf;

use clap::Parser;

use calc_gateway::config::{load_config, ConfigOverrides};
use calc_gateway::lifecycle::{signals, startup, Shutdown, StartupError};
use calc_gateway::observability::init_logging;

#[derive(Parser)]
#[command(name = "calc-web")]
#[command(about = "Web front end proxying to the Add procedure server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "CALC_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP bind address.
    #[arg(long, env = "CALC_WEB_ADDR")]
    bind: Option<String>,

    /// Procedure server address.
    #[arg(long, env = "CALC_BACKEND_TARGET")]
    backend: Option<String>,

    /// Log filter (overridden by RUST_LOG).
    #[arg(long, env = "CALC_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), StartupError> {
    let args = Args::parse();
    let overrides = ConfigOverrides {
        web_bind_address: args.bind,
        backend_target: args.backend,
        log_level: args.log_level,
        ..Default::default()
    };
    let config = load_config(args.config.as_deref(), overrides)?;
    init_logging(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "calc-web starting");

    let shutdown = Shutdown::new();
    signals::trigger_on_signal(shutdown.clone());

    if let Err(e) = startup::run_front_end(&config, &shutdown).await {
        tracing::error!(error = %e, "calc-web failed");
        return Err(e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
