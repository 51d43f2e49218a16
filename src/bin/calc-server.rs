//! calc-server: the `Add` procedure server.
//!
//! Serves `calc.Calculator` over gRPC until SIGINT/SIGTERM, then stops
//! accepting and drains in-flight calls within the configured deadline.

use std::path::PathBuf;

use clap::Parser;

use calc_gateway::config::{load_config, ConfigOverrides};
use calc_gateway::lifecycle::{signals, startup, Shutdown, StartupError};
use calc_gateway::observability::init_logging;

#[derive(Parser)]
#[command(name = "calc-server")]
#[command(about = "gRPC procedure server exposing Add", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "CALC_CONFIG")]
    config: Option<PathBuf>,

    /// gRPC listen address.
    #[arg(long, env = "CALC_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log filter (overridden by RUST_LOG).
    #[arg(long, env = "CALC_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), StartupError> {
    let args = Args::parse();
    let overrides = ConfigOverrides {
        listen_address: args.listen,
        log_level: args.log_level,
        ..Default::default()
    };
    let config = load_config(args.config.as_deref(), overrides)?;
    init_logging(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "calc-server starting");

    let shutdown = Shutdown::new();
    signals::trigger_on_signal(shutdown.clone());

    if let Err(e) = startup::run_procedure_server(&config, &shutdown).await {
        tracing::error!(error = %e, "calc-server failed");
        return Err(e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
