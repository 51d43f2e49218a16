//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind listeners and establish the procedure server connection
//! - Run each service until shutdown, then release what startup acquired
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The front end connects before it binds, so traffic only arrives once
//!   the downstream connection is ready

use tokio::net::TcpListener;
use tracing_subscriber::util::TryInitError;

use crate::backend::BackendConnection;
use crate::config::{CalcConfig, ConfigError};
use crate::error::CalcError;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::net::ListenerError;
use crate::rpc::{ProcedureServer, ServeError};

/// Anything that stops a service from starting or from running to completion.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("logging: {0}")]
    Logging(#[from] TryInitError),

    #[error("procedure server listener: {0}")]
    Listener(#[from] ListenerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    #[error("procedure server connection: {0}")]
    Connect(#[source] CalcError),

    #[error("procedure server: {0}")]
    Serve(#[from] ServeError),

    #[error("HTTP server: {0}")]
    Http(#[source] std::io::Error),
}

/// Bind and run the procedure server until `shutdown` fires and draining ends.
pub async fn run_procedure_server(
    config: &CalcConfig,
    shutdown: &Shutdown,
) -> Result<(), StartupError> {
    tracing::info!(
        listen_address = %config.server.listen_address,
        drain_timeout_secs = config.server.drain_timeout_secs,
        "Configuration loaded"
    );

    let shutdown_rx = shutdown.subscribe();
    let server = ProcedureServer::bind(&config.server).await?;
    server.run(shutdown_rx).await?;
    Ok(())
}

/// Connect to the procedure server, then serve HTTP until `shutdown` fires.
///
/// The shared connection is closed exactly once before this returns,
/// whichever way the server stops.
pub async fn run_front_end(config: &CalcConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    tracing::info!(
        bind_address = %config.web.bind_address,
        backend = %config.backend.target,
        request_timeout_secs = config.web.request_timeout_secs,
        "Configuration loaded"
    );

    let shutdown_rx = shutdown.subscribe();
    let connection = BackendConnection::connect(&config.backend)
        .await
        .map_err(StartupError::Connect)?;

    let listener = match TcpListener::bind(&config.web.bind_address).await {
        Ok(listener) => listener,
        Err(source) => {
            connection.close();
            return Err(StartupError::Bind {
                address: config.web.bind_address.clone(),
                source,
            });
        }
    };

    let server = HttpServer::new(config.web.clone(), connection.clone());
    let result = server.run(listener, shutdown_rx).await;

    connection.close();
    result.map_err(StartupError::Http)
}
