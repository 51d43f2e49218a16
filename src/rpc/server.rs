//! Procedure server: tonic transport with graceful drain.
//!
//! # Responsibilities
//! - Bind the listening endpoint
//! - Serve `calc.Calculator` until the shutdown signal fires
//! - Stop accepting, let in-flight calls finish, enforce the drain deadline

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::{broadcast, oneshot};
use tonic::transport::Server;

use crate::config::ServerConfig;
use crate::net::{ConnectionTracker, Listener, ListenerError};
use crate::rpc::proto::calculator_server::CalculatorServer;
use crate::rpc::service::CalculatorService;

/// Error returned while serving.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}

/// A bound, not yet running procedure server.
pub struct ProcedureServer {
    listener: Listener,
    drain_timeout: Option<Duration>,
}

impl ProcedureServer {
    /// Bind the configured listen address.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ListenerError> {
        let listener = Listener::bind(&config.listen_address).await?;
        let drain_timeout = match config.drain_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(Self {
            listener,
            drain_timeout,
        })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Connection counters for this server.
    pub fn connections(&self) -> ConnectionTracker {
        self.listener.tracker()
    }

    /// Serve until `shutdown` fires, then drain.
    ///
    /// Returns once every connection has finished, or once the drain
    /// deadline has elapsed. Past the deadline this stops waiting: connection
    /// tasks still running are left to the runtime and end when it shuts down.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) -> Result<(), ServeError> {
        let tracker = self.listener.tracker();
        if let Ok(addr) = self.listener.local_addr() {
            tracing::info!(address = %addr, "Starting gRPC server");
        }

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let serve = Server::builder()
            .add_service(CalculatorServer::new(CalculatorService))
            .serve_with_incoming_shutdown(self.listener.into_incoming(), async {
                let _ = stop_rx.await;
            });
        tokio::pin!(serve);

        tokio::select! {
            result = &mut serve => {
                result?;
                tracing::info!("gRPC server stopped");
                return Ok(());
            }
            _ = shutdown.recv() => {}
        }

        tracing::info!(
            open_connections = tracker.active_count(),
            drain_timeout = ?self.drain_timeout,
            "Draining in-flight calls"
        );
        let _ = stop_tx.send(());

        match self.drain_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, &mut serve).await {
                Ok(result) => result?,
                Err(_) => {
                    tracing::warn!(
                        open_connections = tracker.active_count(),
                        "Drain deadline elapsed, abandoning open connections"
                    );
                }
            },
            None => serve.await?,
        }

        tracing::info!(
            accepted_connections = tracker.accepted_count(),
            "gRPC server stopped"
        );
        Ok(())
    }
}
