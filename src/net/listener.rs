//! TCP listener for the procedure server.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Turn accepted sockets into a stream of tracked connections

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_stream::{Stream, StreamExt};

use crate::net::connection::{ConnectionTracker, TrackedStream};

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// The configured address is not a socket address.
    Address(String),
    /// Failed to bind to address.
    Bind(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Address(addr) => write!(f, "Invalid listen address: {}", addr),
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// A bound TCP listener whose connections are counted.
pub struct Listener {
    inner: TcpListener,
    tracker: ConnectionTracker,
}

impl Listener {
    /// Bind to `address` (e.g., "0.0.0.0:50051" or "127.0.0.1:0").
    pub async fn bind(address: &str) -> Result<Self, ListenerError> {
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| ListenerError::Address(address.to_string()))?;

        let listener = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self {
            inner: listener,
            tracker: ConnectionTracker::new(),
        })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Tracker shared with every connection this listener accepts.
    pub fn tracker(&self) -> ConnectionTracker {
        self.tracker.clone()
    }

    /// Consume the listener into a stream of accepted, tracked connections.
    pub fn into_incoming(self) -> impl Stream<Item = std::io::Result<TrackedStream>> {
        let tracker = self.tracker;
        TcpListenerStream::new(self.inner).map(move |accepted| {
            accepted.map(|stream| {
                let guard = tracker.track();
                tracing::debug!(
                    connection_id = %guard.id(),
                    peer_addr = ?stream.peer_addr().ok(),
                    active = tracker.active_count(),
                    "Connection accepted"
                );
                TrackedStream::new(stream, guard)
            })
        })
    }
}
