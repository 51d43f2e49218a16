//! Network layer for the procedure server.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept stream)
//!     → connection.rs (tracking guard attached to the stream)
//!     → Hand off to the gRPC server
//! ```
//!
//! # Design Decisions
//! - Every accepted connection is counted for shutdown reporting
//! - The guard travels with the stream, so the count drops when the
//!   transport closes the connection, however it ends

pub mod connection;
pub mod listener;

pub use connection::{ConnectionGuard, ConnectionId, ConnectionTracker, TrackedStream};
pub use listener::{Listener, ListenerError};
