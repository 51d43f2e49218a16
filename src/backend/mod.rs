//! The front end's side of the shared connection.
//!
//! # Data Flow
//! ```text
//! Startup:  BackendConfig → connect() → readiness wait → BackendConnection
//! Request:  handler → BackendConnection::add → (one HTTP/2 channel) → procedure server
//! Shutdown: close() once → channel released when in-flight calls finish
//! ```
//!
//! # Design Decisions
//! - One channel per process, created before the HTTP app and injected into it
//! - Handles are cheap clones; no per-request connection
//! - Close is lock-free and idempotent: the client is swapped out exactly once

pub mod connection;

pub use connection::BackendConnection;
