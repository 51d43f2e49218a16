//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for aggregation)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows from the HTTP layer into procedure server logs
//! - `RUST_LOG` always wins over the configured level

pub mod logging;

pub use logging::init_logging;
