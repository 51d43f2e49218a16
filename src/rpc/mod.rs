//! Procedure server subsystem.
//!
//! # Data Flow
//! ```text
//! gRPC call (calc.Calculator/Add)
//!     → net (tracked TCP connection)
//!     → server.rs (tonic transport, graceful drain)
//!     → service.rs (checked addition)
//!     → AddReply
//! ```
//!
//! # Design Decisions
//! - The service is a unit struct: no shared mutable state, any number of
//!   concurrent calls
//! - Overflow is reported as INVALID_ARGUMENT instead of wrapping

pub mod server;
pub mod service;

/// Generated protobuf types and tonic stubs for `calc.Calculator`.
pub mod proto {
    tonic::include_proto!("calc");
}

pub use proto::calculator_client::CalculatorClient;
pub use proto::calculator_server::{Calculator, CalculatorServer};
pub use proto::{AddReply, AddRequest};
pub use server::{ProcedureServer, ServeError};
pub use service::{add, CalculatorService};
