//! Front-end HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Browser
//!     → server.rs (Axum router, middleware: request ID, trace, timeout, body limit)
//!     → page.rs   (GET /: static page)
//!     → api.rs    (POST /api/add: coerce input → shared connection → JSON)
//!     → response.rs (errors as JSON bodies with mapped status codes)
//! ```

pub mod api;
pub mod page;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
