//! calc-gateway: an `Add` procedure server and the web front end that
//! proxies to it over one shared connection.

pub mod backend;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod rpc;

pub use backend::BackendConnection;
pub use config::CalcConfig;
pub use error::CalcError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use rpc::ProcedureServer;
