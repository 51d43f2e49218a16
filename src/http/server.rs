//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the page and API handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Serve on a listener until the shutdown signal fires

use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::{DefaultBodyLimit, Request},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::backend::BackendConnection;
use crate::config::WebConfig;
use crate::http::api::add_handler;
use crate::http::page::index;
use crate::http::request::{request_id, MakeRequestUuid};
use crate::http::response::handle_middleware_error;
use crate::lifecycle::shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one connection to the procedure server.
    pub connection: BackendConnection,
}

/// HTTP server for the front end.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create the server around an already established connection.
    pub fn new(config: WebConfig, connection: BackendConnection) -> Self {
        let state = AppState { connection };
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &WebConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                let id = request_id(request.headers()).unwrap_or("-");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %id,
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(Duration::from_secs(config.request_timeout_secs));

        Router::new()
            .route("/", get(index))
            .route("/api/add", post(add_handler))
            .layer(DefaultBodyLimit::max(config.max_body_size))
            .with_state(state)
            .layer(middleware)
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// After `shutdown` fires the listener stops accepting and in-flight
    /// requests are allowed to finish before this returns.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
