//! Shared harness for integration tests: a real procedure server on an
//! ephemeral port and a front end wired to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use calc_gateway::config::{BackendConfig, ServerConfig, WebConfig};
use calc_gateway::net::ConnectionTracker;
use calc_gateway::rpc::{AddReply, AddRequest, Calculator, CalculatorServer, ServeError};
use calc_gateway::{BackendConnection, HttpServer, ProcedureServer, Shutdown};

/// A running procedure server.
pub struct ProcedureHandle {
    pub addr: SocketAddr,
    pub connections: ConnectionTracker,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), ServeError>>,
}

impl ProcedureHandle {
    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig {
            target: self.addr.to_string(),
            ready_timeout_secs: 5,
            connect_timeout_secs: 2,
            call_timeout_secs: 5,
        }
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) -> Result<(), ServeError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.task)
            .await
            .expect("procedure server did not stop in time")
            .expect("procedure server task panicked")
    }
}

/// Start a procedure server on 127.0.0.1 with a short drain deadline.
pub async fn start_procedure_server() -> ProcedureHandle {
    start_procedure_server_at("127.0.0.1:0").await
}

/// Start a procedure server on a specific address.
pub async fn start_procedure_server_at(listen_address: &str) -> ProcedureHandle {
    let config = ServerConfig {
        listen_address: listen_address.to_string(),
        drain_timeout_secs: 2,
    };
    let server = ProcedureServer::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let connections = server.connections();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move { server.run(server_shutdown).await });

    ProcedureHandle {
        addr,
        connections,
        shutdown,
        task,
    }
}

/// A running front end.
pub struct FrontEndHandle {
    pub addr: SocketAddr,
    pub connection: BackendConnection,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

impl FrontEndHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Stop the HTTP server, then close the shared connection.
    ///
    /// Returns what `close` reported.
    pub async fn stop(self) -> bool {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(10), self.task)
            .await
            .expect("front end did not stop in time")
            .expect("front end task panicked")
            .expect("front end returned an error");
        self.connection.close()
    }
}

/// Connect to `procedure` and serve the front end on an ephemeral port.
pub async fn start_front_end(procedure: &ProcedureHandle) -> FrontEndHandle {
    let connection = BackendConnection::connect(&procedure.backend_config())
        .await
        .expect("procedure server should be reachable");
    start_front_end_with(connection, WebConfig::default()).await
}

/// Serve the front end over `connection` on an ephemeral port.
pub async fn start_front_end_with(connection: BackendConnection, config: WebConfig) -> FrontEndHandle {
    let config = WebConfig {
        bind_address: "127.0.0.1:0".to_string(),
        ..config
    };
    let listener = TcpListener::bind(&config.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, connection.clone());
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    FrontEndHandle {
        addr,
        connection,
        shutdown,
        task,
    }
}

/// A loopback address nothing is listening on right now.
pub fn free_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// `calc.Calculator` that answers correctly, but only after `delay`.
pub struct SlowCalculator {
    pub delay: Duration,
}

#[tonic::async_trait]
impl Calculator for SlowCalculator {
    async fn add(&self, request: Request<AddRequest>) -> Result<Response<AddReply>, Status> {
        tokio::time::sleep(self.delay).await;
        let AddRequest { a, b } = request.into_inner();
        Ok(Response::new(AddReply { sum: a + b }))
    }
}

/// Serve a [`SlowCalculator`] on an ephemeral port.
pub async fn start_slow_procedure_server(delay: Duration) -> (SocketAddr, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        let _ = tonic::transport::Server::builder()
            .add_service(CalculatorServer::new(SlowCalculator { delay }))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await;
    });
    (addr, task)
}

/// Backend settings pointing at `addr`.
pub fn backend_config_for(addr: SocketAddr, call_timeout_secs: u64) -> BackendConfig {
    BackendConfig {
        target: addr.to_string(),
        ready_timeout_secs: 5,
        connect_timeout_secs: 2,
        call_timeout_secs,
    }
}

/// An HTTP client that bypasses any system proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
