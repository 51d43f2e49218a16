//! The procedure server spoken to directly over gRPC.

use std::time::Duration;

use tonic::Code;

use calc_gateway::rpc::{AddRequest, CalculatorClient};

mod common;

#[tokio::test]
async fn add_over_grpc() {
    let procedure = common::start_procedure_server().await;
    let mut client = CalculatorClient::connect(format!("http://{}", procedure.addr))
        .await
        .unwrap();

    for (a, b) in [(1, 2), (-7, 7), (i64::MIN, i64::MAX)] {
        let reply = client.add(AddRequest { a, b }).await.unwrap();
        assert_eq!(reply.into_inner().sum, a + b);
    }

    drop(client);
    procedure.stop().await.unwrap();
}

#[tokio::test]
async fn overflow_is_invalid_argument() {
    let procedure = common::start_procedure_server().await;
    let mut client = CalculatorClient::connect(format!("http://{}", procedure.addr))
        .await
        .unwrap();

    let status = client
        .add(AddRequest { a: i64::MAX, b: 1 })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::InvalidArgument);

    drop(client);
    procedure.stop().await.unwrap();
}

#[tokio::test]
async fn stops_after_shutdown_signal() {
    let procedure = common::start_procedure_server().await;
    let addr = procedure.addr;

    // An open client connection must not keep the server alive past the drain deadline.
    let mut client = CalculatorClient::connect(format!("http://{}", addr))
        .await
        .unwrap();
    client.add(AddRequest { a: 1, b: 1 }).await.unwrap();

    let stopped = tokio::time::timeout(Duration::from_secs(5), procedure.stop()).await;
    assert!(matches!(stopped, Ok(Ok(()))));

    let refused = tokio::net::TcpStream::connect(addr).await;
    assert!(refused.is_err(), "listener should be closed after shutdown");
}

#[tokio::test]
async fn silent_connection_does_not_outlive_drain_deadline() {
    let procedure = common::start_procedure_server().await;

    // Never speaks HTTP/2, so nothing can finish it gracefully.
    let _silent = tokio::net::TcpStream::connect(procedure.addr).await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), async {
        while procedure.connections.accepted_count() == 0 {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("connection was never accepted");

    let started = std::time::Instant::now();
    let stopped = tokio::time::timeout(Duration::from_secs(5), procedure.stop()).await;
    assert!(matches!(stopped, Ok(Ok(()))));
    assert!(started.elapsed() < Duration::from_secs(4), "took {:?}", started.elapsed());
}
