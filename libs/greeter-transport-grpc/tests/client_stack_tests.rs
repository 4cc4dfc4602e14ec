#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]

//! Integration tests for the gRPC client transport stack

use std::time::Duration;

use greeter_transport_grpc::client::{GrpcClientConfig, connect_with_stack};
use greeter_transport_grpc::server::{ListenConfig, ReadySignal, serve};
use tokio_util::sync::CancellationToken;
use tonic::service::RoutesBuilder;
use tonic::transport::Channel;

#[test]
fn default_config_is_sane() {
    let cfg = GrpcClientConfig::default();

    assert!(
        cfg.connect_timeout > Duration::from_millis(0),
        "connect_timeout should be positive"
    );
    assert_eq!(
        cfg.rpc_timeout,
        Duration::from_secs(2),
        "default call deadline is two seconds"
    );
    assert!(
        !cfg.service_name.is_empty(),
        "service_name should not be empty"
    );
    assert!(cfg.enable_tracing, "tracing should be enabled by default");
}

#[test]
fn config_cloning_works() {
    let cfg1 = GrpcClientConfig::new("service1").with_connect_timeout(Duration::from_secs(3));

    let cfg2 = cfg1.clone();

    assert_eq!(cfg1.service_name, cfg2.service_name);
    assert_eq!(cfg1.connect_timeout, cfg2.connect_timeout);
}

#[test]
fn config_has_debug_impl() {
    let cfg = GrpcClientConfig::default();
    let debug_str = format!("{cfg:?}");

    assert!(debug_str.contains("GrpcClientConfig"));
}

#[tokio::test]
async fn connect_rejects_invalid_uri() {
    let cfg = GrpcClientConfig::default();

    let result = connect_with_stack::<Channel>("not a uri", &cfg).await;
    assert!(result.is_err(), "Should fail with invalid URI");
}

#[tokio::test]
async fn connect_to_closed_port_fails_without_retry() {
    // Grab a free port and release it so nothing is listening there.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let cfg = GrpcClientConfig::new("test").with_connect_timeout(Duration::from_millis(500));

    let started = std::time::Instant::now();
    let result = connect_with_stack::<Channel>(format!("http://127.0.0.1:{port}"), &cfg).await;

    assert!(
        result.is_err(),
        "Should fail to connect to non-existent server"
    );
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "a refused dial should fail promptly"
    );
}

#[tokio::test]
async fn connect_to_running_server_succeeds() {
    let cancel = CancellationToken::new();
    let (ready, rx) = ReadySignal::channel();
    let listen: ListenConfig = "127.0.0.1:0".parse().unwrap();

    let server = tokio::spawn(serve(
        listen,
        RoutesBuilder::default().routes(),
        cancel.clone(),
        ready,
    ));
    let endpoint = rx.await.expect("server should report its endpoint");

    let cfg = GrpcClientConfig::new("test").with_connect_timeout(Duration::from_secs(1));
    let channel = connect_with_stack::<Channel>(endpoint, &cfg).await;
    assert!(channel.is_ok(), "dial should succeed: {:?}", channel.as_ref().err());
    drop(channel);

    cancel.cancel();
    server.await.unwrap().unwrap();
}
