#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the greeter-client binary

use std::process::{Output, Stdio};
use std::time::Duration;

use greeter::GreeterModule;
use greeter_bootstrap::ServerConfig;
use greeter_sdk::{GreeterService, GreeterServiceServer, SayHelloRequest, SayHelloResponse};
use greeter_transport_grpc::server::{ListenConfig, ReadySignal, serve};
use tokio_util::sync::CancellationToken;
use tonic::service::RoutesBuilder;
use tonic::{Request, Response, Status};

async fn run_greeter_client(args: &[&str]) -> Output {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_greeter-client"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .expect("Failed to execute greeter-client")
}

async fn start_greeter() -> (String, CancellationToken) {
    let cfg = ServerConfig {
        listen_addr: "127.0.0.1:0".to_owned(),
        reflection: true,
    };
    let cancel = CancellationToken::new();
    let (ready, rx) = ReadySignal::channel();
    let token = cancel.clone();
    tokio::spawn(async move { GreeterModule::new().serve(&cfg, token, ready).await });
    (rx.await.unwrap(), cancel)
}

#[derive(Clone, Default)]
struct SlowGreeter;

#[tonic::async_trait]
impl GreeterService for SlowGreeter {
    async fn say_hello(
        &self,
        _request: Request<SayHelloRequest>,
    ) -> Result<Response<SayHelloResponse>, Status> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(Response::new(SayHelloResponse {
            message: "too late".to_owned(),
        }))
    }
}

async fn start_slow_greeter() -> (String, CancellationToken) {
    let mut routes = RoutesBuilder::default();
    routes.add_service(GreeterServiceServer::new(SlowGreeter));
    let cancel = CancellationToken::new();
    let (ready, rx) = ReadySignal::channel();
    let listen: ListenConfig = "127.0.0.1:0".parse().unwrap();
    tokio::spawn(serve(listen, routes.routes(), cancel.clone(), ready));
    (rx.await.unwrap(), cancel)
}

fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn help_lists_overrides() {
    let output = run_greeter_client(&["--help"]).await;
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--endpoint"));
    assert!(stdout.contains("--name"));
    assert!(stdout.contains("--timeout"));
}

#[tokio::test]
async fn greets_world_by_default() {
    let (endpoint, cancel) = start_greeter().await;

    let output = run_greeter_client(&["--endpoint", &endpoint]).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(
        stderr.contains("SayHello response: Hello, World!"),
        "stderr: {stderr}"
    );
    cancel.cancel();
}

#[tokio::test]
async fn name_flag_is_sent() {
    let (endpoint, cancel) = start_greeter().await;

    let output = run_greeter_client(&["--endpoint", &endpoint, "--name", "Dave"]).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(
        stderr.contains("SayHello response: Hello, Dave!"),
        "stderr: {stderr}"
    );
    cancel.cancel();
}

#[tokio::test]
async fn unreachable_server_fails_with_dial_error() {
    let endpoint = format!("http://127.0.0.1:{}", free_port());

    let output = run_greeter_client(&["--endpoint", &endpoint, "--connect-timeout", "1s"]).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("dial failed"), "stderr: {stderr}");
    assert!(!stderr.contains("SayHello response"), "stderr: {stderr}");
}

#[tokio::test]
async fn slow_server_fails_with_call_error() {
    let (endpoint, cancel) = start_slow_greeter().await;

    let started = std::time::Instant::now();
    let output = run_greeter_client(&["--endpoint", &endpoint, "--timeout", "200ms"]).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("SayHello failed"), "stderr: {stderr}");
    assert!(stderr.contains("deadline exceeded"), "stderr: {stderr}");
    assert!(started.elapsed() < Duration::from_secs(5));
    cancel.cancel();
}

#[tokio::test]
async fn bad_timeout_is_a_usage_error() {
    let output = run_greeter_client(&["--timeout", "soon"]).await;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--timeout"), "stderr: {stderr}");
}

/// Runs against the fixed default endpoint, so it needs port 50051 free.
#[tokio::test]
#[ignore = "binds the fixed port 50051"]
async fn default_endpoint_round_trip() {
    let cfg = ServerConfig {
        listen_addr: "127.0.0.1:50051".to_owned(),
        reflection: true,
    };
    let cancel = CancellationToken::new();
    let (ready, rx) = ReadySignal::channel();
    let token = cancel.clone();
    tokio::spawn(async move { GreeterModule::new().serve(&cfg, token, ready).await });
    rx.await.unwrap();

    let output = run_greeter_client(&[]).await;
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("SayHello response: Hello, World!"));
    cancel.cancel();
}
