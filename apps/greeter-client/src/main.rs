use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use greeter_bootstrap::{AppConfig, ClientConfig, init_logging};
use greeter_sdk::{GreeterClientV1, GreeterGrpcClient, SERVICE_NAME};
use greeter_transport_grpc::client::GrpcClientConfig;

/// Greeter Client - calls `SayHello` once and logs the reply
#[derive(Parser)]
#[command(name = "greeter-client")]
#[command(about = "Greeter Client - calls SayHello once and logs the reply")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server endpoint, e.g. `http://localhost:50051` (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Name to greet (overrides config)
    #[arg(long)]
    name: Option<String>,

    /// Call deadline, e.g. `2s` or `500ms` (overrides config)
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Connect timeout, e.g. `5s` (overrides config)
    #[arg(long, value_parser = humantime::parse_duration)]
    connect_timeout: Option<Duration>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(name) = &self.name {
            config.name.clone_from(name);
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(timeout) = self.connect_timeout {
            config.connect_timeout = timeout;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match AppConfig::load_layered(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply_overrides(&mut config.client);

    init_logging(&config.logging, cli.verbose);

    match say_hello(&config.client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Dial once, call once. The client (and its channel) is dropped on return.
async fn say_hello(cfg: &ClientConfig) -> Result<()> {
    let transport = GrpcClientConfig::new(SERVICE_NAME)
        .with_connect_timeout(cfg.connect_timeout)
        .with_rpc_timeout(cfg.timeout);

    let client = GreeterGrpcClient::connect(cfg.endpoint.as_str(), &transport)
        .await
        .context("dial failed")?;

    let message = client
        .say_hello(&cfg.name)
        .await
        .context("SayHello failed")?;

    tracing::info!("SayHello response: {message}");
    Ok(())
}
