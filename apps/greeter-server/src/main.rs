use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use greeter::GreeterModule;
use greeter_bootstrap::{AppConfig, init_logging, shutdown_token};
use greeter_transport_grpc::server::{ListenConfig, ReadySignal};

/// Greeter Server - answers `greeter.v1.GreeterService/SayHello`
#[derive(Parser)]
#[command(name = "greeter-server")]
#[command(about = "Greeter Server - answers greeter.v1.GreeterService/SayHello")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address override, `host:port` or `uds:///path` (overrides config)
    #[arg(long)]
    listen_addr: Option<String>,

    /// Do not register the gRPC reflection service
    #[arg(long)]
    no_reflection: bool,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(addr) = &self.listen_addr {
            config.server.listen_addr.clone_from(addr);
        }
        if self.no_reflection {
            config.server.reflection = false;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (GREETER__*) -> 4) CLI overrides
    let mut config = match AppConfig::load_layered(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply_overrides(&mut config);

    init_logging(&config.logging, cli.verbose);

    let result = if cli.print_config {
        print_config(&config)
    } else {
        match cli.command.unwrap_or(Commands::Run) {
            Commands::Run => run_server(&config).await,
            Commands::Check => check_config(&config),
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_config(config: &AppConfig) -> Result<()> {
    println!("{}", config.to_yaml()?);
    Ok(())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config
        .server
        .listen_addr
        .parse::<ListenConfig>()
        .context("server.listen_addr")?;
    GreeterModule::new().grpc_routes(config.server.reflection)?;

    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Greeter Server starting");

    let cancel = shutdown_token();
    let (ready, bound) = ReadySignal::channel();
    tokio::spawn(async move {
        if let Ok(endpoint) = bound.await {
            tracing::info!(%endpoint, "ready to accept calls");
        }
    });

    GreeterModule::new()
        .serve(&config.server, cancel, ready)
        .await
}
