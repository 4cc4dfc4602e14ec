//! Shared bootstrap for the greeter binaries: layered configuration,
//! logging and signal handling.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod config;
pub mod humantime_serde;
pub mod logging;
pub mod signals;

pub use config::{
    AppConfig, ClientConfig, ConfigError, LogFormat, LoggingConfig, ServerConfig,
    DEFAULT_ENDPOINT, DEFAULT_LISTEN_ADDR, ENV_PREFIX,
};
pub use logging::init_logging;
pub use signals::{ShutdownSignal, shutdown_token, wait_for_shutdown};
