//! Logging initialization.
//!
//! Plain-text `tracing-subscriber` output to stderr by default. Filter
//! precedence: `RUST_LOG`, then the `-v` count, then `logging.level`.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Resolve the filter directive from the verbosity flag and config.
#[must_use]
pub fn filter_directive(cfg: &LoggingConfig, verbose: u8) -> String {
    match verbose {
        0 => cfg.level.clone(),
        1 => "info".to_owned(),
        2 => "debug".to_owned(),
        _ => "trace".to_owned(),
    }
}

fn build_env_filter(cfg: &LoggingConfig, verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = filter_directive(cfg, verbose);
        EnvFilter::try_new(&directive).unwrap_or_else(|e| {
            eprintln!("invalid log level '{directive}' ({e}), falling back to 'info'");
            EnvFilter::new("info")
        })
    })
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init_logging(cfg: &LoggingConfig, verbose: u8) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(cfg, verbose))
        .with_writer(std::io::stderr)
        .with_ansi(cfg.ansi);

    let installed = match cfg.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
