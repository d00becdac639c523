//! Tracing subscriber setup for the terminal client.

use crate::utils::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber, writing to stderr so it never mixes with
/// chat output.
///
/// `RUST_LOG` wins over the configured level; `verbose` forces `debug`.
/// Calling this twice is harmless.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let filter = build_filter(config, verbose);

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn build_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config.level.parse::<EnvFilter>().unwrap_or_else(|e| {
            eprintln!("Invalid log level '{}': {}; using 'warn'", config.level, e);
            EnvFilter::new("warn")
        })
    })
}
