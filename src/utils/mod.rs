/// Configuration file, environment overrides and validation.
pub mod config;

pub use config::{AdvisorConfig, ConfigError, LogFormat};
