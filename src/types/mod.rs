pub use crop_advisor_core::types::*;

use crate::utils::config::ConfigError;
use crop_advisor_core::ClientError;

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{}", .0.chat_message())]
    Client(#[from] ClientError),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not signed in. Run `crop-advisor login` first.")]
    NotSignedIn,
}

impl From<dialoguer::Error> for AdvisorError {
    fn from(e: dialoguer::Error) -> Self {
        AdvisorError::Prompt(e.to_string())
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(e: reqwest::Error) -> Self {
        AdvisorError::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;
