//! Coarse backend status shown next to the chat.

use crate::error::Result;
use crate::types::HealthResponse;
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    #[default]
    Checking,
    Active,
    Inactive,
}

impl Indicator {
    pub fn as_str(self) -> &'static str {
        match self {
            Indicator::Checking => "checking",
            Indicator::Active => "active",
            Indicator::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last known outcome of the chat call and of the backend probes.
///
/// The two fields are independent and purely diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SystemStatus {
    pub api: Indicator,
    pub backend_health: Indicator,
}

/// Result of an explicit connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionReport {
    pub reachable: bool,
    pub message: String,
}

impl ConnectionReport {
    pub fn reachable(status: &str) -> Self {
        Self {
            reachable: true,
            message: format!("Backend is running: {}", status),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            message: "Cannot connect to backend. Check if it's running.".to_string(),
        }
    }
}

/// Backend liveness endpoints.
#[async_trait(?Send)]
pub trait StatusApi {
    /// `GET /rag/status`; any successful body counts as alive.
    async fn rag_status(&self) -> Result<serde_json::Value>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthResponse>;
}
