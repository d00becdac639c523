//! Wire types for the advisory backend (`/api/v1`).

use serde::{Deserialize, Serialize};

// ============= Chat =============

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub location: String,
    pub crop_type: String,
}

/// Answer from `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(default)]
    pub agent_breakdown: Option<Vec<AgentContribution>>,
}

/// One expert's share of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentContribution {
    #[serde(default)]
    pub agent_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<f32>,
}

// ============= Authentication =============

/// Body of `POST /login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Answer from `/login` and `/register`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Profile returned by `GET /protected`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Answer from `GET /protected`. Only the status code is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProtectedResponse {
    #[serde(default)]
    pub user: Option<UserInfo>,
}

// ============= Status =============

/// Answer from `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    #[serde(default = "default_health_status")]
    pub status: String,
}

fn default_health_status() -> String {
    "unknown".to_string()
}
