//! Error types for crop-advisor-core.
//!
//! Every backend call ends in either a value or a [`ClientError`]. Transport
//! adapters (reqwest on native, gloo-net in the browser) never build the
//! variants directly: they describe what they observed in a
//! [`FailureSignals`] record and let [`FailureSignals::classify`] pick the
//! variant, so both front ends agree on which message a failure produces.

use thiserror::Error;

/// Result type for crop-advisor-core operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Shown when the server refused the connection outright.
pub const MSG_UNREACHABLE: &str =
    "Cannot connect to the server. Make sure the advisory backend is running.";
/// Shown when the request went out but nothing came back.
pub const MSG_NO_RESPONSE: &str = "No response from server. Check if the backend is running.";
/// Shown for browser-level fetch failures (offline, CORS, DNS).
pub const MSG_NETWORK: &str = "Network error. Check your connection and CORS settings.";
/// Shown when the call exceeded its deadline.
pub const MSG_TIMEOUT: &str = "Request timeout. The server is taking too long to respond.";
/// Shown for anything that does not fit another shape.
pub const MSG_FALLBACK: &str = "Sorry, I encountered an error. Please try again.";

/// Errors surfaced by backend calls and local validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Connection refused before any request bytes were accepted.
    #[error("Server unreachable: {0}")]
    TransportUnreachable(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("Unknown error"))]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, when present.
        detail: Option<String>,
    },

    /// The request was sent but no response arrived.
    #[error("No response received: {0}")]
    NoResponse(String),

    /// Generic network failure (DNS, CORS, offline).
    #[error("Network error: {0}")]
    Network(String),

    /// The request exceeded its deadline.
    #[error("Request timed out")]
    Timeout,

    /// Rejected locally before anything was sent.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The response body could not be decoded.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The session store could not be written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    /// Text appended to the transcript when a chat call fails.
    pub fn chat_message(&self) -> String {
        match self {
            ClientError::TransportUnreachable(_) => MSG_UNREACHABLE.to_string(),
            ClientError::HttpStatus { status, detail } => format!(
                "Server error: {} - {}",
                status,
                detail.as_deref().unwrap_or("Unknown error")
            ),
            ClientError::NoResponse(_) => MSG_NO_RESPONSE.to_string(),
            ClientError::Network(_) => MSG_NETWORK.to_string(),
            ClientError::Timeout => MSG_TIMEOUT.to_string(),
            ClientError::Validation(_) | ClientError::Decode(_) | ClientError::Storage(_) => {
                MSG_FALLBACK.to_string()
            }
        }
    }

    /// Whether the failure came from the server's answer rather than the wire.
    pub fn is_http_status(&self) -> bool {
        matches!(self, ClientError::HttpStatus { .. })
    }
}

/// What a transport adapter observed about a failed call.
///
/// Several flags may be set at once (a refused connection is also a network
/// failure); [`classify`](Self::classify) resolves them in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FailureSignals {
    /// The OS reported the connection as refused.
    pub connection_refused: bool,
    /// Status code and `detail` of a structured error response.
    pub http_status: Option<(u16, Option<String>)>,
    /// The request left the client but no response came back.
    pub request_sent: bool,
    /// The underlying transport reported a network-level failure.
    pub network: bool,
    /// The deadline elapsed.
    pub timed_out: bool,
    /// Adapter's own description of the failure, for logs.
    pub message: String,
}

impl FailureSignals {
    /// Start a record with a log description.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Record a structured HTTP error response.
    pub fn with_status(mut self, status: u16, detail: Option<String>) -> Self {
        self.http_status = Some((status, detail));
        self
    }

    /// Resolve the observed flags into one error.
    ///
    /// Order: refused, HTTP status, sent-without-response, network, timeout,
    /// then the undecodable fallback.
    pub fn classify(self) -> ClientError {
        if self.connection_refused {
            return ClientError::TransportUnreachable(self.message);
        }
        if let Some((status, detail)) = self.http_status {
            return ClientError::HttpStatus { status, detail };
        }
        if self.request_sent {
            return ClientError::NoResponse(self.message);
        }
        if self.network {
            return ClientError::Network(self.message);
        }
        if self.timed_out {
            return ClientError::Timeout;
        }
        ClientError::Decode(self.message)
    }
}

/// Pull the `detail` field out of a JSON error body.
///
/// String details are returned as-is; structured details (validation error
/// lists, objects) are returned as compact JSON.
pub fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
