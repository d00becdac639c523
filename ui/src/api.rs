//! gloo-net transport for the advisory backend

use async_trait::async_trait;
use crop_advisor_core::chat::ChatApi;
use crop_advisor_core::error::{detail_from_body, ClientError, FailureSignals, Result};
use crop_advisor_core::session::{AuthApi, TokenStore};
use crop_advisor_core::status::StatusApi;
use crop_advisor_core::types::{
    ChatRequest, ChatResponse, HealthResponse, LoginRequest, ProtectedResponse, RegisterRequest,
    TokenResponse,
};
use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Backend base URL. Set `CROP_ADVISOR_API_URL` at build time to override.
pub const API_BASE_URL: &str = match option_env!("CROP_ADVISOR_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api/v1",
};

/// Deadline for `POST /chat`, in milliseconds
pub const CHAT_TIMEOUT_MS: u32 = 30_000;

/// Browser client for the Crop Advisor backend
#[derive(Clone)]
pub struct BrowserClient {
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl BrowserClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the stored bearer token, if any
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.get() {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout_ms: Option<u32>,
    ) -> Result<T> {
        tracing::debug!(path, "POST");
        let request = self
            .authorized(Request::post(&self.url(path)))
            .json(body)
            .map_err(|e| ClientError::Validation(e.to_string()))?;

        let response = match timeout_ms {
            Some(ms) => {
                match select(Box::pin(request.send()), Box::pin(TimeoutFuture::new(ms))).await {
                    Either::Left((result, _)) => result,
                    Either::Right(_) => return Err(timed_out()),
                }
            }
            None => request.send().await,
        }
        .map_err(|e| classify_fetch_error(&e.to_string()))?;

        read_json(response).await
    }

    async fn get<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| classify_fetch_error(&e.to_string()))?;
        read_json(response).await
    }
}

/// Turn a response into `T`, classifying non-success statuses
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| classify_fetch_error(&e.to_string()))?;

    if !response.ok() {
        tracing::debug!(status, "backend returned an error status");
        return Err(FailureSignals::new(format!("HTTP {}", status))
            .with_status(status, detail_from_body(&body))
            .classify());
    }

    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Classify a failed `fetch`.
///
/// The browser hides the reason behind a generic `TypeError`, so a failed
/// fetch counts as sent without a response unless the message names a
/// refused connection.
pub fn classify_fetch_error(message: &str) -> ClientError {
    let lower = message.to_lowercase();
    FailureSignals {
        connection_refused: lower.contains("refused"),
        request_sent: true,
        network: true,
        message: message.to_string(),
        ..FailureSignals::default()
    }
    .classify()
}

fn timed_out() -> ClientError {
    FailureSignals {
        timed_out: true,
        message: format!("no answer within {} ms", CHAT_TIMEOUT_MS),
        ..FailureSignals::default()
    }
    .classify()
}

#[async_trait(?Send)]
impl AuthApi for BrowserClient {
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse> {
        self.post("/login", request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse> {
        self.post("/register", request, None).await
    }

    async fn validate(&self, token: &str) -> Result<ProtectedResponse> {
        tracing::debug!("GET /protected");
        let builder = Request::get(&self.url("/protected"))
            .header("Authorization", &format!("Bearer {}", token));
        self.get(builder).await
    }
}

#[async_trait(?Send)]
impl ChatApi for BrowserClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.post("/chat", request, Some(CHAT_TIMEOUT_MS)).await
    }
}

#[async_trait(?Send)]
impl StatusApi for BrowserClient {
    async fn rag_status(&self) -> Result<serde_json::Value> {
        self.get(self.authorized(Request::get(&self.url("/rag/status"))))
            .await
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.get(Request::get(&self.url("/health"))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crop_advisor_core::error::{MSG_NO_RESPONSE, MSG_TIMEOUT, MSG_UNREACHABLE};

    #[test]
    fn failed_fetch_reads_as_no_response() {
        let err = classify_fetch_error("TypeError: Failed to fetch");
        assert_eq!(err.chat_message(), MSG_NO_RESPONSE);
    }

    #[test]
    fn refused_connection_is_recognised() {
        let err = classify_fetch_error("net::ERR_CONNECTION_REFUSED");
        assert_eq!(err.chat_message(), MSG_UNREACHABLE);
    }

    #[test]
    fn deadline_reads_as_timeout() {
        assert_eq!(timed_out().chat_message(), MSG_TIMEOUT);
    }
}
