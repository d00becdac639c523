//! reqwest transport for the advisory backend.

use async_trait::async_trait;
use crop_advisor_core::chat::ChatApi;
use crop_advisor_core::error::{ClientError, Result as ClientResult};
use crop_advisor_core::session::{AuthApi, TokenStore};
use crop_advisor_core::status::StatusApi;
use crop_advisor_core::types::{
    ChatRequest, ChatResponse, HealthResponse, LoginRequest, ProtectedResponse, RegisterRequest,
    TokenResponse,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::classify::{classify_status, classify_transport};
use crate::types::{AdvisorError, Result};
use crate::utils::config::AdvisorConfig;

/// HTTP client for the Crop Advisor backend.
///
/// Cheap to clone; clones share the connection pool and token store.
#[derive(Clone)]
pub struct AdvisorClient {
    http: Client,
    base_url: String,
    chat_timeout: Duration,
    request_timeout: Duration,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl std::fmt::Debug for AdvisorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisorClient")
            .field("base_url", &self.base_url)
            .field("chat_timeout", &self.chat_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("has_token_store", &self.tokens.is_some())
            .finish()
    }
}

impl AdvisorClient {
    /// Client with the default 30s chat and 15s request deadlines.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("crop-advisor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AdvisorError::from)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chat_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(15),
            tokens: None,
        })
    }

    pub fn from_config(config: &AdvisorConfig) -> Result<Self> {
        Ok(Self::new(config.base_url())?
            .with_chat_timeout(config.chat_timeout())
            .with_request_timeout(config.request_timeout()))
    }

    pub fn with_chat_timeout(mut self, timeout: Duration) -> Self {
        self.chat_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Attach `Authorization: Bearer` from `store` whenever it holds a token.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, timeout: Duration) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path)).timeout(timeout);
        match self.tokens.as_ref().and_then(|store| store.get()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await.map_err(|e| classify_transport(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| classify_transport(&e))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "backend returned an error status");
            return Err(classify_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> ClientResult<T> {
        debug!(path, "POST");
        self.execute(self.request(Method::POST, path, timeout).json(body))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        debug!(path, "GET");
        self.execute(self.request(Method::GET, path, self.request_timeout))
            .await
    }
}

#[async_trait(?Send)]
impl AuthApi for AdvisorClient {
    async fn login(&self, request: &LoginRequest) -> ClientResult<TokenResponse> {
        self.post("/login", request, self.request_timeout).await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<TokenResponse> {
        self.post("/register", request, self.request_timeout).await
    }

    async fn validate(&self, token: &str) -> ClientResult<ProtectedResponse> {
        debug!("GET /protected");
        let builder = self
            .http
            .get(self.url("/protected"))
            .timeout(self.request_timeout)
            .bearer_auth(token);
        self.execute(builder).await
    }
}

#[async_trait(?Send)]
impl ChatApi for AdvisorClient {
    async fn chat(&self, request: &ChatRequest) -> ClientResult<ChatResponse> {
        self.post("/chat", request, self.chat_timeout).await
    }
}

#[async_trait(?Send)]
impl StatusApi for AdvisorClient {
    async fn rag_status(&self) -> ClientResult<serde_json::Value> {
        self.get("/rag/status").await
    }

    async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("/health").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let client = AdvisorClient::new("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(client.url("/chat"), "http://localhost:8000/api/v1/chat");
    }

    #[test]
    fn config_timeouts_are_applied() {
        let mut config = AdvisorConfig::default();
        config.api.chat_timeout_secs = 5;
        config.api.request_timeout_secs = 2;

        let client = AdvisorClient::from_config(&config).unwrap();
        assert_eq!(client.chat_timeout, Duration::from_secs(5));
        assert_eq!(client.request_timeout, Duration::from_secs(2));
    }
}
