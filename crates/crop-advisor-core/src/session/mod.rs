//! Client-side session: token storage, auth state machine and route gating.

mod manager;
mod store;

pub use manager::SessionManager;
pub use store::{MemoryTokenStore, StorePolicy, TokenStore, TOKEN_KEY};

use crate::error::Result;
use crate::types::{LoginRequest, ProtectedResponse, RegisterRequest, TokenResponse, UserInfo};
use async_trait::async_trait;

/// Returned by `login` when the backend rejects the credentials.
pub const MSG_LOGIN_FAILED: &str = "Invalid email or password";
/// Returned by `register` when the backend rejects the registration.
pub const MSG_REGISTER_FAILED: &str = "Registration failed. Email may already be in use.";
/// Returned by `login`/`register` while another auth call is outstanding.
pub const MSG_AUTH_BUSY: &str = "A sign-in request is already in progress.";
/// Returned when the issued token could not be persisted.
pub const MSG_STORE_FAILED: &str = "Could not save your session. Please try again.";

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Surfaces the session can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Chat,
}

impl Route {
    /// Browser path for this route.
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Chat => "/",
        }
    }
}

/// Receives navigation requests from the session.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Navigator that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: Route) {}
}

/// What a view should render for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Status not settled yet; show a placeholder.
    Pending,
    /// Show the login/register surface.
    Login,
    /// Pass through to the protected content.
    Content,
}

impl Gate {
    pub fn for_status(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Unknown | SessionStatus::Checking => Gate::Pending,
            SessionStatus::Unauthenticated => Gate::Login,
            SessionStatus::Authenticated => Gate::Content,
        }
    }
}

/// Outcome of a login or registration attempt, shaped for form rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub error: Option<String>,
}

impl AuthResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Session {
    pub token: Option<String>,
    pub status: SessionStatus,
    pub user: Option<UserInfo>,
}

/// Backend authentication endpoints.
#[async_trait(?Send)]
pub trait AuthApi {
    /// `POST /login`
    async fn login(&self, request: &LoginRequest) -> Result<TokenResponse>;

    /// `POST /register`
    async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse>;

    /// `GET /protected` with the given bearer token.
    async fn validate(&self, token: &str) -> Result<ProtectedResponse>;
}
