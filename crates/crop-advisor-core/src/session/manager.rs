//! Authentication state machine.
//!
//! `Unknown -> Checking -> {Authenticated, Unauthenticated}`, and
//! `Authenticated -> Unauthenticated` on logout or failed validation.
//! Every entry into `Unauthenticated` goes through
//! [`SessionManager::enter_unauthenticated`], which erases the stored token
//! before the status changes.

use super::{
    AuthApi, AuthResult, Navigator, Route, Session, SessionStatus, StorePolicy, TokenStore,
    MSG_AUTH_BUSY, MSG_LOGIN_FAILED, MSG_REGISTER_FAILED, MSG_STORE_FAILED,
};
use crate::flight::FlightGuard;
use crate::types::{LoginRequest, RegisterRequest, UserInfo};
use parking_lot::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct SessionState {
    status: SessionStatus,
    user: Option<UserInfo>,
}

/// Owns the session status and drives it through the backend.
pub struct SessionManager<A> {
    api: A,
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
    policy: StorePolicy,
    state: Mutex<SessionState>,
    auth_in_flight: Arc<AtomicBool>,
}

impl<A: AuthApi> SessionManager<A> {
    pub fn new(api: A, store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            store,
            navigator,
            policy: StorePolicy::default(),
            state: Mutex::new(SessionState::default()),
            auth_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_policy(mut self, policy: StorePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn status(&self) -> SessionStatus {
        self.state.lock().status
    }

    pub fn policy(&self) -> StorePolicy {
        self.policy
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub fn session(&self) -> Session {
        let state = self.state.lock();
        Session {
            token: self.store.get(),
            status: state.status,
            user: state.user.clone(),
        }
    }

    /// Resolve the session at start-up.
    ///
    /// Without a stored token this settles on `Unauthenticated` immediately
    /// and makes no network call.
    pub async fn initialize(&self) -> SessionStatus {
        match self.store.get() {
            None => {
                debug!("no stored token");
                self.enter_unauthenticated(true);
            }
            Some(token) => {
                self.validate_token(&token).await;
            }
        }
        self.status()
    }

    /// Check `token` against the backend.
    ///
    /// Any failure erases the stored token and routes to the login surface.
    /// A result that arrives after the stored token changed (a logout, or a
    /// login that finished first) is dropped, whether it succeeded or not.
    pub async fn validate_token(&self, token: &str) -> SessionStatus {
        self.set_status(SessionStatus::Checking);

        let result = self.api.validate(token).await;
        if self.store.get().as_deref() != Some(token) {
            debug!("token changed while validating; ignoring result");
            return self.status();
        }

        match result {
            Ok(resp) => {
                let mut state = self.state.lock();
                state.status = SessionStatus::Authenticated;
                state.user = resp.user;
                info!("session validated");
            }
            Err(e) => {
                warn!(error = %e, "token validation failed");
                self.enter_unauthenticated(true);
            }
        }
        self.status()
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult {
        let Some(_guard) = FlightGuard::try_begin(&self.auth_in_flight) else {
            debug!("login ignored: auth call outstanding");
            return AuthResult::failed(MSG_AUTH_BUSY);
        };

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.login(&request).await {
            Ok(resp) => self.accept_token(&resp.access_token, MSG_LOGIN_FAILED),
            Err(e) => {
                warn!(error = %e, "login failed");
                AuthResult::failed(MSG_LOGIN_FAILED)
            }
        }
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthResult {
        let Some(_guard) = FlightGuard::try_begin(&self.auth_in_flight) else {
            debug!("register ignored: auth call outstanding");
            return AuthResult::failed(MSG_AUTH_BUSY);
        };

        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.register(&request).await {
            Ok(resp) => self.accept_token(&resp.access_token, MSG_REGISTER_FAILED),
            Err(e) => {
                warn!(error = %e, "registration failed");
                AuthResult::failed(MSG_REGISTER_FAILED)
            }
        }
    }

    /// Local sign-out. No backend call.
    pub fn logout(&self) {
        info!("logout");
        self.enter_unauthenticated(true);
    }

    /// Called when the page or process is going away.
    ///
    /// Under an ephemeral policy the token is erased so the next start
    /// begins signed out; a persistent policy leaves everything in place.
    pub fn unload(&self) {
        if self.policy.persist_across_reload {
            return;
        }
        debug!("ephemeral session: clearing token on unload");
        self.enter_unauthenticated(false);
    }

    fn accept_token(&self, token: &str, failure: &str) -> AuthResult {
        if token.is_empty() {
            warn!("backend issued an empty token");
            return AuthResult::failed(failure);
        }
        if let Err(e) = self.store.set(token) {
            warn!(error = %e, "could not persist token");
            return AuthResult::failed(MSG_STORE_FAILED);
        }
        {
            let mut state = self.state.lock();
            state.status = SessionStatus::Authenticated;
            state.user = None;
        }
        info!("signed in");
        self.navigator.navigate(Route::Chat);
        AuthResult::ok()
    }

    fn enter_unauthenticated(&self, navigate: bool) {
        self.store.clear();
        {
            let mut state = self.state.lock();
            state.status = SessionStatus::Unauthenticated;
            state.user = None;
        }
        if navigate {
            self.navigator.navigate(Route::Login);
        }
    }

    fn set_status(&self, status: SessionStatus) {
        self.state.lock().status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ClientError, Result};
    use crate::session::{MemoryTokenStore, MSG_AUTH_BUSY};
    use crate::types::{ProtectedResponse, TokenResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeAuth {
        accept_password: Option<&'static str>,
        token_valid: bool,
        login_calls: AtomicUsize,
        validate_calls: AtomicUsize,
        yield_before_reply: bool,
        validate_yields: usize,
    }

    #[async_trait(?Send)]
    impl AuthApi for FakeAuth {
        async fn login(&self, request: &LoginRequest) -> Result<TokenResponse> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            if self.yield_before_reply {
                tokio::task::yield_now().await;
            }
            match self.accept_password {
                Some(p) if p == request.password => Ok(TokenResponse {
                    access_token: "tok-login".into(),
                }),
                _ => Err(ClientError::HttpStatus {
                    status: 401,
                    detail: Some("Invalid credentials".into()),
                }),
            }
        }

        async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse> {
            if request.email == "taken@b.com" {
                return Err(ClientError::HttpStatus {
                    status: 400,
                    detail: Some("Email already registered".into()),
                });
            }
            Ok(TokenResponse {
                access_token: "tok-register".into(),
            })
        }

        async fn validate(&self, _token: &str) -> Result<ProtectedResponse> {
            self.validate_calls.fetch_add(1, Ordering::SeqCst);
            for _ in 0..self.validate_yields {
                tokio::task::yield_now().await;
            }
            if self.token_valid {
                Ok(ProtectedResponse {
                    user: Some(UserInfo {
                        name: Some("Abebe".into()),
                        email: Some("a@b.com".into()),
                    }),
                })
            } else {
                Err(ClientError::HttpStatus {
                    status: 401,
                    detail: None,
                })
            }
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: parking_lot::Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().push(route);
        }
    }

    fn manager(
        api: FakeAuth,
        store: MemoryTokenStore,
    ) -> (
        SessionManager<FakeAuth>,
        Arc<MemoryTokenStore>,
        Arc<RecordingNavigator>,
    ) {
        let store = Arc::new(store);
        let nav = Arc::new(RecordingNavigator::default());
        let m = SessionManager::new(api, store.clone(), nav.clone());
        (m, store, nav)
    }

    #[tokio::test]
    async fn fresh_start_without_token_skips_network() {
        let (m, store, nav) = manager(FakeAuth::default(), MemoryTokenStore::new());
        assert_eq!(m.status(), SessionStatus::Unknown);

        let status = m.initialize().await;

        assert_eq!(status, SessionStatus::Unauthenticated);
        assert_eq!(m.api.validate_calls.load(Ordering::SeqCst), 0);
        assert!(!store.has_token());
        assert_eq!(*nav.routes.lock(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn stored_valid_token_authenticates() {
        let api = FakeAuth {
            token_valid: true,
            ..Default::default()
        };
        let (m, store, nav) = manager(api, MemoryTokenStore::with_token("tok"));

        assert_eq!(m.initialize().await, SessionStatus::Authenticated);
        assert_eq!(store.get().as_deref(), Some("tok"));
        assert_eq!(
            m.session().user.and_then(|u| u.name).as_deref(),
            Some("Abebe")
        );
        assert!(nav.routes.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_validation_clears_token_and_status_together() {
        let (m, store, nav) = manager(FakeAuth::default(), MemoryTokenStore::with_token("stale"));

        assert_eq!(m.initialize().await, SessionStatus::Unauthenticated);
        assert_eq!(m.api.validate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get(), None);
        assert_eq!(*nav.routes.lock(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn login_with_wrong_password_leaves_session_alone() {
        let api = FakeAuth {
            accept_password: Some("right"),
            ..Default::default()
        };
        let (m, store, nav) = manager(api, MemoryTokenStore::new());

        let result = m.login("a@b.com", "wrong").await;

        assert_eq!(result, AuthResult::failed("Invalid email or password"));
        assert_eq!(store.get(), None);
        assert_eq!(m.status(), SessionStatus::Unknown);
        assert!(nav.routes.lock().is_empty());
    }

    #[tokio::test]
    async fn login_success_stores_token_and_navigates() {
        let api = FakeAuth {
            accept_password: Some("right"),
            ..Default::default()
        };
        let (m, store, nav) = manager(api, MemoryTokenStore::new());

        let result = m.login("a@b.com", "right").await;

        assert!(result.success);
        assert_eq!(store.get().as_deref(), Some("tok-login"));
        assert_eq!(m.status(), SessionStatus::Authenticated);
        assert_eq!(*nav.routes.lock(), vec![Route::Chat]);
    }

    #[tokio::test]
    async fn register_failure_message_differs() {
        let (m, store, _) = manager(FakeAuth::default(), MemoryTokenStore::new());

        let result = m.register("Abebe", "taken@b.com", "pw").await;
        assert_eq!(
            result.error.as_deref(),
            Some("Registration failed. Email may already be in use.")
        );
        assert!(!store.has_token());

        let result = m.register("Abebe", "new@b.com", "pw").await;
        assert!(result.success);
        assert_eq!(store.get().as_deref(), Some("tok-register"));
    }

    #[tokio::test]
    async fn second_login_while_first_pending_is_ignored() {
        let api = FakeAuth {
            accept_password: Some("pw"),
            yield_before_reply: true,
            ..Default::default()
        };
        let (m, store, _) = manager(api, MemoryTokenStore::new());

        let (first, second) = futures::join!(m.login("a@b.com", "pw"), m.login("a@b.com", "pw"));

        assert!(first.success);
        assert_eq!(second, AuthResult::failed(MSG_AUTH_BUSY));
        assert_eq!(m.api.login_calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get().as_deref(), Some("tok-login"));

        // The guard is released once the first call settles.
        assert!(m.login("a@b.com", "pw").await.success);
    }

    #[tokio::test]
    async fn late_validation_failure_keeps_fresh_login() {
        let api = FakeAuth {
            accept_password: Some("pw"),
            validate_yields: 2,
            ..Default::default()
        };
        let (m, store, nav) = manager(api, MemoryTokenStore::with_token("stale"));

        let (status, login) = futures::join!(m.initialize(), m.login("a@b.com", "pw"));

        assert!(login.success);
        assert_eq!(status, SessionStatus::Authenticated);
        assert_eq!(store.get().as_deref(), Some("tok-login"));
        assert_eq!(m.status(), SessionStatus::Authenticated);
        assert_eq!(*nav.routes.lock(), vec![Route::Chat]);
    }

    #[tokio::test]
    async fn late_validation_success_after_logout_is_dropped() {
        let api = FakeAuth {
            token_valid: true,
            validate_yields: 2,
            ..Default::default()
        };
        let (m, store, _) = manager(api, MemoryTokenStore::with_token("tok"));

        let (status, ()) = futures::join!(m.initialize(), async { m.logout() });

        assert_eq!(status, SessionStatus::Unauthenticated);
        assert_eq!(store.get(), None);
        assert_eq!(m.session().user, None);
    }

    #[tokio::test]
    async fn logout_erases_token() {
        let api = FakeAuth {
            token_valid: true,
            ..Default::default()
        };
        let (m, store, nav) = manager(api, MemoryTokenStore::with_token("tok"));
        m.initialize().await;

        m.logout();

        assert_eq!(store.get(), None);
        assert_eq!(m.status(), SessionStatus::Unauthenticated);
        assert_eq!(m.session().user, None);
        assert_eq!(nav.routes.lock().last(), Some(&Route::Login));
    }

    #[test]
    fn unload_respects_policy() {
        let (m, store, _) = manager(FakeAuth::default(), MemoryTokenStore::with_token("tok"));
        m.unload();
        assert_eq!(store.get().as_deref(), Some("tok"));

        let (m, store, nav) = manager(FakeAuth::default(), MemoryTokenStore::with_token("tok"));
        let m = m.with_policy(StorePolicy::EPHEMERAL);
        m.unload();
        assert_eq!(store.get(), None);
        assert_eq!(m.status(), SessionStatus::Unauthenticated);
        assert!(nav.routes.lock().is_empty());
    }
}
