//! Global application state
//!
//! The session state machine and the transcript live in `crop-advisor-core`;
//! this module owns them for the page and mirrors their state into signals
//! after every operation so views can react.

use crate::api::{BrowserClient, API_BASE_URL};
use crop_advisor_core::chat::{ChatContext, ChatMessage, ChatSession};
use crop_advisor_core::error::{ClientError, Result as ClientResult};
use crop_advisor_core::session::{
    AuthResult, Navigator, Route, SessionManager, SessionStatus, TokenStore, TOKEN_KEY,
};
use crop_advisor_core::status::{ConnectionReport, SystemStatus};
use gloo_storage::{LocalStorage as BrowserStorage, Storage};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::rc::Rc;
use std::sync::Arc;

/// Token kept in `localStorage["token"]` as a plain string
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalTokenStore;

impl TokenStore for LocalTokenStore {
    fn get(&self) -> Option<String> {
        BrowserStorage::raw()
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, token: &str) -> ClientResult<()> {
        BrowserStorage::raw()
            .set_item(TOKEN_KEY, token)
            .map_err(|e| ClientError::Storage(format!("{:?}", e)))
    }

    fn clear(&self) {
        BrowserStorage::delete(TOKEN_KEY);
    }
}

/// Routes requested by the session, picked up by the router
#[derive(Clone, Copy)]
pub struct SignalNavigator {
    pub redirect: RwSignal<Option<Route>>,
}

impl Navigator for SignalNavigator {
    fn navigate(&self, route: Route) {
        self.redirect.set(Some(route));
    }
}

struct Core {
    session: SessionManager<BrowserClient>,
    chat: ChatSession<BrowserClient>,
}

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    core: StoredValue<Rc<Core>, LocalStorage>,
    /// Session status
    pub status: RwSignal<SessionStatus>,
    /// Chat transcript
    pub messages: RwSignal<Vec<ChatMessage>>,
    /// A chat call is outstanding
    pub is_sending: RwSignal<bool>,
    /// API and advisory indicators
    pub system: RwSignal<SystemStatus>,
    /// Farm context sent with each question
    pub context: RwSignal<ChatContext>,
    /// Route the session asked for, if any
    pub redirect: RwSignal<Option<Route>>,
}

impl AppState {
    pub fn new() -> Self {
        let redirect = RwSignal::new(None);
        let store: Arc<dyn TokenStore> = Arc::new(LocalTokenStore);
        let client = BrowserClient::new(API_BASE_URL, store.clone());
        let session = SessionManager::new(
            client.clone(),
            store,
            Arc::new(SignalNavigator { redirect }),
        );
        let chat = ChatSession::new(client);

        Self {
            core: StoredValue::new_local(Rc::new(Core { session, chat })),
            status: RwSignal::new(SessionStatus::Unknown),
            messages: RwSignal::new(Vec::new()),
            is_sending: RwSignal::new(false),
            system: RwSignal::new(SystemStatus::default()),
            context: RwSignal::new(ChatContext::default()),
            redirect,
        }
    }

    fn core(&self) -> Rc<Core> {
        self.core.get_value()
    }

    fn sync_session(&self) {
        self.status.set(self.core().session.status());
    }

    fn sync_chat(&self) {
        let core = self.core();
        self.messages.set(core.chat.messages());
        self.is_sending.set(core.chat.is_sending());
        self.system.set(core.chat.system_status());
    }

    /// Resolve the stored session once at start-up
    pub fn initialize(&self) {
        let state = *self;
        let core = self.core();
        if core.session.store().has_token() {
            self.status.set(SessionStatus::Checking);
        }
        spawn_local(async move {
            core.session.initialize().await;
            state.sync_session();
        });
    }

    pub async fn login(&self, email: String, password: String) -> AuthResult {
        let core = self.core();
        let result = core.session.login(email.trim(), &password).await;
        self.sync_session();
        result
    }

    pub async fn register(&self, name: String, email: String, password: String) -> AuthResult {
        let core = self.core();
        let result = core
            .session
            .register(name.trim(), email.trim(), &password)
            .await;
        self.sync_session();
        result
    }

    pub fn logout(&self) {
        self.core().session.logout();
        self.sync_session();
    }

    /// Page is going away
    pub fn unload(&self) {
        self.core().session.unload();
    }

    /// Ask a question. Returns whether it was accepted.
    pub fn send(&self, text: &str) -> bool {
        let core = self.core();
        let context = self.context.get_untracked();
        let pending = match core.chat.begin(text, &context) {
            Ok(pending) => pending,
            Err(rejected) => {
                tracing::debug!(?rejected, "send ignored");
                return false;
            }
        };
        self.sync_chat();

        let state = *self;
        spawn_local(async move {
            core.chat.settle(pending).await;
            state.sync_chat();
            state.refresh_backend_status();
        });
        true
    }

    pub fn clear_chat(&self) {
        self.core().chat.clear();
        self.sync_chat();
        self.refresh_backend_status();
    }

    /// Re-probe the advisory subsystem in the background
    pub fn refresh_backend_status(&self) {
        let state = *self;
        let core = self.core();
        spawn_local(async move {
            core.chat.refresh_backend_status().await;
            state.sync_chat();
        });
    }

    pub async fn test_connection(&self) -> ConnectionReport {
        let core = self.core();
        let report = core.chat.test_connection().await;
        self.sync_chat();
        report
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
