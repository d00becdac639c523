//! Session lifecycle tests: the state machine driven over HTTP with a
//! file-backed token store.

mod common;

use common::*;
use crop_advisor::{AdvisorClient, FileTokenStore};
use crop_advisor_core::session::{
    Gate, Navigator, Route, SessionManager, SessionStatus, StorePolicy, TokenStore,
    MSG_LOGIN_FAILED, MSG_REGISTER_FAILED,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

struct Fixture {
    _dir: TempDir,
    store: Arc<FileTokenStore>,
    navigator: Arc<RecordingNavigator>,
    session: SessionManager<AdvisorClient>,
}

fn fixture(base_url: String) -> Fixture {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileTokenStore::new(dir.path().join("token")));
    let navigator = Arc::new(RecordingNavigator::default());
    let client = AdvisorClient::new(base_url)
        .unwrap()
        .with_token_store(store.clone());
    let session = SessionManager::new(client, store.clone(), navigator.clone());
    Fixture {
        _dir: dir,
        store,
        navigator,
        session,
    }
}

#[tokio::test]
async fn test_fresh_start_without_token_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/protected")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let fx = fixture(base_url(&server));
    let status = fx.session.initialize().await;

    assert_eq!(status, SessionStatus::Unauthenticated);
    assert_eq!(Gate::for_status(status), Gate::Login);
    assert_eq!(fx.navigator.routes(), vec![Route::Login]);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/login")))
        .and(body_json(json!({ "email": "a@b.com", "password": "wrong" })))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fx = fixture(base_url(&server));
    let result = fx.session.login("a@b.com", "wrong").await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some(MSG_LOGIN_FAILED));
    assert_eq!(fx.store.get(), None);
    assert!(!fx.store.path().exists());
    assert_eq!(fx.session.status(), SessionStatus::Unknown);
    assert!(fx.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_login_persists_token_for_the_next_run() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/login")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access_token": "tok-1", "token_type": "bearer" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("/protected")))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "user": { "name": "Abebe", "email": "abebe@example.org" }
        })))
        .mount(&server)
        .await;

    let fx = fixture(base_url(&server));
    let result = fx.session.login("abebe@example.org", "secret").await;
    assert!(result.success);
    assert_eq!(fx.session.status(), SessionStatus::Authenticated);
    assert_eq!(fx.navigator.routes(), vec![Route::Chat]);

    // A new process reading the same file picks the session back up.
    let reopened = FileTokenStore::new(fx.store.path());
    assert_eq!(reopened.get().as_deref(), Some("tok-1"));

    let client = AdvisorClient::new(base_url(&server)).unwrap();
    let next = SessionManager::new(
        client,
        Arc::new(reopened),
        Arc::new(RecordingNavigator::default()),
    );
    assert_eq!(next.initialize().await, SessionStatus::Authenticated);
    let user = next.session().user.unwrap();
    assert_eq!(user.name.as_deref(), Some("Abebe"));
}

#[tokio::test]
async fn test_expired_token_is_erased() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/protected")))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "detail": "Could not validate credentials" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let fx = fixture(base_url(&server));
    fx.store.set("stale").unwrap();

    let status = fx.session.initialize().await;

    assert_eq!(status, SessionStatus::Unauthenticated);
    assert_eq!(fx.store.get(), None);
    assert_eq!(fx.navigator.routes(), vec![Route::Login]);
}

#[tokio::test]
async fn test_unreachable_backend_during_validation_signs_out() {
    let fx = fixture(dead_base_url());
    fx.store.set("tok").unwrap();

    assert_eq!(
        fx.session.initialize().await,
        SessionStatus::Unauthenticated
    );
    assert!(!fx.store.has_token());
}

#[tokio::test]
async fn test_register_conflict_reports_registration_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/register")))
        .and(body_json(json!({
            "name": "Almaz",
            "email": "almaz@example.org",
            "password": "pw"
        })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Email already registered" })),
        )
        .mount(&server)
        .await;

    let fx = fixture(base_url(&server));
    let result = fx.session.register("Almaz", "almaz@example.org", "pw").await;

    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some(MSG_REGISTER_FAILED));
    assert!(!fx.store.has_token());
}

#[tokio::test]
async fn test_logout_removes_token_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/register")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "tok-r" })))
        .mount(&server)
        .await;

    let fx = fixture(base_url(&server));
    assert!(fx.session.register("Almaz", "almaz@example.org", "pw").await.success);
    assert!(fx.store.path().exists());

    fx.session.logout();

    assert!(!fx.store.path().exists());
    assert_eq!(fx.session.status(), SessionStatus::Unauthenticated);
    assert_eq!(fx.navigator.routes(), vec![Route::Chat, Route::Login]);
}

#[tokio::test]
async fn test_ephemeral_policy_clears_token_on_unload() {
    let fx = fixture(dead_base_url());
    fx.store.set("tok").unwrap();

    let session = fx.session.with_policy(StorePolicy::EPHEMERAL);
    session.unload();

    assert!(!fx.store.has_token());
    assert_eq!(session.status(), SessionStatus::Unauthenticated);
    assert!(fx.navigator.routes().is_empty());
}

#[tokio::test]
async fn test_persistent_policy_keeps_token_on_unload() {
    let fx = fixture(dead_base_url());
    fx.store.set("tok").unwrap();

    fx.session.unload();

    assert_eq!(fx.store.get().as_deref(), Some("tok"));
}
