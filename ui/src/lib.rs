//! Ethiopia Crop Advisor - Leptos browser client
//!
//! Sign in, then ask the advisory service about planting, pests, soil,
//! weather and water for your region and crop.

pub mod api;
pub mod components;
pub mod pages;
pub mod state;

use leptos::ev;
use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::{
    components::{Route, Router, Routes},
    hooks::use_navigate,
    path,
};

use components::AuthGate;
use pages::{chat::ChatPage, login::LoginPage};
use state::AppState;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Initialize global state and resolve the stored session
    let app_state = AppState::new();
    provide_context(app_state);
    app_state.initialize();

    // Ephemeral sessions end with the page
    let _unload = window_event_listener(ev::beforeunload, move |_| app_state.unload());

    view! {
        <Title text="Ethiopia Crop Advisor" />
        <Router>
            <RedirectListener />
            <main class="min-h-screen bg-slate-900 text-slate-100">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route
                        path=path!("/")
                        view=|| view! { <AuthGate><ChatPage /></AuthGate> }
                    />
                    <Route path=path!("/login") view=LoginPage />
                </Routes>
            </main>
        </Router>
    }
}

/// Follows navigation requests raised by the session
#[component]
fn RedirectListener() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    Effect::new(move |_| {
        if let Some(route) = state.redirect.get() {
            state.redirect.set(None);
            navigate(route.path(), Default::default());
        }
    });
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-slate-500 mb-4">"404"</h1>
                <p class="text-xl text-slate-400 mb-8">"Page not found"</p>
                <a
                    href="/"
                    class="px-6 py-3 bg-green-600 hover:bg-green-700 rounded-lg font-medium transition-colors"
                >
                    "Back to the advisor"
                </a>
            </div>
        </div>
    }
}
