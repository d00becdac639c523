//! Header component

use crate::state::AppState;
use crop_advisor_core::session::SessionStatus;
use crop_advisor_core::status::Indicator;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Main application header
#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();

    let is_auth = Signal::derive(move || state.status.get() == SessionStatus::Authenticated);
    let report = RwSignal::new(Option::<(bool, String)>::None);

    let on_test = move |_| {
        spawn_local(async move {
            let result = state.test_connection().await;
            report.set(Some((result.reachable, result.message)));
        });
    };

    view! {
        <header class="header h-16 sticky top-0 z-40">
            <div class="h-full max-w-7xl mx-auto px-4 flex items-center justify-between">
                // Logo
                <a href="/" class="logo hover:opacity-80 transition-opacity">
                    <span class="text-2xl">"🌾"</span>
                    <div>
                        <h1 class="text-xl font-bold text-green-400">"Ethiopia Crop Advisor"</h1>
                        <p class="text-xs text-slate-500 -mt-0.5">"Expert advice for your farm"</p>
                    </div>
                </a>

                <nav class="flex items-center gap-4">
                    <Show when=move || is_auth.get()>
                        <div class="hidden sm:flex items-center gap-3 text-xs text-slate-400">
                            <StatusDot label="API" indicator=Signal::derive(move || state.system.get().api) />
                            <StatusDot label="Advisory" indicator=Signal::derive(move || state.system.get().backend_health) />
                        </div>
                        <button on:click=on_test class="btn btn-ghost text-xs">
                            "Test connection"
                        </button>
                        <button on:click=move |_| state.logout() class="btn btn-ghost">
                            "Sign Out"
                        </button>
                    </Show>
                </nav>
            </div>

            {move || report.get().map(|(ok, message)| view! {
                <div
                    class=format!(
                        "max-w-7xl mx-auto px-4 py-2 text-sm flex justify-between {}",
                        if ok { "text-green-400" } else { "text-red-400" }
                    )
                >
                    <span>{message}</span>
                    <button on:click=move |_| report.set(None) class="text-slate-500">"×"</button>
                </div>
            })}
        </header>
    }
}

/// Colored dot with a caption
#[component]
fn StatusDot(label: &'static str, indicator: Signal<Indicator>) -> impl IntoView {
    view! {
        <span class="flex items-center gap-1.5">
            <span class=move || format!(
                "w-2 h-2 rounded-full {}",
                match indicator.get() {
                    Indicator::Active => "bg-green-500",
                    Indicator::Inactive => "bg-red-500",
                    Indicator::Checking => "bg-yellow-500 animate-pulse",
                }
            )></span>
            {label}": "{move || indicator.get().as_str()}
        </span>
    }
}
