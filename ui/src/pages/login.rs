//! Login/Register page

use crate::components::Header;
use crate::state::AppState;
use crop_advisor_core::session::SessionStatus;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

/// Login/Register page
#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    // Form state
    let is_register = RwSignal::new(false);
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let name = RwSignal::new(String::new());
    let is_loading = RwSignal::new(false);
    let error = RwSignal::new(Option::<String>::None);

    // Redirect if already logged in
    Effect::new(move |_| {
        if state.status.get() == SessionStatus::Authenticated {
            navigate("/", Default::default());
        }
    });

    // The session navigates to the chat on success
    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }

        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let name_val = name.get_untracked();
        let is_reg = is_register.get_untracked();

        spawn_local(async move {
            is_loading.set(true);
            error.set(None);

            let result = if is_reg {
                state.register(name_val, email_val, password_val).await
            } else {
                state.login(email_val, password_val).await
            };

            is_loading.set(false);
            if let Some(message) = result.error {
                error.set(Some(message));
            }
        });
    };

    view! {
        <div class="min-h-screen flex flex-col">
            <Header />

            <main class="auth-container flex-1">
                <div class="w-full max-w-md px-4">
                    <div class="auth-card">
                        <div class="auth-header">
                            <div class="text-5xl mb-2">"🌾"</div>
                            <h1 class="auth-title text-green-400">
                                {move || if is_register.get() { "Create Account" } else { "Welcome Back" }}
                            </h1>
                            <p class="auth-subtitle">
                                {move || if is_register.get() {
                                    "Sign up to get advice for your farm"
                                } else {
                                    "Sign in to the Ethiopia Crop Advisor"
                                }}
                            </p>
                        </div>

                        // Error message
                        <Show when=move || error.get().is_some()>
                            <div class="mb-6 p-4 bg-red-900/20 border border-red-700/50 rounded-md text-red-300 text-sm animate-fade-in">
                                {move || error.get().unwrap_or_default()}
                            </div>
                        </Show>

                        <form on:submit=on_submit class="auth-form">
                            // Name field (register only)
                            <Show when=move || is_register.get()>
                                <div class="auth-input-group animate-fade-in-down">
                                    <label class="auth-label">"Full name"</label>
                                    <input
                                        type="text"
                                        prop:value=move || name.get()
                                        on:input=move |ev| name.set(event_target_value(&ev))
                                        placeholder="Your name"
                                        required=true
                                        class="input"
                                    />
                                </div>
                            </Show>

                            <div class="auth-input-group">
                                <label class="auth-label">"Email"</label>
                                <input
                                    type="email"
                                    prop:value=move || email.get()
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                    placeholder="you@example.com"
                                    required=true
                                    class="input"
                                />
                            </div>

                            <div class="auth-input-group">
                                <label class="auth-label">"Password"</label>
                                <input
                                    type="password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                    placeholder="••••••••"
                                    required=true
                                    class="input"
                                />
                            </div>

                            <button
                                type="submit"
                                disabled=move || is_loading.get()
                                class="btn btn-primary w-full py-3"
                            >
                                <Show when=move || is_loading.get()>
                                    <div class="loading-spinner"></div>
                                </Show>
                                {move || match (is_loading.get(), is_register.get()) {
                                    (true, true) => "Creating account...",
                                    (true, false) => "Signing in...",
                                    (false, true) => "Create Account",
                                    (false, false) => "Sign In",
                                }}
                            </button>
                        </form>

                        // Toggle login/register
                        <div class="auth-footer">
                            {move || if is_register.get() {
                                "Already have an account? "
                            } else {
                                "Don't have an account? "
                            }}
                            <button
                                on:click=move |_| {
                                    is_register.update(|v| *v = !*v);
                                    error.set(None);
                                }
                                class="auth-link"
                            >
                                {move || if is_register.get() { "Sign in" } else { "Sign up" }}
                            </button>
                        </div>
                    </div>
                </div>
            </main>
        </div>
    }
}
