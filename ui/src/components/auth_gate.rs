//! Session gate for protected pages

use crate::components::LoadingOverlay;
use crate::state::AppState;
use crop_advisor_core::session::Gate;
use leptos::prelude::*;
use leptos_router::components::Redirect;

/// Render `children` only for a signed-in session
#[component]
pub fn AuthGate(children: ChildrenFn) -> impl IntoView {
    let state = expect_context::<AppState>();

    move || match Gate::for_status(state.status.get()) {
        Gate::Pending => view! { <LoadingOverlay message="Checking your session..." /> }.into_any(),
        Gate::Login => view! { <Redirect path="/login" /> }.into_any(),
        Gate::Content => children().into_any(),
    }
}
