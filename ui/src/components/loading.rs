//! Waiting states: the session check and an outstanding question

use leptos::prelude::*;

pub const ANALYZING: &str = "Agricultural experts are analyzing your question...";

#[component]
fn PulseDots() -> impl IntoView {
    view! {
        <div class="flex items-center gap-1" aria-hidden="true">
            {(1..=3)
                .map(|n| view! {
                    <span class=format!("w-2 h-2 bg-green-400 rounded-full dot-bounce-{}", n)></span>
                })
                .collect::<Vec<_>>()}
        </div>
    }
}

/// Assistant-side row shown while a chat call is outstanding
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="flex items-start gap-3 message-appear" role="status">
            <div class="w-8 h-8 rounded-full bg-gradient-to-br from-green-500 to-emerald-600 flex items-center justify-center text-white text-sm shrink-0">
                "🌾"
            </div>
            <div class="px-4 py-3 bg-slate-800 rounded-2xl rounded-tl-sm flex items-center gap-3">
                <PulseDots />
                <span class="text-sm text-slate-400">{ANALYZING}</span>
            </div>
        </div>
    }
}

/// Covers the page until the stored session is resolved
#[component]
pub fn LoadingOverlay(message: &'static str) -> impl IntoView {
    view! {
        <div class="fixed inset-0 bg-slate-900/80 backdrop-blur-sm flex items-center justify-center z-50" role="status">
            <div class="flex flex-col items-center gap-4">
                <div class="text-5xl animate-pulse">"🌾"</div>
                <PulseDots />
                <p class="text-slate-300 font-medium">{message}</p>
            </div>
        </div>
    }
}
