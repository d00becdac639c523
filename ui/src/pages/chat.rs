//! Chat page - main conversation interface

use crate::components::{ChatInput, ChatMessage, Header, QuickQuestions, TypingIndicator};
use crate::state::AppState;
use crop_advisor_core::chat::ChatContext;
use leptos::html::{Div, Textarea};
use leptos::prelude::*;
use web_sys::{ScrollBehavior, ScrollIntoViewOptions};

/// Main chat page
#[component]
pub fn ChatPage() -> impl IntoView {
    let state = expect_context::<AppState>();

    let input = RwSignal::new(String::new());
    let textarea_ref = NodeRef::<Textarea>::new();
    let messages_end_ref = NodeRef::<Div>::new();

    // Probe the advisory subsystem once on mount
    state.refresh_backend_status();

    // Auto-scroll to bottom when new messages arrive
    Effect::new(move |_| {
        state.messages.track();
        state.is_sending.track();
        if let Some(el) = messages_end_ref.get() {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            el.scroll_into_view_with_scroll_into_view_options(&options);
        }
    });

    let on_submit = move || {
        if state.send(&input.get_untracked()) {
            input.set(String::new());
        }
    };

    // Quick questions fill the input instead of sending
    let on_quick_select = move |question: String| {
        input.set(question);
        if let Some(textarea) = textarea_ref.get() {
            let _ = textarea.focus();
        }
    };

    view! {
        <div class="h-screen flex flex-col">
            <Header />

            <ContextBar />

            // Messages area
            <div class="flex-1 overflow-y-auto">
                <div class="max-w-4xl mx-auto px-4 py-6 space-y-6">
                    <Show
                        when=move || !state.messages.get().is_empty()
                        fallback=move || view! { <QuickQuestions on_select=on_quick_select /> }
                    >
                        <For
                            each=move || state.messages.get()
                            key=|message| message.id.0
                            children=|message| view! { <ChatMessage message=message /> }
                        />
                    </Show>

                    <Show when=move || state.is_sending.get()>
                        <TypingIndicator />
                    </Show>

                    <div node_ref=messages_end_ref></div>
                </div>
            </div>

            // Input area
            <div class="max-w-4xl mx-auto w-full">
                <ChatInput
                    value=input
                    on_submit=on_submit
                    textarea_ref=textarea_ref
                    disabled=Signal::derive(move || state.is_sending.get())
                />
            </div>
        </div>
    }
}

/// Location and crop sent with each question, plus the clear button
#[component]
fn ContextBar() -> impl IntoView {
    let state = expect_context::<AppState>();

    let set_location = move |ev: web_sys::Event| {
        let location = event_target_value(&ev);
        state
            .context
            .update(|context: &mut ChatContext| context.location = location);
    };
    let set_crop = move |ev: web_sys::Event| {
        let crop_type = event_target_value(&ev);
        state
            .context
            .update(|context: &mut ChatContext| context.crop_type = crop_type);
    };

    view! {
        <div class="border-b border-slate-800 bg-slate-900/80">
            <div class="max-w-4xl mx-auto px-4 py-2 flex flex-wrap items-center gap-3 text-sm">
                <label class="flex items-center gap-2 text-slate-400">
                    "Location"
                    <input
                        type="text"
                        prop:value=move || state.context.get().location
                        on:change=set_location
                        class="input py-1 px-2 w-44"
                    />
                </label>
                <label class="flex items-center gap-2 text-slate-400">
                    "Crop"
                    <input
                        type="text"
                        prop:value=move || state.context.get().crop_type
                        on:change=set_crop
                        class="input py-1 px-2 w-32"
                    />
                </label>
                <div class="flex-1"></div>
                <button
                    on:click=move |_| state.clear_chat()
                    disabled=move || state.messages.get().is_empty() || state.is_sending.get()
                    class="btn btn-ghost text-xs"
                >
                    "Clear chat"
                </button>
            </div>
        </div>
    }
}
