//! Chat input component

use leptos::html::Textarea;
use leptos::prelude::*;
use web_sys::HtmlTextAreaElement;

/// Chat input with auto-resize textarea
#[component]
pub fn ChatInput(
    /// Current input value
    value: RwSignal<String>,
    /// Called when user submits
    on_submit: impl Fn() + 'static + Clone,
    /// Handle to the textarea, so callers can focus it
    textarea_ref: NodeRef<Textarea>,
    /// Whether input is disabled
    #[prop(into)]
    disabled: Signal<bool>,
    /// Placeholder text
    #[prop(default = "Ask about planting, pests, soil or weather...")]
    placeholder: &'static str,
) -> impl IntoView {
    // Auto-resize textarea
    let resize_textarea = move || {
        if let Some(textarea) = textarea_ref.get() {
            let el: &HtmlTextAreaElement = textarea.as_ref();
            let new_height = el.scroll_height().min(200);
            let _ = el.set_attribute("style", &format!("height: {}px; max-height: 200px;", new_height));
        }
    };

    let on_input = move |ev: web_sys::Event| {
        value.set(event_target_value(&ev));
        resize_textarea();
    };

    // Enter submits, Shift+Enter inserts a newline
    let on_keydown = {
        let on_submit = on_submit.clone();
        move |ev: web_sys::KeyboardEvent| {
            if ev.key() == "Enter" && !ev.shift_key() {
                ev.prevent_default();
                if !disabled.get_untracked() && !value.get_untracked().trim().is_empty() {
                    on_submit();
                }
            }
        }
    };

    let on_button_click = {
        let on_submit = on_submit.clone();
        move |_| {
            if !value.get_untracked().trim().is_empty() {
                on_submit();
            }
        }
    };

    let is_empty = Signal::derive(move || value.get().trim().is_empty());

    view! {
        <div class="flex items-end gap-3 p-4 bg-slate-800/50 backdrop-blur-sm border-t border-slate-700">
            <div class="flex-1 relative">
                <textarea
                    node_ref=textarea_ref
                    prop:value=move || value.get()
                    on:input=on_input
                    on:keydown=on_keydown
                    placeholder=placeholder
                    disabled=move || disabled.get()
                    rows="1"
                    class="w-full px-4 py-3 bg-slate-900 border border-slate-700 rounded-xl resize-none
                           text-slate-100 placeholder-slate-500
                           focus:outline-none focus:ring-2 focus:ring-green-500 focus:border-transparent
                           disabled:opacity-50 disabled:cursor-not-allowed"
                    style="max-height: 200px;"
                ></textarea>
            </div>

            <button
                on:click=on_button_click
                disabled=move || disabled.get() || is_empty.get()
                class="p-3 bg-green-600 hover:bg-green-700 disabled:bg-slate-700
                       disabled:cursor-not-allowed rounded-xl transition-colors
                       focus:outline-none focus:ring-2 focus:ring-green-500 focus:ring-offset-2 focus:ring-offset-slate-900"
            >
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    class="w-5 h-5 text-white"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                >
                    <line x1="22" y1="2" x2="11" y2="13"></line>
                    <polygon points="22 2 15 22 11 13 2 9 22 2"></polygon>
                </svg>
            </button>
        </div>
    }
}
