//! Example questions offered on an empty chat

use crop_advisor_core::chat::QUICK_QUESTIONS;
use leptos::prelude::*;

/// Clickable list of example questions
#[component]
pub fn QuickQuestions<F>(on_select: F) -> impl IntoView
where
    F: Fn(String) + Clone + 'static,
{
    view! {
        <div class="empty-state h-full">
            <div class="text-5xl mb-4">"🌾"</div>
            <h2 class="empty-state-title">"Ask the Ethiopia Crop Advisor"</h2>
            <p class="empty-state-description">
                "Planting dates, pests, soil, weather and water. Try one of these:"
            </p>

            <div class="quick-prompts w-full max-w-2xl grid sm:grid-cols-2 gap-3">
                {QUICK_QUESTIONS.iter().enumerate().map(|(i, question)| {
                    let question = *question;
                    let on_select = on_select.clone();
                    view! {
                        <button
                            on:click=move |_| on_select(question.to_string())
                            class=format!("quick-prompt text-left animate-fade-in-up stagger-{}", (i % 5) + 1)
                        >
                            {question}
                        </button>
                    }
                }).collect::<Vec<_>>()}
            </div>
        </div>
    }
}
