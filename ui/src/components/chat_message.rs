//! Chat message component

use crop_advisor_core::chat::{BreakdownEntry, ChatMessage as Message, MessageKind};
use leptos::prelude::*;

/// Render a single chat message
#[component]
pub fn ChatMessage(message: Message) -> impl IntoView {
    let is_user = message.kind == MessageKind::User;
    let has_breakdown = !message.breakdown.is_empty();

    let (avatar, avatar_class) = match message.kind {
        MessageKind::User => ("👤", "bg-gradient-to-br from-blue-500 to-cyan-500"),
        MessageKind::Assistant => ("🌾", "bg-gradient-to-br from-green-500 to-emerald-600"),
        MessageKind::Error => ("⚠", "bg-red-600"),
    };
    let bubble_class = match message.kind {
        MessageKind::User => "bg-blue-600 text-white rounded-tr-sm",
        MessageKind::Assistant => "bg-slate-800 text-slate-100 rounded-tl-sm",
        MessageKind::Error => "bg-red-900/40 border border-red-700 text-red-200 rounded-tl-sm",
    };

    view! {
        <div class=format!(
            "flex items-start gap-3 message-appear {}",
            if is_user { "flex-row-reverse" } else { "" }
        )>
            // Avatar
            <div class=format!(
                "w-8 h-8 rounded-full flex items-center justify-center text-white text-sm font-medium shrink-0 {}",
                avatar_class
            )>
                {avatar}
            </div>

            // Message content
            <div class=format!(
                "flex flex-col gap-1 max-w-[80%] {}",
                if is_user { "items-end" } else { "items-start" }
            )>
                <span class="text-xs text-slate-500 font-medium">{message.sender()}</span>

                // Message bubble
                <div class=format!("px-4 py-3 rounded-2xl {}", bubble_class)>
                    <div class="whitespace-pre-wrap break-words">{message.content.clone()}</div>
                </div>

                // Expert breakdown
                {has_breakdown.then(|| view! {
                    <ExpertBreakdown entries=message.breakdown.clone() />
                })}

                // Timestamp
                <span class="text-xs text-slate-600 mt-1">
                    {message.created_at.with_timezone(&chrono::Local).format("%H:%M").to_string()}
                </span>
            </div>
        </div>
    }
}

/// Confidence bars for each expert that contributed to an answer
#[component]
fn ExpertBreakdown(entries: Vec<BreakdownEntry>) -> impl IntoView {
    view! {
        <div class="w-full mt-2 bg-slate-800/50 border border-slate-700 rounded-lg p-3 text-sm">
            <div class="font-medium text-slate-300 mb-2">"Expert Analysis"</div>
            {entries.into_iter().map(|entry| {
                let percent = entry.percent();
                view! {
                    <div class="flex items-center gap-2 mb-1">
                        <span class="w-36 text-xs text-slate-400 truncate">{entry.label()}</span>
                        <div class="flex-1 h-2 bg-slate-700 rounded-full overflow-hidden">
                            <div
                                class="h-full bg-green-500 rounded-full"
                                style=format!("width: {}%", percent)
                            ></div>
                        </div>
                        <span class="w-10 text-right text-xs text-slate-400">
                            {format!("{}%", percent)}
                        </span>
                    </div>
                }
            }).collect::<Vec<_>>()}
        </div>
    }
}
