//! Example prompts offered while the transcript is empty.

pub const QUICK_QUESTIONS: [&str; 5] = [
    "When is the best time to plant maize in my region?",
    "How do I control maize stalk borer in Ethiopia?",
    "What fertilizer should I use for clay soil?",
    "Should I plant with the current weather forecast?",
    "How much water does maize need during dry season?",
];

/// Quick question by 1-based position, as listed to the user.
pub fn quick_question(position: usize) -> Option<&'static str> {
    position
        .checked_sub(1)
        .and_then(|i| QUICK_QUESTIONS.get(i).copied())
}
