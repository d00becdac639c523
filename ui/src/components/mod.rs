//! Reusable UI components

pub mod auth_gate;
pub mod chat_input;
pub mod chat_message;
pub mod header;
pub mod loading;
pub mod quick_questions;

pub use auth_gate::AuthGate;
pub use chat_input::ChatInput;
pub use chat_message::ChatMessage;
pub use header::Header;
pub use loading::{LoadingOverlay, TypingIndicator};
pub use quick_questions::QuickQuestions;
