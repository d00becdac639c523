//! Chat transcript and the request/response cycle around it.

mod quick;
mod session;
mod transcript;

pub use quick::{quick_question, QUICK_QUESTIONS};
pub use session::{ChatApi, ChatSession, PendingSend, SendOutcome, SendRejected};
pub use transcript::{
    BreakdownEntry, ChatMessage, MessageId, MessageKind, Transcript, DEFAULT_CONFIDENCE,
};

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "Central Ethiopia";
pub const DEFAULT_CROP_TYPE: &str = "maize";

/// Farm context sent alongside every question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    pub location: String,
    pub crop_type: String,
}

impl ChatContext {
    pub fn new(location: impl Into<String>, crop_type: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            crop_type: crop_type.into(),
        }
    }
}

impl Default for ChatContext {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION, DEFAULT_CROP_TYPE)
    }
}
