//! Append-only chat transcript.

use crate::types::{AgentContribution, ChatResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Confidence shown when the backend does not report one.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// Identifier of a message, increasing in send/receive order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
    Error,
}

/// One expert's contribution to an assistant answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    /// Raw `agent_type` from the backend, if it sent one.
    pub topic: Option<String>,
    /// Always within `[0, 1]`.
    pub confidence: f32,
}

impl BreakdownEntry {
    pub fn new(topic: impl Into<String>, confidence: f32) -> Self {
        Self {
            topic: Some(topic.into()),
            confidence: clamp_confidence(confidence),
        }
    }

    /// Human label: `weather_expert` becomes `Weather Expert`.
    pub fn label(&self) -> String {
        match self.topic.as_deref() {
            Some(topic) if !topic.is_empty() => title_case(&topic.replacen('_', " ", 1)),
            _ => "Expert".to_string(),
        }
    }

    /// Confidence as a whole percentage, for bar widths.
    pub fn percent(&self) -> u8 {
        (self.confidence * 100.0).round() as u8
    }
}

impl From<&AgentContribution> for BreakdownEntry {
    fn from(c: &AgentContribution) -> Self {
        Self {
            topic: c.agent_type.clone(),
            confidence: clamp_confidence(c.confidence.unwrap_or(DEFAULT_CONFIDENCE)),
        }
    }
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        DEFAULT_CONFIDENCE
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if at_word_start && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Empty for user and error messages.
    pub breakdown: Vec<BreakdownEntry>,
}

impl ChatMessage {
    /// Sender caption shown above the message.
    pub fn sender(&self) -> &'static str {
        match self.kind {
            MessageKind::User => "You",
            MessageKind::Assistant => "Crop Advisor",
            MessageKind::Error => "Error",
        }
    }
}

/// Ordered list of messages in one chat.
///
/// Messages are only ever appended; [`clear`](Self::clear) is the single way
/// to remove them. Ids keep increasing across clears.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(MessageKind::User, content.into(), Vec::new())
    }

    pub fn push_assistant(&mut self, response: &ChatResponse) -> &ChatMessage {
        let breakdown = response
            .agent_breakdown
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(BreakdownEntry::from)
            .collect();
        self.push(MessageKind::Assistant, response.response.clone(), breakdown)
    }

    pub fn push_error(&mut self, content: impl Into<String>) -> &ChatMessage {
        self.push(MessageKind::Error, content.into(), Vec::new())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn push(
        &mut self,
        kind: MessageKind,
        content: String,
        breakdown: Vec<BreakdownEntry>,
    ) -> &ChatMessage {
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: MessageId(self.next_id),
            kind,
            content,
            created_at: Utc::now(),
            breakdown,
        });
        &self.messages[self.messages.len() - 1]
    }
}
