use chrono::{DateTime, Utc};

pub type MessageId = u64;

/// Opening line of every transcript.
pub const CHAT_GREETING: &str =
    "Hello! I'm your virtual pharmacy assistant. How can I help with your medication questions today?";

/// Appended in place of a reply when the provider call fails.
pub const CHAT_FALLBACK_REPLY: &str =
    "Sorry, I'm having technical trouble right now. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// One transcript entry. Never changed after it is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
