//! Inbound webhook wire types.
//!
//! Only the fields the game reads are modeled; everything else in the
//! update payload is ignored by serde. Missing optional fields are
//! tolerated -- an update without a message is acknowledged and dropped
//! by the server.

use civbot_types::{ChatId, InboundEvent};
use serde::Deserialize;

/// One webhook delivery from Telegram.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    /// Monotonic update identifier; the dedup key for at-least-once
    /// delivery.
    pub update_id: i64,
    /// The message, when this update carries one.
    #[serde(default)]
    pub message: Option<TelegramMessage>,
}

/// A chat message inside an update.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    /// The chat the message was sent in.
    pub chat: TelegramChat,
    /// Message text. Absent for media-only messages.
    #[serde(default)]
    pub text: Option<String>,
}

/// The chat header of a message.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    /// Numeric chat identifier (negative for group chats).
    pub id: i64,
    /// Group chat title, when present.
    #[serde(default)]
    pub title: Option<String>,
}

impl TelegramMessage {
    /// Reduce the wire message to the event the engine consumes.
    pub fn to_event(&self) -> InboundEvent {
        InboundEvent {
            chat_id: ChatId::from(self.chat.id),
            chat_title: self.chat.title.clone(),
            text: self.text.clone().unwrap_or_default().trim().to_owned(),
        }
    }
}
