//! The inbound event handed from the transport layer to the command router.

use serde::{Deserialize, Serialize};

use crate::ids::ChatId;

/// One chat message, reduced to the fields the game cares about.
///
/// Built by the server from a Telegram update; the engine never sees the
/// raw wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// The chat the message came from.
    pub chat_id: ChatId,
    /// The chat's title, if it has one.
    pub chat_title: Option<String>,
    /// The message text. Empty for media-only messages.
    pub text: String,
}

impl InboundEvent {
    /// The display name to register this chat under: the title when
    /// present, otherwise a synthesized placeholder.
    pub fn display_name(&self) -> String {
        self.chat_title
            .clone()
            .unwrap_or_else(|| crate::group::Group::placeholder_name(&self.chat_id))
    }
}
