//! Type-safe identifier wrapper for Telegram chats.
//!
//! Telegram chat identifiers arrive as signed 64-bit integers on the wire
//! but are stored and compared as strings (the storage layer keys on the
//! string form, and group chat IDs can be negative). The newtype prevents
//! accidental mixing of chat IDs with other string fields at compile time.

use serde::{Deserialize, Serialize};

/// Stable identifier of a Telegram chat, stored in string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    /// Create a chat ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ChatId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChatId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ChatId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}
