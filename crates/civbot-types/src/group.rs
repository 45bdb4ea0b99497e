//! The [`Group`] record: one civilization per Telegram group chat.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ChatId;

/// A civilization owned by a single group chat.
///
/// Created implicitly on first contact (passive accrual upserts the row)
/// or explicitly via `/start`, mutated by every subsequent accrual,
/// purchase, or raid, and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// The owning chat's identifier.
    pub id: ChatId,
    /// Display name; defaults to `Group <id>` when the chat has no title.
    pub name: String,
    /// Current brick balance. Never negative.
    pub bricks: i64,
    /// Number of markets owned. Each adds +2 bricks per message.
    pub markets: i64,
    /// Walls owned: 0 or 1. A wall halves incoming raid losses.
    pub walls: i64,
    /// When this group last initiated a raid, if ever.
    pub last_attack_at: Option<DateTime<Utc>>,
    /// Row insertion stamp; used as the leaderboard tie-break.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create a freshly registered group with an empty treasury.
    pub fn new(id: ChatId, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            bricks: 0,
            markets: 0,
            walls: 0,
            last_attack_at: None,
            created_at,
        }
    }

    /// Whether this group owns a wall.
    pub const fn has_wall(&self) -> bool {
        self.walls > 0
    }

    /// Synthesize a placeholder display name for a chat with no title.
    pub fn placeholder_name(id: &ChatId) -> String {
        format!("Group {id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_group_starts_empty() {
        let g = Group::new(ChatId::new("1"), "Testers", Utc::now());
        assert_eq!(g.bricks, 0);
        assert_eq!(g.markets, 0);
        assert!(!g.has_wall());
        assert!(g.last_attack_at.is_none());
    }

    #[test]
    fn placeholder_name_embeds_the_chat_id() {
        let id = ChatId::new("-100555");
        assert_eq!(Group::placeholder_name(&id), "Group -100555");
    }
}
