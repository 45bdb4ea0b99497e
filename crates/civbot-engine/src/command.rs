//! Command router: classifies raw message text into a [`Command`].
//!
//! The first whitespace-delimited token is the command. Telegram appends
//! an addressing tag in group chats (`/city@SomeBot`), which is stripped
//! before the case-sensitive comparison. Anything unrecognized matches no
//! command; passive accrual still applies to those messages, but that is
//! the dispatcher's job, not the router's.

use civbot_types::ChatId;

/// A recognized chat command with its parsed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` -- register the group under its chat title.
    Start,
    /// `/city` -- show the group's status card.
    City,
    /// `/top` -- show the leaderboard.
    Top,
    /// `/buy [item]` -- purchase an upgrade, or show the shop menu.
    Buy(Option<String>),
    /// `/attack [target]` -- raid another group by its chat ID.
    Attack(Option<ChatId>),
}

impl Command {
    /// Parse message text into a command, or `None` for plain chatter.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let first = parts.next()?;
        // Strip the @BotName addressing tag Telegram adds in groups.
        let bare = first.split('@').next().unwrap_or(first);

        match bare {
            "/start" => Some(Self::Start),
            "/city" => Some(Self::City),
            "/top" => Some(Self::Top),
            "/buy" => Some(Self::Buy(parts.next().map(str::to_owned))),
            "/attack" => Some(Self::Attack(parts.next().map(ChatId::from))),
            _ => None,
        }
    }
}
