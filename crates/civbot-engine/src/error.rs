//! Domain error kinds for the game rules.
//!
//! These are expected, player-visible outcomes -- not infrastructure
//! failures. The dispatch boundary converts each kind into explanatory
//! chat text via [`crate::format::error_text`] and never lets one fail
//! the webhook acknowledgment.

/// A game rule rejected the requested operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// The acting chat has no registered group yet.
    #[error("group is not registered")]
    NotRegistered,

    /// The raid target does not exist in storage.
    #[error("raid target not found")]
    TargetNotFound,

    /// A group tried to raid itself.
    #[error("self-attack is forbidden")]
    SelfAttackForbidden,

    /// `/attack` was issued without a target ID.
    #[error("raid target is required")]
    MissingTarget,

    /// The attacker raided too recently.
    #[error("raid on cooldown for {remaining_secs}s")]
    OnCooldown {
        /// Whole seconds until the next raid is allowed (ceiling, > 0).
        remaining_secs: i64,
    },

    /// The group cannot afford the purchase.
    #[error("insufficient bricks: need {cost}, have {have}")]
    InsufficientResources {
        /// The price of the item.
        cost: i64,
        /// The group's balance at validation time.
        have: i64,
    },

    /// The group already owns the (one-per-group) item.
    #[error("item already owned")]
    AlreadyOwned,
}
