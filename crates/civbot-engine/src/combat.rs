//! Combat resolver: raid validation, cooldown, and steal computation.
//!
//! A raid is a one-shot transfer of bricks from a defender to an attacker.
//! There is no persisted in-progress state: [`plan_raid`] either rejects
//! the attempt with a [`GameError`] or produces a [`RaidPlan`] that the
//! storage layer applies as a single transaction.
//!
//! The resolution flow:
//! 1. Validate the target (present, not the attacker itself)
//! 2. Check both groups exist
//! 3. Enforce the 60-second attacker cooldown
//! 4. Compute the steal: 10% of the defender's balance, halved by a wall,
//!    minimum 1 while the defender has any bricks at all

use chrono::{DateTime, Utc};
use civbot_types::{ChatId, Group};

use crate::error::GameError;

/// Seconds an attacker must wait between raids.
pub const RAID_COOLDOWN_SECS: i64 = 60;

/// Fraction of the defender's balance taken per raid (one tenth).
const STEAL_DIVISOR: i64 = 10;

/// A validated raid ready to be applied by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidPlan {
    /// Bricks will move from defender to attacker.
    Loot {
        /// Amount transferred. Always >= 1.
        steal: i64,
        /// Whether the defender's wall halved the steal.
        wall_reduced: bool,
    },
    /// The defender's treasury is empty. No transfer, no cooldown stamp.
    NothingToSteal,
}

/// Whole seconds left on the attacker's cooldown, or `None` when expired.
///
/// The remainder is rounded up, so any residual under a second still
/// reports 1s and the value never exceeds [`RAID_COOLDOWN_SECS`].
pub fn remaining_cooldown_secs(
    last_attack_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<i64> {
    let last = last_attack_at?;
    let elapsed_ms = now.signed_duration_since(last).num_milliseconds();
    let cooldown_ms = RAID_COOLDOWN_SECS.saturating_mul(1000);
    if elapsed_ms >= cooldown_ms {
        return None;
    }
    let remaining_ms = cooldown_ms.saturating_sub(elapsed_ms.max(0));
    Some(remaining_ms.saturating_add(999) / 1000)
}

/// Compute the steal amount for a raid against `defender_bricks`.
///
/// `floor(bricks / 10)`, halved (floor again) when the defender owns a
/// wall, floored at 1 so a raid always takes something -- except from an
/// empty treasury, which yields 0.
pub const fn compute_steal(defender_bricks: i64, defender_has_wall: bool) -> i64 {
    if defender_bricks <= 0 {
        return 0;
    }
    let base = defender_bricks / STEAL_DIVISOR;
    let reduced = if defender_has_wall { base / 2 } else { base };
    if reduced < 1 { 1 } else { reduced }
}

/// Validate a raid attempt and compute its plan.
///
/// `attacker` and `defender` are the storage lookups for the attacker's
/// chat and the target (`None` when the row does not exist). Validation
/// order matches the player-visible contract: target errors first, then
/// registration, then cooldown.
pub fn plan_raid(
    attacker_id: &ChatId,
    target_id: Option<&ChatId>,
    attacker: Option<&Group>,
    defender: Option<&Group>,
    now: DateTime<Utc>,
) -> Result<RaidPlan, GameError> {
    let target_id = target_id.ok_or(GameError::MissingTarget)?;
    if target_id == attacker_id {
        return Err(GameError::SelfAttackForbidden);
    }

    let attacker = attacker.ok_or(GameError::NotRegistered)?;
    let defender = defender.ok_or(GameError::TargetNotFound)?;

    if let Some(remaining_secs) = remaining_cooldown_secs(attacker.last_attack_at, now) {
        return Err(GameError::OnCooldown { remaining_secs });
    }

    let steal = compute_steal(defender.bricks, defender.has_wall());
    if steal == 0 {
        return Ok(RaidPlan::NothingToSteal);
    }
    Ok(RaidPlan::Loot {
        steal,
        wall_reduced: defender.has_wall(),
    })
}
