//! Presentation formatter: resolver outputs to user-facing text.
//!
//! Pure string mapping, Markdown flavored for Telegram. No storage or
//! network calls happen here; the dispatcher feeds in resolved values and
//! ships the strings to the transport layer.

use civbot_types::{CityTier, Group};

use crate::economy::{MARKET_COST, MARKET_INCOME_BONUS, WALL_COST};
use crate::error::GameError;

/// Confirmation sent after `/start`.
pub fn start_confirmation(name: &str) -> String {
    format!("🏰 Civilization started for *{name}*")
}

/// The `/top` leaderboard block.
///
/// Groups arrive already ordered by bricks descending (ties by insertion
/// order); this function only renders.
pub fn leaderboard(groups: &[Group]) -> String {
    let mut text = String::from("🏆 *Top Cities*\n\n");
    for (index, group) in groups.iter().enumerate() {
        let rank = index.saturating_add(1);
        let mut icons = String::new();
        if group.markets > 0 {
            icons.push('🏪');
        }
        if group.has_wall() {
            icons.push_str("🛡️");
        }
        text.push_str(&format!(
            "{rank}. *{}* — {} 🧱 {icons}\n🆔 `{}`\n\n",
            group.name, group.bricks, group.id
        ));
    }
    text
}

/// The `/city` status caption. Pairs with [`CityTier::art_file`].
pub fn status_caption(group: &Group) -> String {
    let tier = CityTier::from_bricks(group.bricks);
    let mut caption = format!(
        "🏙️ *{}*\n{}\nBricks: *{}* 🧱",
        group.name,
        tier.title(),
        group.bricks
    );
    if group.markets > 0 {
        let bonus = group.markets.saturating_mul(MARKET_INCOME_BONUS);
        caption.push_str(&format!(
            "\n🏪 Markets: *{}* (+{bonus}/msg)",
            group.markets
        ));
    }
    if group.has_wall() {
        caption.push_str(&format!("\n🛡️ Walls: *{}* (-50% Dmg)", group.walls));
    }
    caption
}

/// The shop menu shown for `/buy` with no or an unknown item.
pub fn shop_menu() -> String {
    format!(
        "🛒 *Marketplace*\n\n\
         1️⃣ `/buy market` ({MARKET_COST} 🧱)\n   _Generates +{MARKET_INCOME_BONUS} bricks/msg_\n\n\
         2️⃣ `/buy wall` ({WALL_COST} 🧱)\n   _Reduces enemy attacks by 50%_"
    )
}

/// Confirmation for a market purchase.
pub fn market_built() -> String {
    format!("✅ Market Built! (+{MARKET_INCOME_BONUS} income)")
}

/// Confirmation for the wall purchase.
pub fn wall_built() -> String {
    String::from("✅ **Great Wall Constructed!**\nEnemy attacks are now 50% weaker.")
}

/// Attacker-facing raid summary.
pub fn raid_victory(steal: i64, defender_name: &str, wall_reduced: bool) -> String {
    format!(
        "⚔️ Victory! Stole {steal} bricks from {defender_name}!{}",
        wall_note(wall_reduced)
    )
}

/// Defender-facing raid notification.
pub fn raid_notice(steal: i64, attacker_name: &str, wall_reduced: bool) -> String {
    format!(
        "⚠️ Attacked by {attacker_name}! Lost {steal} bricks.{}",
        wall_note(wall_reduced)
    )
}

/// Attacker-facing message when the defender's treasury is empty.
pub fn nothing_to_steal(defender_name: &str) -> String {
    format!("🕸️ {defender_name} has nothing to steal.")
}

/// Attacker-facing message when concurrent raids drained the defender
/// before the transfer could commit.
pub fn raid_fizzled() -> String {
    String::from("⚔️ The raid came back empty-handed. Try again.")
}

/// Full URL of a tier's art asset under the configured base.
pub fn art_url(base: &str, tier: CityTier) -> String {
    format!("{}/{}", base.trim_end_matches('/'), tier.art_file())
}

/// One user-facing line per domain error kind.
pub fn error_text(error: &GameError) -> String {
    match error {
        GameError::NotRegistered => String::from("Use /start first."),
        GameError::TargetNotFound => String::from("❌ Target not found."),
        GameError::SelfAttackForbidden => String::from("❌ Cannot attack self."),
        GameError::MissingTarget => String::from("⚔️ Usage: `/attack <ID>`"),
        GameError::OnCooldown { remaining_secs } => {
            format!("⌛ Wait {remaining_secs}s.")
        }
        GameError::InsufficientResources { cost, have } => {
            format!("❌ Need {cost} bricks. Have: {have}")
        }
        GameError::AlreadyOwned => String::from("❌ You already have a Wall!"),
    }
}

const fn wall_note(wall_reduced: bool) -> &'static str {
    if wall_reduced {
        " (🛡️ Wall blocked 50%!)"
    } else {
        ""
    }
}
