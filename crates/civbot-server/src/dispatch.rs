//! Event processing: passive accrual, command handling, raid resolution.
//!
//! One inbound update flows through here exactly once: dedup check,
//! passive accrual, then at most one command branch. Two operation
//! categories exist on purpose:
//!
//! - **best-effort**: the dedup check and passive accrual never block the
//!   rest of the event; their failures are logged and processing continues.
//! - **must-succeed**: purchase and raid mutations propagate their errors,
//!   and success is only reported to the user after the storage write
//!   committed.
//!
//! Domain errors become explanatory chat messages; infrastructure errors
//! are logged and swallowed so the webhook acknowledgment never fails.

use chrono::Utc;
use civbot_db::{DbError, GroupStore};
use civbot_engine::combat::{self, RaidPlan};
use civbot_engine::economy::{self, BASE_INCOME, MARKET_INCOME_BONUS, ShopItem};
use civbot_engine::{format, Command, GameError};
use civbot_telegram::{TelegramUpdate, TransportError};
use civbot_types::{ChatId, CityTier, InboundEvent};
use tracing::{debug, warn};

use crate::state::AppState;

/// Entries shown by the `/top` command.
const LEADERBOARD_LIMIT: i64 = 10;

/// Raid application attempts before giving up on a raced defender.
const RAID_ATTEMPTS: u32 = 2;

/// Anything that can go wrong while handling one event.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// A game rule rejected the operation (user-facing).
    #[error(transparent)]
    Game(#[from] GameError),

    /// The storage layer failed (logged, swallowed).
    #[error("storage error: {0}")]
    Storage(#[from] DbError),

    /// Message delivery failed (logged, swallowed).
    #[error("delivery error: {0}")]
    Delivery(#[from] TransportError),
}

/// Process one webhook update end to end.
///
/// Never returns an error: every failure mode is either converted into a
/// user-facing message or logged, so the caller can acknowledge the
/// delivery unconditionally.
pub async fn process_update(state: &AppState, update: TelegramUpdate) {
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "update without message, ignored");
        return;
    };
    let event = message.to_event();

    // At-least-once delivery dedup. Best-effort: if the check itself
    // fails, the event is processed rather than lost.
    match state.store.begin_event(update.update_id).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(update_id = update.update_id, "duplicate delivery dropped");
            return;
        }
        Err(e) => warn!(
            update_id = update.update_id,
            error = %e,
            "dedup check failed, processing without dedup"
        ),
    }

    // Passive accrual applies to every message, command or not, before
    // any command branch. Best-effort.
    if let Err(e) = state
        .store
        .accrue_passive(
            &event.chat_id,
            &event.display_name(),
            BASE_INCOME,
            MARKET_INCOME_BONUS,
        )
        .await
    {
        warn!(chat_id = %event.chat_id, error = %e, "passive accrual failed");
    }

    let Some(command) = Command::parse(&event.text) else {
        return;
    };

    if let Err(error) = handle_command(state, &event, command).await {
        match error {
            EventError::Game(game) => {
                let text = format::error_text(&game);
                if let Err(e) = state.transport.send_text(&event.chat_id, &text).await {
                    warn!(chat_id = %event.chat_id, error = %e, "failed to deliver error text");
                }
            }
            EventError::Storage(e) => {
                warn!(chat_id = %event.chat_id, error = %e, "storage error while handling command");
            }
            EventError::Delivery(e) => {
                warn!(chat_id = %event.chat_id, error = %e, "delivery error while handling command");
            }
        }
    }
}

async fn handle_command(
    state: &AppState,
    event: &InboundEvent,
    command: Command,
) -> Result<(), EventError> {
    match command {
        Command::Start => {
            let name = event.display_name();
            state.store.upsert_group(&event.chat_id, &name).await?;
            state
                .transport
                .send_text(&event.chat_id, &format::start_confirmation(&name))
                .await?;
        }
        Command::Top => {
            let groups = state.store.top_groups(LEADERBOARD_LIMIT).await?;
            state
                .transport
                .send_text(&event.chat_id, &format::leaderboard(&groups))
                .await?;
        }
        Command::City => {
            let group = state
                .store
                .get_group(&event.chat_id)
                .await?
                .ok_or(GameError::NotRegistered)?;
            let tier = CityTier::from_bricks(group.bricks);
            let caption = format::status_caption(&group);
            let url = format::art_url(&state.art_base_url, tier);
            state
                .transport
                .send_photo(&event.chat_id, &url, &caption)
                .await?;
        }
        Command::Buy(item) => handle_purchase(state, event, item.as_deref()).await?,
        Command::Attack(target) => handle_raid(state, event, target.as_ref()).await?,
    }
    Ok(())
}

async fn handle_purchase(
    state: &AppState,
    event: &InboundEvent,
    item: Option<&str>,
) -> Result<(), EventError> {
    // No item or an unknown one: informational shop menu, no mutation.
    let Some(item) = item.and_then(ShopItem::parse) else {
        state
            .transport
            .send_text(&event.chat_id, &format::shop_menu())
            .await?;
        return Ok(());
    };

    let group = state
        .store
        .get_group(&event.chat_id)
        .await?
        .ok_or(GameError::NotRegistered)?;
    economy::validate_purchase(&group, item)?;

    let applied = match item {
        ShopItem::Market => state.store.try_buy_market(&event.chat_id, item.cost()).await?,
        ShopItem::Wall => state.store.try_buy_wall(&event.chat_id, item.cost()).await?,
    };
    if !applied {
        // The precondition raced away between the read and the update;
        // report against fresh state.
        let fresh = state
            .store
            .get_group(&event.chat_id)
            .await?
            .ok_or(GameError::NotRegistered)?;
        let error = economy::validate_purchase(&fresh, item).err().unwrap_or(
            GameError::InsufficientResources {
                cost: item.cost(),
                have: fresh.bricks,
            },
        );
        return Err(error.into());
    }

    let confirmation = match item {
        ShopItem::Market => format::market_built(),
        ShopItem::Wall => format::wall_built(),
    };
    state.transport.send_text(&event.chat_id, &confirmation).await?;
    Ok(())
}

async fn handle_raid(
    state: &AppState,
    event: &InboundEvent,
    target: Option<&ChatId>,
) -> Result<(), EventError> {
    match resolve_raid(&state.store, &event.chat_id, target).await? {
        RaidResolution::Looted {
            steal,
            wall_reduced,
            attacker_name,
            defender_name,
            defender_id,
        } => {
            state
                .transport
                .send_text(
                    &event.chat_id,
                    &format::raid_victory(steal, &defender_name, wall_reduced),
                )
                .await?;
            state
                .transport
                .send_text(
                    &defender_id,
                    &format::raid_notice(steal, &attacker_name, wall_reduced),
                )
                .await?;
        }
        RaidResolution::NothingToSteal { defender_name } => {
            state
                .transport
                .send_text(&event.chat_id, &format::nothing_to_steal(&defender_name))
                .await?;
        }
        RaidResolution::Raced => {
            state
                .transport
                .send_text(&event.chat_id, &format::raid_fizzled())
                .await?;
        }
    }
    Ok(())
}

/// Terminal outcome of a raid attempt, shared by the webhook and REST paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaidResolution {
    /// Bricks moved and the cooldown was stamped.
    Looted {
        /// Amount transferred.
        steal: i64,
        /// Whether the defender's wall halved it.
        wall_reduced: bool,
        /// Attacker display name, for the defender notification.
        attacker_name: String,
        /// Defender display name, for the attacker summary.
        defender_name: String,
        /// Defender chat, for the notification.
        defender_id: ChatId,
    },
    /// The defender's treasury was empty; nothing moved, no cooldown.
    NothingToSteal {
        /// Defender display name.
        defender_name: String,
    },
    /// Concurrent raids drained the defender between the read and the
    /// transfer on every attempt.
    Raced,
}

/// Validate and apply a raid, retrying once against fresh balances when
/// the conditional transfer loses a race.
pub async fn resolve_raid(
    store: &GroupStore,
    attacker_id: &ChatId,
    target: Option<&ChatId>,
) -> Result<RaidResolution, EventError> {
    for attempt in 0..RAID_ATTEMPTS {
        let attacker = store.get_group(attacker_id).await?;
        let defender = match target {
            Some(t) if t != attacker_id => store.get_group(t).await?,
            _ => None,
        };
        let now = Utc::now();

        let plan = combat::plan_raid(
            attacker_id,
            target,
            attacker.as_ref(),
            defender.as_ref(),
            now,
        )?;

        // A plan implies both lookups succeeded.
        let (Some(attacker), Some(defender)) = (attacker, defender) else {
            return Ok(RaidResolution::Raced);
        };

        match plan {
            RaidPlan::NothingToSteal => {
                return Ok(RaidResolution::NothingToSteal {
                    defender_name: defender.name,
                });
            }
            RaidPlan::Loot { steal, wall_reduced } => {
                if store.apply_raid(attacker_id, &defender.id, steal, now).await? {
                    return Ok(RaidResolution::Looted {
                        steal,
                        wall_reduced,
                        attacker_name: attacker.name,
                        defender_name: defender.name,
                        defender_id: defender.id,
                    });
                }
                debug!(
                    attempt,
                    attacker = %attacker_id,
                    defender = %defender.id,
                    "raid transfer raced, retrying"
                );
            }
        }
    }
    Ok(RaidResolution::Raced)
}
