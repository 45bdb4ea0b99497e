//! Pure game logic for the civilization bot.
//!
//! This crate contains everything that decides *what happens* without
//! touching I/O. It sits between `civbot-types` (which defines the data
//! structures) and the server crate (which handles persistence and
//! delivery). Every function here is deterministic given its inputs, so
//! the whole rule set is unit-testable with plain values.
//!
//! # Modules
//!
//! - [`command`] -- Command router: raw message text to [`Command`]
//! - [`economy`] -- Passive accrual rates, shop items, purchase validation
//! - [`combat`] -- Raid validation, cooldown, and steal computation
//! - [`format`] -- Presentation formatter: results to user-facing strings
//! - [`error`] -- Domain error kinds ([`GameError`])

pub mod combat;
pub mod command;
pub mod economy;
pub mod error;
pub mod format;

// Re-export primary types at crate root for convenience.
pub use combat::{plan_raid, RaidPlan, RAID_COOLDOWN_SECS};
pub use command::Command;
pub use economy::{passive_income, ShopItem, MARKET_COST, WALL_COST};
pub use error::GameError;
