//! Shared type definitions for the civilization bot.
//!
//! This crate is the single source of truth for the data types used across
//! the workspace. It holds no logic beyond pure classification (city tiers)
//! and identifier plumbing, so every other crate can depend on it without
//! pulling in I/O concerns.
//!
//! # Modules
//!
//! - [`ids`] -- The [`ChatId`] identifier newtype
//! - [`group`] -- The [`Group`] record (one civilization per chat)
//! - [`city`] -- [`CityTier`] classification derived from brick balance
//! - [`event`] -- The [`InboundEvent`] handed to the command router

pub mod city;
pub mod event;
pub mod group;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use city::CityTier;
pub use event::InboundEvent;
pub use group::Group;
pub use ids::ChatId;
