//! Webhook server for the civilization bot.
//!
//! One stateless axum service: Telegram posts each chat update to
//! `/webhook`, the dispatcher applies passive accrual and at most one
//! command, and the response is always a fast `200 {"ok": true}` so the
//! Bot API never amplifies internal failures into retry storms. A small
//! REST API exposes the leaderboard and the accrual/raid operations for
//! non-Telegram callers.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with env overrides
//! - [`state`] -- Shared [`AppState`] (store + transport)
//! - [`router`] -- Route table and middleware
//! - [`webhook`] -- The always-acknowledging webhook endpoint
//! - [`dispatch`] -- Event processing: accrual, command handling, raids
//! - [`api`] -- REST endpoints
//! - [`server`] -- TCP bind and serve lifecycle
//! - [`error`] -- API error responses

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod router;
pub mod server;
pub mod state;
pub mod webhook;

// Re-export primary types for convenience.
pub use config::BotConfig;
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
