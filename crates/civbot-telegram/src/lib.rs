//! Telegram transport for the civilization bot.
//!
//! Delivery is a thin HTTP wrapper around the Bot API: `sendMessage` and
//! `sendPhoto`, with the mandated fallback that a failed photo delivers
//! its caption as plain text so the user always receives a reply.
//! Requests carry a short timeout and a failed text send is retried once,
//! then the error propagates to the boundary where it is logged.
//!
//! # Modules
//!
//! - [`client`] -- The [`TelegramClient`] HTTP wrapper
//! - [`transport`] -- [`Transport`] enum dispatch (live client or a
//!   recording fake for tests)
//! - [`update`] -- Inbound webhook wire types
//! - [`error`] -- [`TransportError`]

pub mod client;
pub mod error;
pub mod transport;
pub mod update;

// Re-export primary types for convenience.
pub use client::TelegramClient;
pub use error::TransportError;
pub use transport::{Outbound, RecordingTransport, Transport};
pub use update::{TelegramChat, TelegramMessage, TelegramUpdate};
