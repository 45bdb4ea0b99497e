//! Transport dispatch: the live Telegram client or a recording fake.
//!
//! Async methods are not dyn-compatible in trait objects, so the
//! transport is an enum, mirroring how the storage layer dispatches over
//! backends. The recording variant captures outbound messages for
//! integration tests (and doubles as a dry-run mode).

use std::sync::{Arc, Mutex};

use civbot_types::ChatId;

use crate::client::TelegramClient;
use crate::error::TransportError;

/// An outbound delivery captured by the recording transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A plain text message.
    Text {
        /// Destination chat.
        chat_id: ChatId,
        /// Message body.
        text: String,
    },
    /// A photo with caption.
    Photo {
        /// Destination chat.
        chat_id: ChatId,
        /// Asset URL.
        photo_url: String,
        /// Caption body.
        caption: String,
    },
}

/// Message delivery backend.
#[derive(Debug, Clone)]
pub enum Transport {
    /// Live Telegram Bot API client.
    Telegram(TelegramClient),
    /// Captures messages instead of sending them.
    Recording(RecordingTransport),
}

impl Transport {
    /// Deliver a text message to a chat.
    pub async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<(), TransportError> {
        match self {
            Self::Telegram(client) => client.send_message(chat_id, text).await,
            Self::Recording(recorder) => {
                recorder.push(Outbound::Text {
                    chat_id: chat_id.clone(),
                    text: text.to_owned(),
                });
                Ok(())
            }
        }
    }

    /// Deliver a photo with caption, falling back to text on failure.
    pub async fn send_photo(
        &self,
        chat_id: &ChatId,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        match self {
            Self::Telegram(client) => client.send_photo(chat_id, photo_url, caption).await,
            Self::Recording(recorder) => {
                recorder.push(Outbound::Photo {
                    chat_id: chat_id.clone(),
                    photo_url: photo_url.to_owned(),
                    caption: caption.to_owned(),
                });
                Ok(())
            }
        }
    }
}

/// Transport fake that records every outbound message.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Outbound>>>,
}

impl RecordingTransport {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far, in order.
    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    fn push(&self, outbound: Outbound) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(outbound);
        }
    }
}
