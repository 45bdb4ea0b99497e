//! Error types for the transport layer.
//!
//! Delivery failures are infrastructure errors: the dispatch boundary
//! logs them and still acknowledges the webhook, so Telegram never
//! retries an already-processed update because of a send failure.

/// Errors that can occur while talking to the Telegram Bot API.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request failed (timeout, connection, TLS).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The Bot API answered with a non-success status.
    #[error("Telegram API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, for the log line.
        body: String,
    },

    /// The HTTP client could not be constructed.
    #[error("client setup error: {0}")]
    Setup(String),
}
