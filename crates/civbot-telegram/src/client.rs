//! HTTP client for the Telegram Bot API.
//!
//! All calls are bounded by a short request timeout. A failed text send
//! is retried exactly once, then the error propagates. Photo sends fall
//! back to a plain text message carrying the caption, so the chat always
//! receives a response even when the image host is unreachable.

use std::time::Duration;

use civbot_types::ChatId;

use crate::error::TransportError;

/// Request timeout for every Bot API call.
const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default Bot API host.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Thin wrapper over the Telegram Bot API send endpoints.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramClient {
    /// Create a client for the given bot token.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(token: &str, api_base: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Setup(format!("reqwest client: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
        })
    }

    /// Send a Markdown text message. Retries once on failure.
    pub async fn send_message(
        &self,
        chat_id: &ChatId,
        text: &str,
    ) -> Result<(), TransportError> {
        let body = serde_json::json!({
            "chat_id": chat_id.as_str(),
            "text": text,
            "parse_mode": "Markdown",
        });
        if let Err(first) = self.call("sendMessage", &body).await {
            tracing::warn!(chat_id = %chat_id, error = %first, "sendMessage failed, retrying once");
            return self.call("sendMessage", &body).await;
        }
        Ok(())
    }

    /// Send a photo with a Markdown caption.
    ///
    /// If photo delivery fails for any reason, the caption is delivered
    /// as a plain text message instead.
    pub async fn send_photo(
        &self,
        chat_id: &ChatId,
        photo_url: &str,
        caption: &str,
    ) -> Result<(), TransportError> {
        let body = serde_json::json!({
            "chat_id": chat_id.as_str(),
            "photo": photo_url,
            "caption": caption,
            "parse_mode": "Markdown",
        });
        if let Err(photo_err) = self.call("sendPhoto", &body).await {
            tracing::warn!(
                chat_id = %chat_id,
                error = %photo_err,
                "sendPhoto failed, falling back to text"
            );
            return self.send_message(chat_id, caption).await;
        }
        Ok(())
    }

    /// POST one Bot API method and check the HTTP status.
    async fn call(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> Result<(), TransportError> {
        let url = format!("{}/bot{}/{method}", self.api_base, self.token);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unable to read error body"));
            return Err(TransportError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
