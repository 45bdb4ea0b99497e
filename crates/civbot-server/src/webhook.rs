//! The Telegram webhook endpoint.
//!
//! The Bot API retries any non-2xx response, so this handler answers
//! `200 {"ok": true}` unconditionally: for non-POST probes, for bodies
//! that are not an update, and for updates whose processing failed
//! internally. Processing errors are logged inside the dispatcher.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::Json;
use civbot_telegram::TelegramUpdate;
use tracing::debug;

use crate::dispatch;
use crate::state::AppState;

/// Handle one webhook delivery. Always acknowledges.
pub async fn handle_webhook(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Json<serde_json::Value> {
    if method != Method::POST {
        return ack();
    }

    let update: TelegramUpdate = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            debug!(error = %e, "webhook body is not an update, acknowledged");
            return ack();
        }
    };

    dispatch::process_update(&state, update).await;
    ack()
}

/// The unconditional success acknowledgment.
fn ack() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
