//! Axum router construction.
//!
//! Assembles the webhook and REST routes into a single [`Router`] with
//! request tracing enabled.

use std::sync::Arc;

use axum::response::Html;
use axum::routing::{any, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{api, webhook};

/// Build the complete router.
///
/// - `POST /webhook` -- Telegram update ingestion (any method acknowledges)
/// - `GET /` -- minimal HTML status page
/// - `GET /api/leaderboard` -- top 20 groups
/// - `GET /api/groups` -- all groups
/// - `POST /api/groups/brick` -- manual accrual tick
/// - `POST /api/groups/raid` -- raid resolution
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        // The Bot API retries non-2xx responses, so every method on the
        // webhook path acknowledges.
        .route("/webhook", any(webhook::handle_webhook))
        .route("/api/leaderboard", get(api::leaderboard))
        .route("/api/groups", get(api::list_groups))
        .route("/api/groups/brick", post(api::add_brick))
        .route("/api/groups/raid", post(api::raid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve a minimal HTML page with server status and API links.
async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>Civbot</title></head>
<body>
    <h1>Civbot</h1>
    <p>Status: RUNNING</p>
    <ul>
        <li><a href="/api/leaderboard">/api/leaderboard</a> -- top cities</li>
        <li><a href="/api/groups">/api/groups</a> -- all groups</li>
    </ul>
</body>
</html>"#,
    )
}
