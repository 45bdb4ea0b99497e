//! Shared application state for the webhook server.

use civbot_db::GroupStore;
use civbot_telegram::Transport;

/// Dependencies injected into every handler via axum's `State` extractor.
///
/// Wrapped in an `Arc` by the router. The engine itself is stateless;
/// everything durable lives behind [`GroupStore`].
#[derive(Debug, Clone)]
pub struct AppState {
    /// Storage backend (`PostgreSQL` in production, in-memory in tests).
    pub store: GroupStore,
    /// Outbound message delivery.
    pub transport: Transport,
    /// Base URL under which the city art assets are hosted.
    pub art_base_url: String,
}

impl AppState {
    /// Assemble the application state.
    pub const fn new(store: GroupStore, transport: Transport, art_base_url: String) -> Self {
        Self {
            store,
            transport,
            art_base_url,
        }
    }
}
