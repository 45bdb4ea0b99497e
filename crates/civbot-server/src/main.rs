//! Webhook server binary for the civilization bot.
//!
//! # Startup sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `civbot-config.yaml` (env overrides apply)
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Build the Telegram transport
//! 5. Serve the webhook until terminated

use std::sync::Arc;

use civbot_db::{GroupStore, PostgresConfig, PostgresGroupStore, PostgresPool};
use civbot_server::config::BotConfig;
use civbot_server::server::start_server;
use civbot_server::state::AppState;
use civbot_telegram::{TelegramClient, Transport};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("civbot starting");

    let config = BotConfig::load_default()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let pg_config = PostgresConfig::new(&config.database.url)
        .with_max_connections(config.database.max_connections);
    let pool = PostgresPool::connect(&pg_config).await?;
    pool.run_migrations().await?;

    let store = GroupStore::Postgres(PostgresGroupStore::new(pool.pool().clone()));
    let client = TelegramClient::new(&config.telegram.token, &config.telegram.api_base)?;
    let transport = Transport::Telegram(client);

    let state = Arc::new(AppState::new(
        store,
        transport,
        config.game.art_base_url.clone(),
    ));

    start_server(&config.server, state).await?;
    Ok(())
}
