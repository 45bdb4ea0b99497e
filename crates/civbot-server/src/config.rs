//! Configuration loading for the bot server.
//!
//! The canonical configuration lives in `civbot-config.yaml` at the
//! project root. Environment variables override the secrets and
//! connection strings so deployments never need them in the file:
//! `TELEGRAM_BOT_TOKEN`, `DATABASE_URL`, and `BIND_ADDR` (`host:port`).

use std::path::Path;

use serde::Deserialize;

use crate::server::ServerConfig;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "civbot-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level bot configuration. Mirrors `civbot-config.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotConfig {
    /// Telegram Bot API settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// `PostgreSQL` settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Game presentation settings.
    #[serde(default)]
    pub game: GameConfig,
}

impl BotConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load `civbot-config.yaml` when present, defaults otherwise.
    /// Env overrides apply in both cases.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("TELEGRAM_BOT_TOKEN") {
            self.telegram.token = token;
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            if let Some((host, port)) = addr.rsplit_once(':') {
                if let Ok(port) = port.parse() {
                    self.server.host = host.to_owned();
                    self.server.port = port;
                }
            }
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token; usually supplied via `TELEGRAM_BOT_TOKEN`.
    #[serde(default)]
    pub token: String,
    /// Bot API host, overridable for tests and local Bot API servers.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: default_api_base(),
        }
    }
}

fn default_api_base() -> String {
    civbot_telegram::client::DEFAULT_API_BASE.to_owned()
}

/// `PostgreSQL` settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL; usually supplied via `DATABASE_URL`.
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum pool connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    String::from("postgresql://localhost:5432/civbot")
}

const fn default_max_connections() -> u32 {
    10
}

/// Game presentation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    /// Base URL for the city art assets (four tier images).
    #[serde(default = "default_art_base_url")]
    pub art_base_url: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            art_base_url: default_art_base_url(),
        }
    }
}

fn default_art_base_url() -> String {
    String::from("https://raw.githubusercontent.com/iftip/civilization-backend/main/api/images")
}
