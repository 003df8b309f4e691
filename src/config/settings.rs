//! Application settings and Telegram configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Telegram API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by `@BotFather`.
    pub bot_token: String,

    /// Telegram API ID (obtain from <https://my.telegram.org>).
    pub api_id: i32,

    /// Telegram API hash (obtain from <https://my.telegram.org>).
    pub api_hash: String,

    /// Path to the session file.
    #[serde(default = "default_session_path")]
    pub session_path: PathBuf,
}

fn default_session_path() -> PathBuf {
    PathBuf::from("bot.session")
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub fn new(bot_token: String, api_id: i32, api_hash: String) -> Self {
        Self {
            bot_token,
            api_id,
            api_hash,
            session_path: default_session_path(),
        }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `BOT_TOKEN`, `TG_API_ID` and `TG_API_HASH` to be set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingEnvVar("BOT_TOKEN"))?;

        let api_id: i32 = lookup("TG_API_ID")
            .ok_or(ConfigError::MissingEnvVar("TG_API_ID"))?
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ConfigError::InvalidApiId)?;

        let api_hash = lookup("TG_API_HASH").ok_or(ConfigError::MissingEnvVar("TG_API_HASH"))?;

        let session_path =
            lookup("TG_SESSION_PATH").map_or_else(default_session_path, PathBuf::from);

        Ok(Self {
            bot_token,
            api_id,
            api_hash,
            session_path,
        })
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_id", &self.api_id)
            .field("session_path", &self.session_path)
            .finish_non_exhaustive()
    }
}

/// Bot-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Destination that receives a copy of every record and export.
    ///
    /// Either `@username` or a Bot API style numeric chat id.
    #[serde(default = "default_broadcast_chat")]
    pub broadcast_chat: String,

    /// Path to the CSV record store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Largest store that will be sent as an export.
    #[serde(default = "default_max_export_bytes")]
    pub max_export_bytes: u64,

    /// Minimum interval between posts to the broadcast destination.
    #[serde(default = "default_broadcast_interval_ms")]
    pub broadcast_interval_ms: u64,
}

fn default_broadcast_chat() -> String {
    "-1002044043990".to_owned()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("fake_data.csv")
}

fn default_max_export_bytes() -> u64 {
    50 * 1024 * 1024 // Bot API upload ceiling
}

fn default_broadcast_interval_ms() -> u64 {
    1000
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            broadcast_chat: default_broadcast_chat(),
            store_path: default_store_path(),
            max_export_bytes: default_max_export_bytes(),
            broadcast_interval_ms: default_broadcast_interval_ms(),
        }
    }
}

impl BotSettings {
    /// Creates bot settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates bot settings from an arbitrary variable lookup with defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            broadcast_chat: lookup("CHANNEL_ID")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_broadcast_chat),
            store_path: lookup("STORE_PATH").map_or_else(default_store_path, PathBuf::from),
            max_export_bytes: lookup("MAX_EXPORT_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_max_export_bytes),
            broadcast_interval_ms: lookup("BROADCAST_INTERVAL_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_broadcast_interval_ms),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid API ID format (must be a positive integer)")]
    InvalidApiId,
}
