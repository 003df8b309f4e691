//! Configuration module for the fake data bot.
//!
//! Handles loading of Telegram API credentials and bot settings from the
//! environment.

mod settings;

pub use settings::{BotSettings, ConfigError, TelegramConfig};
