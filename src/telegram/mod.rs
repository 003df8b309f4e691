//! Telegram client wrapper module.
//!
//! Connects the bot account, feeds inbound commands and button presses to
//! the command handler, and delivers its replies.

mod broadcast;
mod client;
mod rate_limiter;
mod target;

pub use client::{TelegramBot, TelegramError};
pub use rate_limiter::RateLimiter;
pub use target::BroadcastTarget;
