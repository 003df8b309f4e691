//! Broadcast destination parsing.

use std::fmt;

use super::TelegramError;

/// Offset Bot API adds to channel and supergroup ids (`-100…`).
const CHANNEL_ID_OFFSET: i64 = 1_000_000_000_000;

/// A broadcast destination as written in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastTarget {
    /// Public `@username` of a channel, group or user.
    Username(String),

    /// Channel or supergroup, by its MTProto id.
    Channel(i64),

    /// Basic group, by its MTProto id.
    Group(i64),

    /// Private chat with a user.
    User(i64),
}

impl BroadcastTarget {
    /// Parses `@username` or a Bot API style chat id.
    ///
    /// Bot API ids encode the peer kind: `-100…` is a channel, any other
    /// negative id a basic group and a positive id a user.
    pub fn parse(raw: &str) -> Result<Self, TelegramError> {
        let raw = raw.trim();
        let invalid = || TelegramError::InvalidBroadcastTarget(raw.to_owned());

        if let Some(name) = raw.strip_prefix('@') {
            let valid = !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            return if valid {
                Ok(Self::Username(name.to_owned()))
            } else {
                Err(invalid())
            };
        }

        let id: i64 = raw.parse().map_err(|_| invalid())?;
        if id > 0 {
            return Ok(Self::User(id));
        }

        // `i64::MIN` has no positive counterpart.
        let negated = id.checked_neg().filter(|n| *n > 0).ok_or_else(invalid)?;
        match negated.checked_sub(CHANNEL_ID_OFFSET) {
            Some(0) => Err(invalid()),
            Some(channel) if channel > 0 => Ok(Self::Channel(channel)),
            _ => Ok(Self::Group(negated)),
        }
    }
}

impl fmt::Display for BroadcastTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(name) => write!(f, "@{name}"),
            Self::Channel(id) => write!(f, "channel {id}"),
            Self::Group(id) => write!(f, "group {id}"),
            Self::User(id) => write!(f, "user {id}"),
        }
    }
}
