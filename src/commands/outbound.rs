//! Outbound delivery boundary.
//!
//! The handler only knows two destinations and two kinds of message. The
//! messaging platform adapter decides how they map onto real chats.

use async_trait::async_trait;
use thiserror::Error;

/// Where a message is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// The chat the command or button press came from.
    Requester,

    /// The fixed broadcast chat.
    Broadcast,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Requester => write!(f, "requester"),
            Self::Broadcast => write!(f, "broadcast"),
        }
    }
}

/// Inline keyboard attached to a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    None,

    /// A single "Regenerate" button.
    Regenerate,
}

/// Failure reported by a [`Messenger`].
#[derive(Debug, Error)]
#[error("Failed to deliver to {destination}: {reason}")]
pub struct DeliveryError {
    pub destination: Destination,
    pub reason: String,
}

impl DeliveryError {
    #[must_use]
    pub fn new(destination: Destination, reason: impl Into<String>) -> Self {
        Self {
            destination,
            reason: reason.into(),
        }
    }
}

/// Sends messages on behalf of the command handler.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a Markdown text message.
    async fn send_text(
        &self,
        to: Destination,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), DeliveryError>;

    /// Sends a file attachment with a caption.
    async fn send_document(
        &self,
        to: Destination,
        file_name: &str,
        content: &[u8],
        caption: &str,
    ) -> Result<(), DeliveryError>;
}
