//! Background delivery of broadcast posts.
//!
//! Posts are queued by the update worker and sent by a separate task, so
//! rate limiting and flood waits on the broadcast chat never hold up
//! replies to users.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{RateLimiter, TelegramError};

/// Capacity of the broadcast queue.
pub const QUEUE_CAPACITY: usize = 32;

/// One pending broadcast post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Post {
    /// Markdown text message.
    Text(String),

    /// File attachment with a Markdown caption.
    Document {
        file_name: String,
        content: Vec<u8>,
        caption: String,
    },
}

/// Sends a single post to the broadcast chat.
#[async_trait]
pub trait PostSender: Send + Sync {
    async fn send(&self, post: &Post) -> Result<(), TelegramError>;
}

/// Drains the queue until every sender is dropped.
pub async fn run_broadcasts<P: PostSender>(
    poster: P,
    limiter: RateLimiter,
    mut rx: mpsc::Receiver<Post>,
) {
    info!("Broadcast worker started");

    while let Some(post) = rx.recv().await {
        match deliver(&poster, &limiter, &post).await {
            Ok(()) => debug!("Broadcast post delivered"),
            Err(e) => warn!("Dropping broadcast post: {}", e),
        }
    }

    info!("Broadcast worker stopped");
}

/// Sends a post, retrying once after a flood wait.
async fn deliver<P: PostSender>(
    poster: &P,
    limiter: &RateLimiter,
    post: &Post,
) -> Result<(), TelegramError> {
    limiter.wait_and_acquire().await;

    match poster.send(post).await {
        Err(TelegramError::FloodWait(seconds)) => {
            limiter.handle_flood_wait(seconds).await;
            limiter.wait_and_acquire().await;
            poster.send(post).await
        }
        other => other,
    }
}
