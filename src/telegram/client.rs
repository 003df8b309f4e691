//! Telegram bot client built on grammers.

use std::sync::Arc;

use async_trait::async_trait;
use grammers_client::client::UpdateStream;
use grammers_client::client::UpdatesConfiguration;
use grammers_client::update::{Message, Update};
use grammers_client::{
    Client, InputMessage, InvocationError, SenderPool, button, reply_markup, sender,
};
use grammers_session::storages::SqliteSession;
use grammers_session::types::{PeerAuth, PeerId, PeerRef};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::broadcast::{self, Post, PostSender};
use super::{BroadcastTarget, RateLimiter};
use crate::commands::{
    CallbackAction, CommandHandler, DeliveryError, Destination, Keyboard, Messenger,
    REGENERATE_DATA, REGENERATE_LABEL,
};
use crate::config::{BotSettings, TelegramConfig};
use crate::store::RecordStore;

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Bot sign in failed: {0}")]
    SignInFailed(String),

    #[error("Invalid broadcast destination: '{0}'")]
    InvalidBroadcastTarget(String),

    #[error("Could not resolve broadcast destination {0}")]
    UnresolvedPeer(String),

    #[error("Flood wait required: {0} seconds")]
    FloodWait(u32),

    #[error("Upload failed: {0}")]
    Upload(#[from] std::io::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("API invocation error: {0}")]
    Invocation(String),
}

impl From<InvocationError> for TelegramError {
    fn from(err: InvocationError) -> Self {
        let err_str = err.to_string();

        if (err_str.contains("FLOOD_WAIT") || err_str.contains("flood"))
            && let Some(seconds) = extract_flood_wait_seconds(&err_str)
        {
            return Self::FloodWait(seconds);
        }

        Self::Invocation(err_str)
    }
}

/// Extracts flood wait seconds from an error message.
fn extract_flood_wait_seconds(err_msg: &str) -> Option<u32> {
    let lower = err_msg.to_lowercase();
    ["flood_wait_", "flood wait "].iter().find_map(|pattern| {
        let start = lower.find(pattern)? + pattern.len();
        let digits: String = lower[start..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    })
}

/// Connected bot account.
pub struct TelegramBot {
    /// The underlying grammers client.
    client: Client,

    /// Handle to the sender pool for disconnection.
    handle: sender::SenderPoolHandle,

    /// Queue feeding the broadcast worker.
    broadcast_tx: mpsc::Sender<Post>,

    /// Background task posting to the broadcast chat.
    _broadcast_task: JoinHandle<()>,

    /// Background task running the sender pool.
    _pool_task: JoinHandle<()>,
}

impl TelegramBot {
    /// Connects to Telegram, signs in with the bot token if the session is
    /// new, and resolves the broadcast destination.
    ///
    /// Returns the bot together with its update stream.
    pub async fn connect(
        config: &TelegramConfig,
        settings: &BotSettings,
    ) -> Result<(Self, UpdateStream), TelegramError> {
        let target = BroadcastTarget::parse(&settings.broadcast_chat)?;

        info!("Connecting to Telegram...");

        let session = Arc::new(
            SqliteSession::open(&config.session_path)
                .await
                .map_err(|e| TelegramError::Session(e.to_string()))?,
        );

        let SenderPool {
            runner,
            updates,
            handle,
        } = SenderPool::new(Arc::clone(&session), config.api_id);

        let client = Client::new(handle.clone());

        let pool_task = tokio::spawn(async move {
            runner.run().await;
        });

        let is_authorized = client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Connection(e.to_string()))?;

        if is_authorized {
            info!("Reusing authorized session at {}", config.session_path.display());
        } else {
            info!("Signing in with bot token...");
            client
                .bot_sign_in(&config.bot_token, &config.api_hash)
                .await
                .map_err(|e| TelegramError::SignInFailed(e.to_string()))?;
            info!("Bot signed in");
        }

        let broadcast_peer = resolve_target(&client, &target).await?;
        info!("Broadcasting to {}", target);

        let updates = client
            .stream_updates(
                updates,
                UpdatesConfiguration {
                    catch_up: false,
                    ..Default::default()
                },
            )
            .await;

        let (broadcast_tx, broadcast_rx) = mpsc::channel(broadcast::QUEUE_CAPACITY);
        let poster = ClientPoster {
            client: client.clone(),
            peer: broadcast_peer,
        };
        let limiter = RateLimiter::from_millis(settings.broadcast_interval_ms);
        let broadcast_task =
            tokio::spawn(broadcast::run_broadcasts(poster, limiter, broadcast_rx));

        let bot = Self {
            client,
            handle: handle.thin,
            broadcast_tx,
            _broadcast_task: broadcast_task,
            _pool_task: pool_task,
        };

        Ok((bot, updates))
    }

    /// Processes updates one at a time until Ctrl+C or a fatal stream error.
    pub async fn run<S: RecordStore>(
        &self,
        mut updates: UpdateStream,
        handler: &CommandHandler<S>,
    ) -> Result<(), TelegramError> {
        info!("Bot is running. Use Ctrl+C to stop.");

        loop {
            let update = tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down...");
                    break;
                }
                update = updates.next() => update?,
            };

            self.dispatch(update, handler).await;
        }

        updates.sync_update_state();
        Ok(())
    }

    async fn dispatch<S: RecordStore>(&self, update: Update, handler: &CommandHandler<S>) {
        match update {
            Update::NewMessage(message) if !message.outgoing() => {
                let context = UpdateContext {
                    bot: self,
                    origin: &message,
                };
                if handler.try_handle(message.text(), &context).await.is_none() {
                    debug!("Ignoring non-command message");
                }
            }
            Update::CallbackQuery(query) => {
                if let Err(e) = query.answer().send().await {
                    warn!("Failed to answer callback query: {}", e);
                }

                let Some(action) = CallbackAction::parse(query.data()) else {
                    debug!("Ignoring unknown callback data");
                    return;
                };

                match query.load_message().await {
                    Ok(message) => {
                        let context = UpdateContext {
                            bot: self,
                            origin: &message,
                        };
                        let result = handler.handle_callback(action, &context).await;
                        info!(
                            "Callback {:?} result: success={}, {}",
                            action, result.success, result.message
                        );
                    }
                    Err(e) => warn!("Failed to load callback message: {}", e),
                }
            }
            _ => {}
        }
    }

    /// Queues a post for the broadcast worker without waiting for delivery.
    fn queue_broadcast(&self, post: Post) -> Result<(), DeliveryError> {
        self.broadcast_tx.try_send(post).map_err(|e| {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "broadcast queue is full",
                mpsc::error::TrySendError::Closed(_) => "broadcast worker stopped",
            };
            DeliveryError::new(Destination::Broadcast, reason)
        })
    }

    /// Disconnects from Telegram.
    pub fn disconnect(&self) {
        info!("Disconnecting from Telegram...");
        self.handle.quit();
    }
}

impl std::fmt::Debug for TelegramBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let queued = broadcast::QUEUE_CAPACITY - self.broadcast_tx.capacity();
        f.debug_struct("TelegramBot")
            .field("queued_broadcasts", &queued)
            .finish_non_exhaustive()
    }
}

/// Maps a configured destination onto a peer the client can send to.
async fn resolve_target(
    client: &Client,
    target: &BroadcastTarget,
) -> Result<PeerRef, TelegramError> {
    let id = match target {
        BroadcastTarget::Username(name) => {
            return client
                .resolve_username(name)
                .await?
                .and_then(|peer| peer.to_ref())
                .ok_or_else(|| TelegramError::UnresolvedPeer(target.to_string()));
        }
        BroadcastTarget::Channel(id) => PeerId::channel(*id),
        BroadcastTarget::Group(id) => PeerId::chat(*id),
        BroadcastTarget::User(id) => PeerId::user(*id),
    };

    Ok(PeerRef {
        id,
        auth: PeerAuth::default(),
    })
}

/// Sends queued posts to the resolved broadcast chat.
struct ClientPoster {
    client: Client,
    peer: PeerRef,
}

#[async_trait]
impl PostSender for ClientPoster {
    async fn send(&self, post: &Post) -> Result<(), TelegramError> {
        let message = match post {
            Post::Text(text) => InputMessage::new().markdown(text),
            Post::Document {
                file_name,
                content,
                caption,
            } => {
                let mut stream = std::io::Cursor::new(content.clone());
                let uploaded = self
                    .client
                    .upload_stream(&mut stream, content.len(), file_name.clone())
                    .await?;
                InputMessage::new().markdown(caption).document(uploaded)
            }
        };

        self.client.send_message(self.peer.clone(), message).await?;
        Ok(())
    }
}

/// Delivery context for one inbound update.
struct UpdateContext<'a> {
    bot: &'a TelegramBot,

    /// Message the command arrived in, or the message carrying the button.
    origin: &'a Message,
}

impl UpdateContext<'_> {
    async fn reply(&self, message: InputMessage) -> Result<(), DeliveryError> {
        self.origin
            .respond(message)
            .await
            .map(drop)
            .map_err(|e| {
                DeliveryError::new(Destination::Requester, TelegramError::from(e).to_string())
            })
    }
}

#[async_trait]
impl Messenger for UpdateContext<'_> {
    async fn send_text(
        &self,
        to: Destination,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), DeliveryError> {
        if to == Destination::Broadcast {
            return self.bot.queue_broadcast(Post::Text(text.to_owned()));
        }

        let mut message = InputMessage::new().markdown(text);
        if keyboard == Keyboard::Regenerate {
            message = message.reply_markup(&reply_markup::inline(vec![vec![button::inline(
                REGENERATE_LABEL,
                REGENERATE_DATA,
            )]]));
        }
        self.reply(message).await
    }

    async fn send_document(
        &self,
        to: Destination,
        file_name: &str,
        content: &[u8],
        caption: &str,
    ) -> Result<(), DeliveryError> {
        if to == Destination::Broadcast {
            return self.bot.queue_broadcast(Post::Document {
                file_name: file_name.to_owned(),
                content: content.to_vec(),
                caption: caption.to_owned(),
            });
        }

        let mut stream = std::io::Cursor::new(content.to_vec());
        let uploaded = self
            .bot
            .client
            .upload_stream(&mut stream, content.len(), file_name.to_owned())
            .await
            .map_err(|e| DeliveryError::new(to, TelegramError::from(e).to_string()))?;

        let message = InputMessage::new().markdown(caption).document(uploaded);
        self.reply(message).await
    }
}
