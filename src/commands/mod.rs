//! Command handling module.
//!
//! Turns `/start`, `/generate`, `/csv` and the "Regenerate" button into
//! store operations and outbound messages.

mod handler;
mod outbound;
mod types;

pub use handler::{CommandHandler, EXPORT_FILE_NAME};
pub use outbound::{DeliveryError, Destination, Keyboard, Messenger};
pub use types::{BotCommand, CallbackAction, CommandResult, REGENERATE_DATA, REGENERATE_LABEL};
