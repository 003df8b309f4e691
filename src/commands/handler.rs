//! Command handler implementation.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::outbound::{Destination, Keyboard, Messenger};
use super::types::{BotCommand, CallbackAction, CommandResult};
use crate::record::{self, Record};
use crate::store::{RecordStore, StoreError};

/// File name used for exported stores.
pub const EXPORT_FILE_NAME: &str = "fake_data.csv";

const EXPORT_CAPTION_REQUESTER: &str = "📄 Here's the complete CSV file with all generated data";
const EXPORT_CAPTION_BROADCAST: &str = "📄 Complete Fake Data CSV";
const GENERATE_FAILED: &str = "⚠️ Could not save the generated data. Please try again later.";

/// Handles bot commands against a record store.
///
/// Each call runs generate, persist, format and deliver to completion
/// before returning.
pub struct CommandHandler<S> {
    /// Shared record store.
    store: Arc<S>,

    /// Largest export that will be delivered.
    max_export_bytes: u64,
}

impl<S: RecordStore> CommandHandler<S> {
    /// Creates a new command handler.
    #[must_use]
    pub fn new(store: Arc<S>, max_export_bytes: u64) -> Self {
        Self {
            store,
            max_export_bytes,
        }
    }

    /// Generates a record and appends it to the store.
    ///
    /// If the append fails the record is dropped.
    pub fn generate_and_persist(&self) -> Result<Record, StoreError> {
        let record = Record::generate();
        self.store.append(&record)?;
        debug!("Persisted record for {}", record.masked_mobile());
        Ok(record)
    }

    /// Returns the whole store content, refusing stores above the export limit.
    ///
    /// The size is checked before the store is read.
    pub fn export(&self) -> Result<Vec<u8>, StoreError> {
        self.check_export_size(self.store.size()?)?;
        let content = self.store.read_all()?;
        // The store may have grown since it was measured.
        self.check_export_size(content.len() as u64)?;
        Ok(content)
    }

    fn check_export_size(&self, size: u64) -> Result<(), StoreError> {
        if size > self.max_export_bytes {
            return Err(StoreError::TooLarge {
                size,
                limit: self.max_export_bytes,
            });
        }
        Ok(())
    }

    /// Tries to parse and execute a command from a message.
    ///
    /// Returns `None` if the message is not a command.
    pub async fn try_handle(
        &self,
        message_text: &str,
        out: &dyn Messenger,
    ) -> Option<CommandResult> {
        let command = BotCommand::parse(message_text)?;

        debug!("Handling command: {}", command);
        let result = self.handle_command(command, out).await;
        info!(
            "Command {} result: success={}, {}",
            command, result.success, result.message
        );

        Some(result)
    }

    /// Executes a parsed command.
    pub async fn handle_command(&self, command: BotCommand, out: &dyn Messenger) -> CommandResult {
        match command {
            BotCommand::Start => Self::handle_start(out).await,
            BotCommand::Generate => self.handle_generate(out).await,
            BotCommand::Export => self.handle_export(out).await,
        }
    }

    /// Executes an inline button action.
    pub async fn handle_callback(
        &self,
        action: CallbackAction,
        out: &dyn Messenger,
    ) -> CommandResult {
        match action {
            CallbackAction::Regenerate => self.handle_generate(out).await,
        }
    }

    async fn handle_start(out: &dyn Messenger) -> CommandResult {
        match out
            .send_text(Destination::Requester, &help_text(), Keyboard::None)
            .await
        {
            Ok(()) => CommandResult::success("help sent"),
            Err(e) => {
                warn!("{}", e);
                CommandResult::error(e.to_string())
            }
        }
    }

    async fn handle_generate(&self, out: &dyn Messenger) -> CommandResult {
        let record = match self.generate_and_persist() {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to persist generated record: {}", e);
                if let Err(send_err) = out
                    .send_text(Destination::Requester, GENERATE_FAILED, Keyboard::None)
                    .await
                {
                    warn!("{}", send_err);
                }
                return CommandResult::error(e.to_string());
            }
        };

        let delivered = out
            .send_text(
                Destination::Requester,
                &record::user_message(&record),
                Keyboard::Regenerate,
            )
            .await;

        if let Err(e) = out
            .send_text(
                Destination::Broadcast,
                &record::broadcast_message(&record),
                Keyboard::None,
            )
            .await
        {
            warn!("{}", e);
        }

        match delivered {
            Ok(()) => CommandResult::success(format!(
                "generated record for {}",
                record.masked_mobile()
            )),
            Err(e) => {
                warn!("{}", e);
                CommandResult::error(e.to_string())
            }
        }
    }

    async fn handle_export(&self, out: &dyn Messenger) -> CommandResult {
        let content = match self.export() {
            Ok(content) => content,
            Err(e) => return Self::report_error(out, &e.to_string()).await,
        };

        if let Err(e) = out
            .send_document(
                Destination::Requester,
                EXPORT_FILE_NAME,
                &content,
                EXPORT_CAPTION_REQUESTER,
            )
            .await
        {
            return Self::report_error(out, &e.to_string()).await;
        }

        if let Err(e) = out
            .send_document(
                Destination::Broadcast,
                EXPORT_FILE_NAME,
                &content,
                EXPORT_CAPTION_BROADCAST,
            )
            .await
        {
            warn!("{}", e);
        }

        CommandResult::success(format!("exported {} bytes", content.len()))
    }

    /// Tells the requester what went wrong.
    async fn report_error(out: &dyn Messenger, description: &str) -> CommandResult {
        warn!("Export failed: {}", description);
        if let Err(e) = out
            .send_text(
                Destination::Requester,
                &format!("⚠️ Error: {description}"),
                Keyboard::None,
            )
            .await
        {
            warn!("{}", e);
        }
        CommandResult::error(description)
    }
}

/// Builds the `/start` help text.
fn help_text() -> String {
    let mut lines = vec!["🤖 *Fake Data Generator Bot*".to_owned(), String::new()];
    for command in BotCommand::all() {
        lines.push(format!("{command} - {}", command.description()));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::commands::DeliveryError;
    use crate::store::{CsvStore, MemoryStore, parse_records};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Sent {
        Text {
            to: Destination,
            text: String,
            keyboard: Keyboard,
        },
        Document {
            to: Destination,
            file_name: String,
            content: Vec<u8>,
            caption: String,
        },
    }

    #[derive(Default)]
    struct RecordingMessenger {
        sent: Mutex<Vec<Sent>>,
        failing: Option<Destination>,
    }

    impl RecordingMessenger {
        fn failing(destination: Destination) -> Self {
            Self {
                sent: Mutex::default(),
                failing: Some(destination),
            }
        }

        async fn sent(&self) -> Vec<Sent> {
            self.sent.lock().await.clone()
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_text(
            &self,
            to: Destination,
            text: &str,
            keyboard: Keyboard,
        ) -> Result<(), DeliveryError> {
            if self.failing == Some(to) {
                return Err(DeliveryError::new(to, "chat unavailable"));
            }
            self.sent.lock().await.push(Sent::Text {
                to,
                text: text.to_owned(),
                keyboard,
            });
            Ok(())
        }

        async fn send_document(
            &self,
            to: Destination,
            file_name: &str,
            content: &[u8],
            caption: &str,
        ) -> Result<(), DeliveryError> {
            if self.failing == Some(to) {
                return Err(DeliveryError::new(to, "chat unavailable"));
            }
            self.sent.lock().await.push(Sent::Document {
                to,
                file_name: file_name.to_owned(),
                content: content.to_vec(),
                caption: caption.to_owned(),
            });
            Ok(())
        }
    }

    fn initialized_handler() -> CommandHandler<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.ensure_initialized().unwrap();
        CommandHandler::new(store, 1024 * 1024)
    }

    #[test]
    fn test_generate_and_persist_grows_store() {
        let handler = initialized_handler();
        let records: Vec<Record> = (0..3)
            .map(|_| handler.generate_and_persist().unwrap())
            .collect();

        let content = handler.export().unwrap();
        let text = String::from_utf8(content.clone()).unwrap();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(parse_records(&content).unwrap(), records);
    }

    #[test]
    fn test_exported_row_round_trips_through_format() {
        let handler = initialized_handler();
        let record = handler.generate_and_persist().unwrap();

        let content = handler.export().unwrap();
        let text = String::from_utf8(content).unwrap();
        let row = text.lines().nth(1).unwrap();
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 5);

        let card = record::format_record(&record);
        for field in fields {
            assert_eq!(card.matches(field).count(), 1);
        }
    }

    #[test]
    fn test_export_before_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake_data.csv");
        let handler = CommandHandler::new(Arc::new(CsvStore::new(&path)), 1024);

        assert!(matches!(handler.export(), Err(StoreError::NotFound(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_export_size_limit() {
        let store = Arc::new(MemoryStore::new());
        store.ensure_initialized().unwrap();
        let handler = CommandHandler::new(store, 16);

        assert!(matches!(
            handler.export(),
            Err(StoreError::TooLarge { limit: 16, .. })
        ));
    }

    /// Store that refuses to be read.
    struct UnreadableStore {
        size: u64,
    }

    impl RecordStore for UnreadableStore {
        fn ensure_initialized(&self) -> Result<bool, StoreError> {
            Ok(false)
        }

        fn append(&self, _record: &Record) -> Result<(), StoreError> {
            Ok(())
        }

        fn size(&self) -> Result<u64, StoreError> {
            Ok(self.size)
        }

        fn read_all(&self) -> Result<Vec<u8>, StoreError> {
            panic!("store read despite exceeding the export limit");
        }
    }

    #[test]
    fn test_oversized_store_is_refused_before_reading() {
        let store = Arc::new(UnreadableStore { size: 10 * 1024 });
        let handler = CommandHandler::new(store, 1024);

        assert!(matches!(
            handler.export(),
            Err(StoreError::TooLarge {
                size: 10_240,
                limit: 1024
            })
        ));
    }

    #[test]
    fn test_csv_store_export_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(CsvStore::new(dir.path().join("fake_data.csv")));
        store.ensure_initialized().unwrap();
        store.append(&Record::generate()).unwrap();
        let size = store.size().unwrap();

        let exact = CommandHandler::new(Arc::clone(&store), size);
        assert_eq!(exact.export().unwrap().len() as u64, size);

        let below = CommandHandler::new(store, size - 1);
        assert!(matches!(below.export(), Err(StoreError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_start_sends_help() {
        let handler = initialized_handler();
        let out = RecordingMessenger::default();

        let result = handler.handle_command(BotCommand::Start, &out).await;
        assert!(result.success);

        let sent = out.sent().await;
        assert_eq!(sent.len(), 1);
        let Sent::Text { to, text, .. } = &sent[0] else {
            panic!("expected text");
        };
        assert_eq!(*to, Destination::Requester);
        assert!(text.contains("/generate"));
        assert!(text.contains("/csv"));
    }

    #[tokio::test]
    async fn test_start_has_no_side_effects() {
        let handler = initialized_handler();
        let out = RecordingMessenger::default();
        handler.handle_command(BotCommand::Start, &out).await;

        let text = String::from_utf8(handler.export().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_generate_delivers_to_both_destinations() {
        let handler = initialized_handler();
        let out = RecordingMessenger::default();

        let result = handler.handle_command(BotCommand::Generate, &out).await;
        assert!(result.success);

        let sent = out.sent().await;
        assert_eq!(sent.len(), 2);
        let record = parse_records(&handler.export().unwrap()).unwrap().remove(0);

        assert_eq!(
            sent[0],
            Sent::Text {
                to: Destination::Requester,
                text: record::user_message(&record),
                keyboard: Keyboard::Regenerate,
            }
        );
        assert_eq!(
            sent[1],
            Sent::Text {
                to: Destination::Broadcast,
                text: record::broadcast_message(&record),
                keyboard: Keyboard::None,
            }
        );
    }

    #[tokio::test]
    async fn test_regenerate_button_generates_again() {
        let handler = initialized_handler();
        let out = RecordingMessenger::default();

        handler.handle_command(BotCommand::Generate, &out).await;
        handler
            .handle_callback(CallbackAction::Regenerate, &out)
            .await;

        let text = String::from_utf8(handler.export().unwrap()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(out.sent().await.len(), 4);
    }

    #[tokio::test]
    async fn test_generate_store_failure_reports_generic_error() {
        let handler = CommandHandler::new(Arc::new(MemoryStore::new()), 1024);
        let out = RecordingMessenger::default();

        let result = handler.handle_command(BotCommand::Generate, &out).await;
        assert!(!result.success);

        let sent = out.sent().await;
        assert_eq!(
            sent,
            vec![Sent::Text {
                to: Destination::Requester,
                text: GENERATE_FAILED.to_owned(),
                keyboard: Keyboard::None,
            }]
        );
    }

    #[tokio::test]
    async fn test_generate_survives_broadcast_failure() {
        let handler = initialized_handler();
        let out = RecordingMessenger::failing(Destination::Broadcast);

        let result = handler.handle_command(BotCommand::Generate, &out).await;
        assert!(result.success);
        assert_eq!(out.sent().await.len(), 1);
    }

    #[tokio::test]
    async fn test_export_sends_file_to_both_destinations() {
        let handler = initialized_handler();
        handler.generate_and_persist().unwrap();
        let content = handler.export().unwrap();
        let out = RecordingMessenger::default();

        let result = handler.handle_command(BotCommand::Export, &out).await;
        assert!(result.success);

        assert_eq!(
            out.sent().await,
            vec![
                Sent::Document {
                    to: Destination::Requester,
                    file_name: EXPORT_FILE_NAME.to_owned(),
                    content: content.clone(),
                    caption: EXPORT_CAPTION_REQUESTER.to_owned(),
                },
                Sent::Document {
                    to: Destination::Broadcast,
                    file_name: EXPORT_FILE_NAME.to_owned(),
                    content,
                    caption: EXPORT_CAPTION_BROADCAST.to_owned(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_export_failure_is_reported_to_requester() {
        let handler = CommandHandler::new(Arc::new(MemoryStore::new()), 1024);
        let out = RecordingMessenger::default();

        let result = handler.handle_command(BotCommand::Export, &out).await;
        assert!(!result.success);

        let sent = out.sent().await;
        assert_eq!(sent.len(), 1);
        let Sent::Text { to, text, .. } = &sent[0] else {
            panic!("expected text");
        };
        assert_eq!(*to, Destination::Requester);
        assert!(text.starts_with("⚠️ Error: Store not found"));
    }

    #[tokio::test]
    async fn test_try_handle_ignores_plain_text() {
        let handler = initialized_handler();
        let out = RecordingMessenger::default();

        assert!(handler.try_handle("hello there", &out).await.is_none());
        assert!(handler.try_handle("/generate", &out).await.is_some());
    }

    #[test]
    fn test_help_text_lists_commands() {
        let text = help_text();
        for command in BotCommand::all() {
            assert!(text.contains(&command.to_string()));
        }
    }
}
