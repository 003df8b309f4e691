//! Command types and definitions.

use std::fmt;

/// Callback data carried by the "Regenerate" inline button.
pub const REGENERATE_DATA: &str = "regen";

/// Label of the "Regenerate" inline button.
pub const REGENERATE_LABEL: &str = "🔁 Regenerate";

/// Available bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    /// Show the welcome/help message.
    Start,

    /// Generate a record and deliver it.
    Generate,

    /// Send the whole store as a CSV attachment.
    Export,
}

impl BotCommand {
    /// Parses a command from a message text.
    ///
    /// Accepts `/command`, `/command@botname` and trailing arguments, which
    /// are ignored. Returns `None` if the message is not a known command.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let after_slash = text.strip_prefix('/')?;

        let word = after_slash
            .split(char::is_whitespace)
            .next()
            .unwrap_or_default();
        let cmd = word.split('@').next().unwrap_or_default().to_lowercase();

        match cmd.as_str() {
            "start" | "help" => Some(Self::Start),
            "generate" | "gen" => Some(Self::Generate),
            "csv" | "export" => Some(Self::Export),
            _ => None,
        }
    }

    /// Returns the command name as it appears in help.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Generate => "generate",
            Self::Export => "csv",
        }
    }

    /// Returns the command description for help.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Start => "Show this help message",
            Self::Generate => "Create a new fake record",
            Self::Export => "Download every generated record as CSV",
        }
    }

    /// Returns all available commands.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Start, Self::Generate, Self::Export]
    }
}

impl fmt::Display for BotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// Actions triggered by inline keyboard buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    /// Generate another record, same as `/generate`.
    Regenerate,
}

impl CallbackAction {
    /// Parses callback data. Unknown data yields `None`.
    #[must_use]
    pub fn parse(data: &[u8]) -> Option<Self> {
        (data == REGENERATE_DATA.as_bytes()).then_some(Self::Regenerate)
    }
}

/// Result of command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Whether the command was successful.
    pub success: bool,

    /// Short summary for the log.
    pub message: String,
}

impl CommandResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates an error result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_start() {
        assert_eq!(BotCommand::parse("/start"), Some(BotCommand::Start));
        assert_eq!(BotCommand::parse("/help"), Some(BotCommand::Start));
    }

    #[test]
    fn test_parse_generate() {
        assert_eq!(BotCommand::parse("/generate"), Some(BotCommand::Generate));
        assert_eq!(BotCommand::parse("/gen"), Some(BotCommand::Generate));
    }

    #[test]
    fn test_parse_export() {
        assert_eq!(BotCommand::parse("/csv"), Some(BotCommand::Export));
        assert_eq!(BotCommand::parse("/export"), Some(BotCommand::Export));
    }

    #[test]
    fn test_parse_with_bot_name() {
        assert_eq!(
            BotCommand::parse("/generate@fake_data_bot"),
            Some(BotCommand::Generate)
        );
    }

    #[test]
    fn test_parse_ignores_arguments() {
        assert_eq!(BotCommand::parse("/csv now please"), Some(BotCommand::Export));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(BotCommand::parse("/GENERATE"), Some(BotCommand::Generate));
    }

    #[test]
    fn test_parse_with_extra_whitespace() {
        assert_eq!(BotCommand::parse("   /start  "), Some(BotCommand::Start));
    }

    #[test]
    fn test_parse_not_a_command() {
        assert_eq!(BotCommand::parse("generate"), None);
        assert_eq!(BotCommand::parse("/unknown"), None);
        assert_eq!(BotCommand::parse("/"), None);
        assert_eq!(BotCommand::parse(""), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(BotCommand::Export.to_string(), "/csv");
    }

    #[test]
    fn test_parse_callback() {
        assert_eq!(
            CallbackAction::parse(b"regen"),
            Some(CallbackAction::Regenerate)
        );
        assert_eq!(CallbackAction::parse(b"other"), None);
        assert_eq!(CallbackAction::parse(b""), None);
    }
}
