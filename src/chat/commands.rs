//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to control the widget without sending messages
//! to the server.

/// A parsed chat command.
///
/// These commands control the widget and are not sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Show the widget.
    Open,

    /// Hide the widget.
    Close,

    /// Point the session at a different server.
    BaseUrl(String),

    /// Change the per-request timeout, in seconds.
    Timeout(u64),

    /// Write the transcript as HTML to a file immediately.
    SaveHtml(String),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use chatwidget::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/server http://localhost:3000/").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "open" => ChatCommand::Open,
        "close" => ChatCommand::Close,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" => ChatCommand::ShowConfig,
        "server" => match argument {
            Some(url) => ChatCommand::BaseUrl(url.to_string()),
            None => ChatCommand::Invalid("/server requires a base URL".to_string()),
        },
        "timeout" => match argument {
            Some(arg) => match arg.parse::<u64>() {
                Ok(value) if value > 0 => ChatCommand::Timeout(value),
                _ => ChatCommand::Invalid(
                    "/timeout expects a positive number of seconds".to_string(),
                ),
            },
            None => ChatCommand::Invalid("/timeout requires a value".to_string()),
        },
        "html" => match argument {
            Some(path) => ChatCommand::SaveHtml(path.to_string()),
            None => ChatCommand::Invalid("/html requires a file path".to_string()),
        },
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /open                  Show the chat widget
  /close                 Hide the chat widget
  /server <url>          Talk to a different server
  /timeout <seconds>     Set the request timeout
  /html <file>           Write the transcript as HTML
  /stats                 Show session statistics
  /config                Show current configuration
  /help                  Show this help message
  /quit                  Exit the chat"#
}
