//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use arrrg_derive::CommandLine;

use crate::client::{ChatClient, DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use crate::error::Result;

/// Environment variable consulted when no base URL is given on the command line.
pub const BASE_URL_ENV: &str = "CHATWIDGET_BASE_URL";

/// Command-line arguments for the chatwidget-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Server to talk to.
    #[arrrg(optional, "Base URL of the chat server (default: http://127.0.0.1:3000/)", "URL")]
    pub base_url: Option<String>,

    /// Endpoint path, resolved against the base URL.
    #[arrrg(optional, "Chat endpoint path (default: /api/chat)", "PATH")]
    pub endpoint: Option<String>,

    /// Per-request timeout.
    #[arrrg(optional, "Request timeout in seconds (default: 60)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Where to write the HTML transcript on exit.
    #[arrrg(optional, "Write the transcript as HTML to this file on exit", "FILE")]
    pub html_transcript: Option<String>,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Base URL of the server.
    pub base_url: String,

    /// Endpoint path, resolved against `base_url`.
    pub endpoint: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Export the transcript as HTML here when the session ends.
    pub html_transcript: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: http://127.0.0.1:3000/
    /// - Endpoint: /api/chat
    /// - Timeout: 60 seconds
    /// - Color: enabled
    /// - HTML transcript: disabled
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            use_color: true,
            html_transcript: None,
        }
    }

    /// Resolves arguments, falling back to `env_base_url` and then the defaults.
    pub fn from_args(args: ChatArgs, env_base_url: Option<String>) -> Self {
        let defaults = ChatConfig::new();
        ChatConfig {
            base_url: args
                .base_url
                .or(env_base_url)
                .unwrap_or(defaults.base_url),
            endpoint: args.endpoint.unwrap_or(defaults.endpoint),
            timeout: args
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            use_color: !args.no_color,
            html_transcript: args.html_transcript.map(PathBuf::from),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the endpoint path.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the HTML transcript export path.
    pub fn with_html_transcript(mut self, path: Option<PathBuf>) -> Self {
        self.html_transcript = path;
        self
    }

    /// Builds the HTTP client this configuration describes.
    pub fn client(&self) -> Result<ChatClient> {
        ChatClient::with_options(
            &self.base_url,
            Some(self.endpoint.clone()),
            Some(self.timeout),
        )
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig::from_args(args, env::var(BASE_URL_ENV).ok())
    }
}
