//! Chat widget session and its terminal front end's plumbing.
//!
//! This module turns user input into `/api/chat` exchanges and renders the result.  It supports:
//!
//! - Sanitized, lightly formatted messages (`**bold**` only)
//! - A thinking indicator that is cleared on every completion path
//! - Open/close state for the widget
//! - Slash commands for session control
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: submission handling, the transcript, and outcome rendering
//! - [`widget`]: widget visibility
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;
mod widget;

pub use crate::render::{HtmlRenderer, PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{BASE_URL_ENV, ChatArgs, ChatConfig};
pub use session::{CLOSED_HINT, ChatOutcome, ChatSession, SessionState, SessionStats};
pub use widget::WidgetState;
