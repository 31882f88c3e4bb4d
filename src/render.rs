//! Output rendering for the chat widget.
//!
//! The [`Renderer`] trait is the widget's view of its display surface:  a transcript it can append
//! to, an input it can clear, a thinking indicator, and the widget's own visibility.  Two
//! implementations are provided:
//!
//! - [`PlainTextRenderer`] writes to a terminal, optionally with ANSI styling.
//! - [`HtmlRenderer`] keeps an in-memory document and emits the widget's HTML markup.

use std::io::{self, Stdout, Write};

use crate::markup;
use crate::types::{Message, Sender, Transcript};

/// ANSI escape code for dim text (used for the thinking indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for the thinking indicator).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for magenta text (used for the user label).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// ANSI escape code for cyan text (used for the bot label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Return to column zero and erase the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Text of the thinking indicator.
pub const THINKING_TEXT: &str = "thinking...";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - HTML for embedding in a page
pub trait Renderer: Send {
    /// Append a message to the transcript view.
    ///
    /// Implementations format the text with [`markup`] and must escape it for their medium.
    fn append_message(&mut self, message: &Message);

    /// Scroll the transcript so the newest message is visible.
    fn scroll_to_bottom(&mut self) {}

    /// Clear the text input.
    fn clear_input(&mut self) {}

    /// Move focus to the text input.
    fn focus_input(&mut self) {}

    /// Show the thinking indicator.
    fn show_thinking(&mut self);

    /// Hide the thinking indicator.  Hiding a hidden indicator does nothing.
    fn hide_thinking(&mut self);

    /// Make the widget visible.
    fn show_widget(&mut self) {}

    /// Hide the widget.
    fn hide_widget(&mut self) {}

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);
}

////////////////////////////////////////// PlainTextRenderer //////////////////////////////////////////

/// Plain text renderer with optional ANSI styling.
///
/// The terminal's scrollback is the transcript.  User messages are not echoed by default because
/// the line editor has already shown them.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    echo_user: bool,
    thinking_visible: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer that writes to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            echo_user: false,
            thinking_visible: false,
        }
    }

    /// Sets whether user messages are written out as well.
    pub fn echo_user(mut self, echo_user: bool) -> Self {
        self.echo_user = echo_user;
        self
    }

    /// Returns true while the thinking indicator is on screen.
    pub fn is_thinking_visible(&self) -> bool {
        self.thinking_visible
    }

    /// Consumes the renderer, returning its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn label(&self, sender: Sender) -> String {
        let (name, color) = match sender {
            Sender::User => ("You", ANSI_MAGENTA),
            Sender::Bot => ("Bot", ANSI_CYAN),
        };
        if self.use_color {
            format!("{color}{name}:{ANSI_RESET}")
        } else {
            format!("{name}:")
        }
    }

    /// Flushes the writer to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn append_message(&mut self, message: &Message) {
        if message.sender == Sender::User && !self.echo_user {
            return;
        }
        // The indicator owns the current line; take it down before writing over it.
        let restore_thinking = self.thinking_visible;
        if restore_thinking {
            self.hide_thinking();
        }
        let label = self.label(message.sender);
        let body = markup::to_ansi(&message.inlines(), self.use_color);
        let _ = writeln!(self.out, "{label} {body}");
        if restore_thinking {
            self.show_thinking();
        }
        self.flush();
    }

    fn show_thinking(&mut self) {
        if self.thinking_visible {
            return;
        }
        self.thinking_visible = true;
        if self.use_color {
            let _ = write!(self.out, "{ANSI_DIM}{ANSI_ITALIC}{THINKING_TEXT}{ANSI_RESET}");
        } else {
            let _ = writeln!(self.out, "[{THINKING_TEXT}]");
        }
        self.flush();
    }

    fn hide_thinking(&mut self) {
        if !self.thinking_visible {
            return;
        }
        self.thinking_visible = false;
        if self.use_color {
            let _ = write!(self.out, "{ANSI_CLEAR_LINE}");
        }
        self.flush();
    }

    fn print_info(&mut self, info: &str) {
        let _ = writeln!(self.out, "{}", markup::strip_control(info));
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        let error = markup::strip_control(error);
        if self.use_color {
            let _ = writeln!(self.out, "{ANSI_RED}Error:{ANSI_RESET} {error}");
        } else {
            let _ = writeln!(self.out, "Error: {error}");
        }
        self.flush();
    }
}

//////////////////////////////////////////// HtmlRenderer ////////////////////////////////////////////

/// Bubble classes for messages the user sent.
const USER_BUBBLE: &str = "bg-purple-600 text-white rounded-tl-2xl rounded-tr-2xl rounded-bl-2xl";

/// Bubble classes for the bot's replies.
const BOT_BUBBLE: &str = "bg-gray-700 text-gray-100 rounded-tl-2xl rounded-tr-2xl rounded-br-2xl";

/// Classes shared by every bubble.
const BUBBLE_COMMON: &str = "p-3 max-w-[85%] text-sm shadow-sm animate-[popIn_0.2s_ease-out]";

/// Render a single message as the widget's bubble markup.
pub fn message_html(message: &Message) -> String {
    let (row, bubble) = match message.sender {
        Sender::User => ("justify-end", USER_BUBBLE),
        Sender::Bot => ("justify-start", BOT_BUBBLE),
    };
    format!(
        "<div class=\"flex {row}\"><div class=\"{bubble} {BUBBLE_COMMON}\">{}</div></div>",
        markup::to_html(&message.inlines())
    )
}

/// An in-memory chat widget document.
///
/// Every message is turned into markup as it is appended; text only ever enters the document
/// through [`markup::to_html`].
#[derive(Debug, Default, Clone)]
pub struct HtmlRenderer {
    messages: Vec<String>,
    input: String,
    input_focused: bool,
    thinking_visible: bool,
    widget_visible: bool,
    scrolled_to: usize,
    notices: Vec<String>,
}

impl HtmlRenderer {
    /// Creates an empty document with the widget hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an open widget holding every message of `transcript`, scrolled to the bottom.
    pub fn from_transcript(transcript: &Transcript) -> Self {
        let mut renderer = Self::new();
        renderer.show_widget();
        for message in transcript.messages() {
            renderer.append_message(message);
        }
        renderer.scroll_to_bottom();
        renderer
    }

    /// Markup of each message, in display order.
    pub fn messages_html(&self) -> &[String] {
        &self.messages
    }

    /// Number of message bubbles.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Current contents of the input box.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Type into the input box.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Returns true if the input box has focus.
    pub fn is_input_focused(&self) -> bool {
        self.input_focused
    }

    /// Returns true while the thinking indicator is shown.
    pub fn is_thinking_visible(&self) -> bool {
        self.thinking_visible
    }

    /// Returns true while the widget is shown.
    pub fn is_widget_visible(&self) -> bool {
        self.widget_visible
    }

    /// Returns true if the newest message is scrolled into view.
    pub fn is_scrolled_to_bottom(&self) -> bool {
        self.scrolled_to == self.messages.len()
    }

    /// Info and error lines, in order.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Emit the whole widget.
    pub fn to_html(&self) -> String {
        let hidden = |visible: bool| if visible { "" } else { " hidden" };
        let mut out = String::new();
        out.push_str(&format!(
            "<div id=\"chatbot\" class=\"chatbot{}\">\n",
            hidden(self.widget_visible)
        ));
        out.push_str("<div id=\"chat-messages\">\n");
        for message in &self.messages {
            out.push_str(message);
            out.push('\n');
        }
        out.push_str("</div>\n");
        out.push_str(&format!(
            "<div id=\"thinking-indicator\" class=\"thinking{}\">{THINKING_TEXT}</div>\n",
            hidden(self.thinking_visible)
        ));
        out.push_str("</div>\n");
        out
    }
}

impl Renderer for HtmlRenderer {
    fn append_message(&mut self, message: &Message) {
        self.messages.push(message_html(message));
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolled_to = self.messages.len();
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn focus_input(&mut self) {
        self.input_focused = true;
    }

    fn show_thinking(&mut self) {
        self.thinking_visible = true;
    }

    fn hide_thinking(&mut self) {
        self.thinking_visible = false;
    }

    fn show_widget(&mut self) {
        self.widget_visible = true;
    }

    fn hide_widget(&mut self) {
        self.widget_visible = false;
        self.input_focused = false;
    }

    fn print_info(&mut self, info: &str) {
        self.notices.push(info.to_string());
    }

    fn print_error(&mut self, error: &str) {
        self.notices.push(format!("Error: {error}"));
    }
}
