//! Message formatting.
//!
//! Message text supports exactly one formatting construct:  `**bold**`.  Text is first parsed into
//! a list of [`Inline`] nodes that hold raw, unescaped text.  Escaping happens only when nodes are
//! emitted, so there is no way to build a node list that emits markup the author did not intend.
//!
//! ```
//! use chatwidget::markup::{self, Inline};
//!
//! let nodes = markup::parse("say **hi** to <b>");
//! assert_eq!(
//!     nodes,
//!     vec![
//!         Inline::Text("say ".to_string()),
//!         Inline::Strong("hi".to_string()),
//!         Inline::Text(" to <b>".to_string()),
//!     ]
//! );
//! assert_eq!(markup::to_html(&nodes), "say <strong>hi</strong> to &lt;b&gt;");
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// A `**` pair on one line, shortest match first.  `****` is an empty emphasis.
///
/// Any line terminator ends the line:  `\n`, `\r`, U+2028 and U+2029.
static STRONG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^\r\n\x{2028}\x{2029}]*?)\*\*").expect("strong pattern should compile")
});

/// A run of formatted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text.
    Text(String),
    /// Emphasized text.
    Strong(String),
}

impl Inline {
    /// The raw text of the node, without any formatting.
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(text) => text,
            Inline::Strong(text) => text,
        }
    }
}

/// Parse message text into inline nodes.
pub fn parse(text: &str) -> Vec<Inline> {
    let mut nodes = Vec::new();
    let mut cursor = 0;
    for caps in STRONG.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > cursor {
            nodes.push(Inline::Text(text[cursor..whole.start()].to_string()));
        }
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        nodes.push(Inline::Strong(inner.to_string()));
        cursor = whole.end();
    }
    if cursor < text.len() {
        nodes.push(Inline::Text(text[cursor..].to_string()));
    }
    nodes
}

/// Escape text for inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Emit inline nodes as HTML.
pub fn to_html(nodes: &[Inline]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Strong(text) => {
                out.push_str("<strong>");
                out.push_str(&escape_html(text));
                out.push_str("</strong>");
            }
        }
    }
    out
}

/// Drop control characters other than newline and tab.
///
/// This is the terminal's equivalent of HTML escaping:  a reply must not be able to emit its own
/// escape sequences.
pub fn strip_control(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Emit inline nodes for a terminal, optionally with ANSI bold for emphasis.
pub fn to_ansi(nodes: &[Inline], use_color: bool) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Inline::Text(text) => out.push_str(&strip_control(text)),
            Inline::Strong(text) if use_color => {
                out.push_str(ANSI_BOLD);
                out.push_str(&strip_control(text));
                out.push_str(ANSI_RESET);
            }
            Inline::Strong(text) => out.push_str(&strip_control(text)),
        }
    }
    out
}

/// Format raw message text straight to HTML.
pub fn format_html(text: &str) -> String {
    to_html(&parse(text))
}
