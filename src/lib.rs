// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod markup;
pub mod observability;
pub mod render;
pub mod types;

// Re-exports
pub use client::{ChatClient, ChatTransport};
pub use error::{ChatFailure, Error, Result};
pub use observability::register_biometrics;
pub use render::{HtmlRenderer, PlainTextRenderer, Renderer};
pub use types::*;
