use serde::{Deserialize, Serialize};

/// Role string the server expects on user turns.
pub const USER_ROLE: &str = "user";

/// A single turn in the conversation sent to `/api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationTurn {
    /// Who spoke this turn.  Always `"user"` for turns this crate sends.
    pub role: String,

    /// The turn's text.
    pub text: String,
}

impl ConversationTurn {
    /// Create a new turn with an explicit role.
    pub fn new(role: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: text.into(),
        }
    }

    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(USER_ROLE, text)
    }
}
