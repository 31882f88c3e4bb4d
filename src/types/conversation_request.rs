use serde::{Deserialize, Serialize};

use crate::types::ConversationTurn;

/// Body of `POST /api/chat`.
///
/// Only the latest user turn is ever sent; the widget keeps no history on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationRequest {
    /// Ordered turns of the conversation.
    pub conversation: Vec<ConversationTurn>,
}

impl ConversationRequest {
    /// Create a request from an explicit list of turns.
    pub fn new(conversation: Vec<ConversationTurn>) -> Self {
        Self { conversation }
    }

    /// Create the single-turn request for a user submission.
    pub fn from_user_text(text: impl Into<String>) -> Self {
        Self::new(vec![ConversationTurn::user(text)])
    }
}
