// Public modules
pub mod conversation_request;
pub mod conversation_response;
pub mod conversation_turn;
pub mod message;
pub mod sender;

// Re-exports
pub use conversation_request::ConversationRequest;
pub use conversation_response::ConversationResponse;
pub use conversation_turn::{ConversationTurn, USER_ROLE};
pub use message::{Message, Transcript};
pub use sender::Sender;
