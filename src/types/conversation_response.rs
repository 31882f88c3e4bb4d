use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by `/api/chat` on success.
///
/// The server is trusted to send `result`, but the widget copes when it does not.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationResponse {
    /// The reply text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl ConversationResponse {
    /// Create a response carrying the given reply.
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: Some(result.into()),
        }
    }

    /// Decode a response body.
    ///
    /// Only text that is not JSON is an error.  Any JSON value is accepted, and only an object
    /// whose `result` is a string carries a reply; `null`, arrays, and scalars carry none.
    pub fn from_body(body: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(&value))
    }

    /// Extract the reply from an already parsed body.
    pub fn from_value(value: &Value) -> Self {
        let result = value
            .as_object()
            .and_then(|object| object.get("result"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self { result }
    }

    /// The reply text, if present and non-empty.
    pub fn reply(&self) -> Option<&str> {
        self.result.as_deref().filter(|text| !text.is_empty())
    }
}
