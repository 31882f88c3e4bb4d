//! Error types for the chat widget client.
//!
//! Internally every failure is an [`Error`].  What the user gets to see is much coarser:  each
//! error collapses into one of the two [`ChatFailure`] kinds, and the detail is only ever logged.

use std::error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Message shown when the server could not be reached or answered with a non-2xx status.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to get response from server.";

/// Message shown when the server answered 2xx but carried no usable `result`.
pub const EMPTY_RESULT_MESSAGE: &str = "Sorry, no response received.";

/// The main error type for the chat widget client.
#[derive(Clone, Debug)]
pub enum Error {
    /// The server answered with a non-success status.
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Reason phrase or body excerpt from the server.
        message: String,
    },

    /// The request timed out.
    Timeout {
        /// Human-readable error message.
        message: String,
        /// Duration of the timeout in seconds.
        duration: Option<f64>,
    },

    /// Connection error.
    Connection {
        /// Human-readable error message.
        message: String,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// Error during JSON serialization or deserialization.
    Serialization {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// I/O error.
    Io {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Arc<io::Error>,
    },

    /// HTTP client error.
    HttpClient {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },

    /// A configuration value failed validation.
    Validation {
        /// Human-readable error message.
        message: String,
        /// Parameter that failed validation.
        param: Option<String>,
    },

    /// A URL parsing or manipulation error.
    Url {
        /// Human-readable error message.
        message: String,
        /// The underlying error.
        source: Option<url::ParseError>,
    },
}

impl Error {
    /// Creates a new API error.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a new timeout error.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        Error::Timeout {
            message: message.into(),
            duration,
        }
    }

    /// Creates a new connection error.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Connection {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new serialization error.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Serialization {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new I/O error.
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Error::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }

    /// Creates a new HTTP client error.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::HttpClient {
            message: message.into(),
            source: source.map(Arc::from),
        }
    }

    /// Creates a new validation error.
    pub fn validation(message: impl Into<String>, param: Option<String>) -> Self {
        Error::Validation {
            message: message.into(),
            param,
        }
    }

    /// Creates a new URL error.
    pub fn url(message: impl Into<String>, source: Option<url::ParseError>) -> Self {
        Error::Url {
            message: message.into(),
            source,
        }
    }

    /// Returns true if this error is a validation error.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// Returns true if this error arose while exchanging a request with the server.
    ///
    /// Undecodable response bodies count:  the exchange did not yield a reply.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Api { .. }
                | Error::Timeout { .. }
                | Error::Connection { .. }
                | Error::HttpClient { .. }
                | Error::Serialization { .. }
        )
    }

    /// Returns the status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Api {
                status_code,
                message,
            } => {
                write!(f, "API error: {status_code} {message}")
            }
            Error::Timeout { message, duration } => {
                if let Some(duration) = duration {
                    write!(f, "Timeout error: {message} ({duration} seconds)")
                } else {
                    write!(f, "Timeout error: {message}")
                }
            }
            Error::Connection { message, .. } => {
                write!(f, "Connection error: {message}")
            }
            Error::Serialization { message, .. } => {
                write!(f, "Serialization error: {message}")
            }
            Error::Io { message, .. } => {
                write!(f, "I/O error: {message}")
            }
            Error::HttpClient { message, .. } => {
                write!(f, "HTTP client error: {message}")
            }
            Error::Validation { message, param } => {
                if let Some(param) = param {
                    write!(f, "Validation error: {message} (parameter: {param})")
                } else {
                    write!(f, "Validation error: {message}")
                }
            }
            Error::Url { message, .. } => {
                write!(f, "URL error: {message}")
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Connection { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Serialization { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Io { source, .. } => Some(source),
            Error::HttpClient { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Url { source, .. } => {
                source.as_ref().map(|e| e as &(dyn error::Error + 'static))
            }
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::io(err.to_string(), err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::url(format!("URL parse error: {err}"), Some(err))
    }
}

/// A specialized Result type for chat widget operations.
pub type Result<T> = std::result::Result<T, Error>;

///////////////////////////////////////////// ChatFailure ////////////////////////////////////////////

/// The two failures a user can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatFailure {
    /// Network failure, timeout, non-2xx status, or an undecodable body.
    TransportFailure,
    /// A 2xx response whose `result` was missing or empty.
    EmptyResult,
}

impl ChatFailure {
    /// The fixed apology rendered as the bot's reply.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatFailure::TransportFailure => TRANSPORT_FAILURE_MESSAGE,
            ChatFailure::EmptyResult => EMPTY_RESULT_MESSAGE,
        }
    }
}

impl fmt::Display for ChatFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        assert!(Error::api(500, "Internal Server Error").is_transport());
        assert!(Error::timeout("slow", Some(1.0)).is_transport());
        assert!(Error::connection("refused", None).is_transport());
        assert!(Error::serialization("bad body", None).is_transport());
        assert!(!Error::validation("bad timeout", Some("timeout".to_string())).is_transport());
        assert!(!Error::url("bad url", None).is_transport());
    }

    #[test]
    fn status_code_only_for_api() {
        assert_eq!(Error::api(404, "Not Found").status_code(), Some(404));
        assert_eq!(Error::connection("refused", None).status_code(), None);
    }

    #[test]
    fn display_includes_detail() {
        let err = Error::api(503, "Service Unavailable");
        assert_eq!(err.to_string(), "API error: 503 Service Unavailable");
        let err = Error::validation("must be positive", Some("timeout-secs".to_string()));
        assert_eq!(
            err.to_string(),
            "Validation error: must be positive (parameter: timeout-secs)"
        );
    }

    #[test]
    fn failure_messages_are_fixed() {
        assert_eq!(
            ChatFailure::TransportFailure.user_message(),
            "Failed to get response from server."
        );
        assert_eq!(
            ChatFailure::EmptyResult.user_message(),
            "Sorry, no response received."
        );
        assert_eq!(
            ChatFailure::EmptyResult.to_string(),
            "Sorry, no response received."
        );
    }

    #[test]
    fn json_error_converts_to_serialization() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Serialization { .. }));
        assert!(error::Error::source(&err).is_some());
    }
}
