use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{ConversationRequest, ConversationResponse};

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/";
/// Path of the chat endpoint, resolved against the base URL.
pub const DEFAULT_ENDPOINT: &str = "/api/chat";
/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Anything that can carry a conversation request to a server and bring back its reply.
///
/// [`ChatClient`] is the HTTP implementation.  The session only depends on this trait so it can be
/// driven by something other than a socket.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one request and wait for the server's response.
    ///
    /// Non-2xx statuses, transport failures, and bodies that are not JSON all come back as errors.
    async fn converse(&self, request: &ConversationRequest) -> Result<ConversationResponse>;
}

/// Client for the `/api/chat` endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: ReqwestClient,
    base_url: Url,
    endpoint: String,
    timeout: Duration,
}

impl ChatClient {
    /// Create a new client talking to `base_url` with the default endpoint and timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        base_url: &str,
        endpoint: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::url(
                format!("{base_url} cannot be used as a base URL"),
                None,
            ));
        }
        let endpoint = endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        // Surface a bad endpoint now rather than on the first submission.
        base_url.join(&endpoint)?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::validation(
                "timeout must be greater than zero",
                Some("timeout".to_string()),
            ));
        }
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            endpoint,
            timeout,
        })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured endpoint path.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The fully resolved endpoint URL.
    ///
    /// An absolute path replaces the base URL's path, the same way a browser resolves
    /// `fetch('/api/chat')` against the page it was loaded from.
    pub fn endpoint_url(&self) -> Result<Url> {
        Ok(self.base_url.join(&self.endpoint)?)
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Send a conversation to the endpoint and decode the response.
    pub async fn send(&self, request: &ConversationRequest) -> Result<ConversationResponse> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let result = self.send_inner(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        if result.is_err() {
            CLIENT_REQUEST_ERRORS.click();
        }
        result
    }

    async fn send_inner(&self, request: &ConversationRequest) -> Result<ConversationResponse> {
        let url = self.endpoint_url()?;
        tracing::debug!(%url, turns = request.conversation.len(), "posting conversation");

        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            return Err(Error::api(status.as_u16(), reason));
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Timed out reading response: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else {
                Error::http_client(format!("Failed to read response: {}", e), Some(Box::new(e)))
            }
        })?;
        ConversationResponse::from_body(&body).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}

#[async_trait::async_trait]
impl ChatTransport for ChatClient {
    async fn converse(&self, request: &ConversationRequest) -> Result<ConversationResponse> {
        self.send(request).await
    }
}
