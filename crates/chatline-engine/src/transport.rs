//! Transport adapter for the remote chat endpoint.
//!
//! The [`Transport`] trait is the seam between the conversation controller
//! and the network. [`HttpTransport`] is the production implementation: one
//! JSON `POST` per message, no retry, no client-side timeout.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;

/// Path appended to the configured base URL.
pub const MESSAGE_PATH: &str = "/chat/message";

/// Sends a single user message and resolves with the reply text.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `message` and return the assistant's reply.
    ///
    /// `message` is already trimmed and non-empty.
    async fn send(&self, message: &str) -> Result<String, TransportError>;
}

/// Request body for the chat endpoint.
#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    message: &'a str,
}

/// Response body from the chat endpoint.
#[derive(Debug, Deserialize)]
struct MessageReply {
    result: String,
}

/// HTTP implementation of [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Create a transport posting to `{base_url}/chat/message`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a transport with a caller-supplied client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: message_endpoint(base_url),
        }
    }

    /// Create a transport from resolved configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, message: &str) -> Result<String, TransportError> {
        debug!(endpoint = %self.endpoint, len = message.len(), "sending chat message");

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&MessagePayload { message })
            .send()
            .await
            .map_err(TransportError::Network)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "chat endpoint returned an error status");
            return Err(TransportError::Status(status));
        }

        let body = response.bytes().await.map_err(TransportError::Network)?;
        let reply: MessageReply = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "chat endpoint returned a malformed body");
            TransportError::Decode(e)
        })?;

        if reply.result.is_empty() {
            return Err(TransportError::EmptyReply);
        }

        debug!(len = reply.result.len(), "received chat reply");
        Ok(reply.result)
    }
}

/// Join a base URL and [`MESSAGE_PATH`], tolerating trailing slashes.
pub fn message_endpoint(base_url: &str) -> String {
    format!("{}{MESSAGE_PATH}", base_url.trim_end_matches('/'))
}

/// Errors that can occur while sending a message.
///
/// The controller does not distinguish these; any of them becomes the same
/// failure turn. They exist for logging and diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection or I/O failure.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Endpoint answered with a non-2xx status.
    #[error("Request failed with status: {0}")]
    Status(StatusCode),

    /// Body was not JSON or lacked a string `result` field.
    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// Endpoint answered with an empty `result`.
    #[error("Empty reply")]
    EmptyReply,

    /// The request task ended before producing a result.
    #[error("Request aborted: {0}")]
    Aborted(String),
}
