//! HttpChatTransport -- concrete [`ChatTransport`] for the chat service.
//!
//! Sends `POST /chat` (single-shot) and `POST /chat/stream` (streaming)
//! with a `{"pregunta": ...}` body, and `GET /health` for status checks.
//! Non-2xx statuses are reported before any of the body is read.

use std::time::Duration;

use prisma_core::chat::transport::ChatTransport;
use prisma_types::config::ClientConfig;
use prisma_types::error::ChatError;
use prisma_types::wire::{ChatRequest, ServiceHealth};
use tracing::debug;

use super::body::HttpChunkSource;
use crate::config::validate_base_url;

/// Map a reqwest failure (DNS, refused, reset, timeout) to the taxonomy.
pub(crate) fn connection_error(err: reqwest::Error) -> ChatError {
    ChatError::Connection {
        detail: err.to_string(),
    }
}

/// Chat service client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpChatTransport {
    client: reqwest::Client,
    base_url: String,
    /// Total limit for requests whose body is read in one piece.
    request_timeout: Duration,
}

impl HttpChatTransport {
    /// Create a transport from client configuration.
    ///
    /// Fails with [`ChatError::Config`] when the base URL is not an
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ChatError> {
        let base_url = validate_base_url(&config.base_url)?;

        let request_timeout = Duration::from_secs(config.request_timeout_secs);

        // Streams are only limited per read; whole-request limits are set
        // per request on the non-streaming endpoints.
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .read_timeout(request_timeout)
            .build()
            .map_err(|e| ChatError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            request_timeout,
        })
    }

    /// Base address requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a chat request and check its status, leaving the body unread.
    ///
    /// `total` bounds the whole request, body included.
    async fn post_question(
        &self,
        path: &str,
        question: &str,
        total: Option<Duration>,
    ) -> Result<reqwest::Response, ChatError> {
        let url = self.url(path);
        debug!(url = %url, "sending chat request");

        let mut request = self.client.post(&url).json(&ChatRequest::new(question));
        if let Some(total) = total {
            request = request.timeout(total);
        }

        let response = request.send().await.map_err(connection_error)?;

        check_status(response)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    debug!(status = status.as_u16(), "chat service responded");
    if !status.is_success() {
        return Err(ChatError::HttpStatus {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

impl ChatTransport for HttpChatTransport {
    type Chunks = HttpChunkSource;

    async fn open_stream(&self, question: &str) -> Result<HttpChunkSource, ChatError> {
        let response = self.post_question("/chat/stream", question, None).await?;
        Ok(HttpChunkSource::new(response))
    }

    async fn ask(&self, question: &str) -> Result<String, ChatError> {
        let response = self
            .post_question("/chat", question, Some(self.request_timeout))
            .await?;
        response.text().await.map_err(connection_error)
    }

    async fn health(&self) -> Result<ServiceHealth, ChatError> {
        let url = self.url("/health");
        let response = self
            .client
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(connection_error)?;

        let body = check_status(response)?
            .text()
            .await
            .map_err(connection_error)?;

        serde_json::from_str(&body).map_err(|e| ChatError::ResponseFormat {
            detail: e.to_string(),
        })
    }
}
