//! Port to the remote chat service.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition). Chunk
//! delivery is pull-based so the stream consumer can be driven by an
//! in-memory source in tests.
//!
//! Implementations live in prisma-infra (e.g. `HttpChatTransport`).

use std::future::Future;

use prisma_types::error::ChatError;
use prisma_types::wire::ServiceHealth;

/// A live response body, pulled one chunk at a time.
pub trait ChunkSource: Send {
    /// Next chunk of body text, or `Ok(None)` once the body has ended.
    ///
    /// A transport failure while reading maps to [`ChatError::Connection`].
    fn next_chunk(&mut self) -> impl Future<Output = Result<Option<String>, ChatError>> + Send;
}

/// Request side of the chat service.
pub trait ChatTransport: Send + Sync {
    type Chunks: ChunkSource;

    /// `POST /chat/stream`. Resolves once response headers arrive.
    ///
    /// A non-2xx status fails with [`ChatError::HttpStatus`] before any of
    /// the body is read.
    fn open_stream(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<Self::Chunks, ChatError>> + Send;

    /// `POST /chat`. Returns the raw response body of a 2xx response.
    ///
    /// Decoding the body is left to the caller.
    fn ask(&self, question: &str) -> impl Future<Output = Result<String, ChatError>> + Send;

    /// `GET /health`.
    fn health(&self) -> impl Future<Output = Result<ServiceHealth, ChatError>> + Send;
}
