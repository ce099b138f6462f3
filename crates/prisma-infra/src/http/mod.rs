//! HTTP implementation of the chat transport.
//!
//! [`client::HttpChatTransport`] issues the requests; [`body::HttpChunkSource`]
//! pulls the streamed `/chat/stream` body chunk by chunk.

pub mod body;
pub mod client;

pub use body::HttpChunkSource;
pub use client::HttpChatTransport;
