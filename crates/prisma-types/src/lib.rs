//! Shared domain types for the Prisma chat client.
//!
//! This crate contains the types used across the client: transcript
//! messages, exchange state, stream events, the chat service wire format,
//! client configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod stream;
pub mod wire;
