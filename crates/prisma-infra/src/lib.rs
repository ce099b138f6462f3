//! Infrastructure layer for the Prisma chat client.
//!
//! Implements the transport port defined in `prisma-core` over HTTP
//! (reqwest) and loads the client configuration from disk.

pub mod config;
pub mod http;
