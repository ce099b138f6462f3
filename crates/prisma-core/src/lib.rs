//! Business logic for the Prisma chat client.
//!
//! This crate turns a chunked `/chat/stream` body into transcript updates
//! and defines the transport "port" that the infrastructure layer
//! implements. It depends only on `prisma-types` -- never on
//! `prisma-infra` or any HTTP crate.

pub mod chat;
pub mod stream;
pub mod transcript;
