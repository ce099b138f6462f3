//! Observability setup for the Prisma chat client.
//!
//! Structured logging through `tracing`, with optional OpenTelemetry span
//! export for local debugging of exchanges.

pub mod tracing_setup;
