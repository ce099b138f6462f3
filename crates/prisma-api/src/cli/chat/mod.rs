//! Interactive terminal chat with the PrismaUNAL service.
//!
//! Streams replies as they arrive, renders finished replies as markdown,
//! and keeps reading input while a reply is in flight so Ctrl+C can cancel
//! it. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
pub mod renderer;
