//! CLI command definitions for the `prisma` binary.
//!
//! Uses clap derive macros for argument parsing. Running `prisma` with no
//! subcommand starts the interactive chat.

pub mod ask;
pub mod chat;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with the PrismaUNAL assistant from the terminal.
#[derive(Parser)]
#[command(name = "prisma", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Chat service address (overrides config.toml).
    #[arg(long, global = true, env = "PRISMA_BASE_URL")]
    pub base_url: Option<String>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all log output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logs (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default).
    Chat {
        /// Wait for the whole answer instead of streaming it.
        #[arg(long)]
        single_shot: bool,
    },

    /// Ask a single question and print the answer.
    Ask {
        /// The question to send.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// Wait for the whole answer instead of streaming it.
        #[arg(long)]
        single_shot: bool,
    },

    /// Check whether the chat service is reachable and healthy.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_chat() {
        let cli = Cli::try_parse_from(["prisma"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["prisma", "ask", "¿Qué", "es", "PrismaUNAL?", "--single-shot"])
            .unwrap();
        match cli.command {
            Some(Commands::Ask {
                question,
                single_shot,
            }) => {
                assert_eq!(question.join(" "), "¿Qué es PrismaUNAL?");
                assert!(single_shot);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "prisma",
            "status",
            "--json",
            "--base-url",
            "http://10.0.0.2:8000",
            "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.2:8000"));
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_ask_requires_question() {
        assert!(Cli::try_parse_from(["prisma", "ask"]).is_err());
    }
}
