//! PrismaUNAL terminal client entry point.
//!
//! Binary name: `prisma`
//!
//! Parses CLI arguments, initializes tracing and the HTTP transport, then
//! dispatches to the interactive chat loop or a one-shot command.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use prisma_observe::tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = filter_for_verbosity(cli.verbose, cli.quiet);
    init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;

    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Commands::Chat { single_shot: false });

    // Shell completions don't need a transport
    if let Commands::Completions { shell } = &command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "prisma", &mut std::io::stdout());
        return Ok(());
    }

    let single_shot = matches!(
        command,
        Commands::Chat { single_shot: true } | Commands::Ask { single_shot: true, .. }
    );
    let state = AppState::init(cli.base_url, single_shot).await?;

    match command {
        Commands::Chat { .. } => {
            cli::chat::loop_runner::run_chat_loop(&state).await?;
        }

        Commands::Ask { question, .. } => {
            cli::ask::ask(&state, &question.join(" "), cli.json).await?;
        }

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
