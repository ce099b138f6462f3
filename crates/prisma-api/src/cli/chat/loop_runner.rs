//! Main chat loop.
//!
//! One question at a time: while an exchange is running the input line is
//! still read, so Ctrl+C cancels the reply and any submitted line is
//! refused until the reply ends.

use std::io::Write;

use console::style;
use prisma_core::chat::dispatcher::{ExchangeEnd, ExchangeOutcome};
use prisma_core::transcript::reducer::TranscriptReducer;
use prisma_types::chat::ExchangeMode;
use prisma_types::error::ChatError;
use rustyline_async::SharedWriter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{ChatRenderer, ReplyPrinter, thinking_spinner};

/// Run the interactive chat until `/exit` or Ctrl+D.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let mut mode = state.config.mode();
    let (mut chat_input, mut writer) = ChatInput::new(mode)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    print_welcome_banner(&mut writer, state.base_url(), mode)?;

    let renderer = ChatRenderer::new();
    let mut reducer = TranscriptReducer::new();

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                writeln!(writer, "\n  {}", style("Sesión terminada.").dim())?;
                break;
            }
            InputEvent::Interrupted => {
                writeln!(
                    writer,
                    "  {}",
                    style("Ctrl+D para salir, o sigue preguntando.").dim()
                )?;
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(command) = commands::parse(&text) {
            match command {
                ChatCommand::Help => commands::print_help(&mut writer)?,
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    writeln!(writer, "\n  {}", style("Sesión terminada.").dim())?;
                    break;
                }
                ChatCommand::History => commands::print_history(&mut writer, reducer.messages())?,
                ChatCommand::Mode(requested) => {
                    mode = commands::next_mode(mode, requested);
                    chat_input.set_mode(mode);
                    info!(mode = %mode, "exchange mode changed");
                    writeln!(writer, "\n  {} Modo: {}\n", style("*").magenta().bold(), mode)?;
                }
                ChatCommand::Unknown(name) => {
                    writeln!(
                        writer,
                        "\n  {} Comando desconocido: {}. Escribe /help para ver los comandos.\n",
                        style("?").yellow().bold(),
                        style(name).dim()
                    )?;
                }
            }
            continue;
        }

        let cancel = CancellationToken::new();
        let mut printer =
            ReplyPrinter::new(&renderer, writer.clone(), true).with_spinner(thinking_spinner());
        let mut exit_requested = false;

        let result = {
            let exchange =
                state
                    .dispatcher
                    .exchange(mode, &mut reducer, &text, &cancel, &mut printer);
            tokio::pin!(exchange);

            loop {
                if exit_requested {
                    break (&mut exchange).await;
                }

                tokio::select! {
                    result = &mut exchange => break result,
                    event = chat_input.read_line() => match event {
                        InputEvent::Interrupted => {
                            debug!("cancelling exchange on interrupt");
                            cancel.cancel();
                        }
                        InputEvent::Eof => {
                            cancel.cancel();
                            exit_requested = true;
                        }
                        InputEvent::Message(line) if line.is_empty() => {}
                        InputEvent::Message(_) => {
                            writeln!(
                                writer,
                                "  {} {}; espera o pulsa Ctrl+C para cancelarla.",
                                style("!").yellow().bold(),
                                ChatError::ExchangeInFlight.summary()
                            )?;
                        }
                    },
                }
            }
        };
        printer.finish()?;

        report_outcome(&mut writer, mode, result)?;

        if exit_requested {
            writeln!(writer, "\n  {}", style("Sesión terminada.").dim())?;
            break;
        }
    }

    chat_input.close();
    Ok(())
}

/// Print what the transcript alone does not show about how an exchange ended.
fn report_outcome(
    writer: &mut SharedWriter,
    mode: ExchangeMode,
    result: Result<ExchangeOutcome, ChatError>,
) -> anyhow::Result<()> {
    match result {
        Ok(outcome) => match outcome.end {
            // Single-shot cancellation already left a diagnostic in the transcript.
            ExchangeEnd::Cancelled if mode == ExchangeMode::Streaming => {
                writeln!(writer, "  {}\n", style("(respuesta cancelada)").dim())?;
            }
            ExchangeEnd::Failed(err) => {
                debug!(error = %err, index = outcome.message_index, "exchange failed");
            }
            _ => {}
        },
        Err(err) => {
            writeln!(writer, "  {} {}\n", style("!").yellow().bold(), err.summary())?;
        }
    }
    Ok(())
}
