//! One-shot question command.

use crossterm::tty::IsTty;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use prisma_core::chat::dispatcher::{ExchangeEnd, ExchangeOutcome};
use prisma_core::transcript::observer::NoopObserver;
use prisma_core::transcript::reducer::TranscriptReducer;
use prisma_types::chat::ExchangeMode;

use crate::state::AppState;

use super::chat::renderer::{ChatRenderer, ReplyPrinter, thinking_spinner};

/// Machine-readable result of `prisma ask --json`.
#[derive(Debug, Serialize)]
pub struct AskReport {
    pub question: String,
    pub mode: ExchangeMode,
    /// `completed`, `cancelled` or `failed`.
    pub end: &'static str,
    /// Bot message text: the answer, or the diagnostic on failure.
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AskReport {
    pub fn new(
        question: &str,
        mode: ExchangeMode,
        reducer: &TranscriptReducer,
        outcome: &ExchangeOutcome,
    ) -> Self {
        let (end, error) = match &outcome.end {
            ExchangeEnd::Completed => ("completed", None),
            ExchangeEnd::Cancelled => ("cancelled", None),
            ExchangeEnd::Failed(err) => (
                "failed",
                Some(ErrorReport {
                    summary: err.summary(),
                    detail: err.detail().map(str::to_string),
                }),
            ),
        };

        Self {
            question: question.to_string(),
            mode,
            end,
            answer: reducer
                .messages()
                .get(outcome.message_index)
                .map(|m| m.content.clone()),
            error,
        }
    }
}

/// Ask `question` once and print the reply. Ctrl+C cancels the request.
pub async fn ask(state: &AppState, question: &str, json: bool) -> anyhow::Result<()> {
    let question = question.trim();
    if question.is_empty() {
        anyhow::bail!("la pregunta está vacía");
    }

    let mode = state.config.mode();
    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut reducer = TranscriptReducer::new();
    let outcome = if json {
        state
            .dispatcher
            .exchange(mode, &mut reducer, question, &cancel, &mut NoopObserver)
            .await?
    } else {
        let stdout = std::io::stdout();
        let styled = stdout.is_tty();
        let renderer = ChatRenderer::new();
        let mut printer = ReplyPrinter::new(&renderer, stdout, styled);
        if styled {
            printer = printer.with_spinner(thinking_spinner());
        }
        let outcome = state
            .dispatcher
            .exchange(mode, &mut reducer, question, &cancel, &mut printer)
            .await?;
        printer.finish()?;
        outcome
    };
    ctrl_c.abort();

    if json {
        let report = AskReport::new(question, mode, &reducer, &outcome);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match outcome.end {
        ExchangeEnd::Failed(err) => {
            Err(anyhow::Error::new(err).context("no se obtuvo respuesta del servicio"))
        }
        ExchangeEnd::Cancelled => anyhow::bail!("solicitud cancelada"),
        ExchangeEnd::Completed => Ok(()),
    }
}
