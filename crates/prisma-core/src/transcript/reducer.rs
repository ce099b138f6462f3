//! Transcript state machine.
//!
//! `TranscriptReducer` is the only writer of the transcript. It applies
//! user actions (starting an exchange) and stream events (deltas,
//! completion, failure) and reports each change as a [`TranscriptUpdate`].
//!
//! Invariants held by every operation:
//! - at most one bot message is in progress, and it is the last message;
//! - its content is the in-order concatenation of the deltas applied to it;
//! - a user message is always followed by its placeholder before any delta;
//! - messages are never removed.

use prisma_types::chat::{ExchangeState, Message};
use prisma_types::error::ChatError;
use tracing::{debug, warn};

use super::observer::TranscriptUpdate;

/// Marker that opens every diagnostic message.
pub const ERROR_MARKER: &str = "❌ **Error**";

/// Build the bot-authored diagnostic shown for a failed exchange.
pub fn format_diagnostic(summary: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("{ERROR_MARKER}: {summary}\n\n_{detail}_"),
        None => format!("{ERROR_MARKER}: {summary}"),
    }
}

/// Owns the ordered message list and the single exchange state.
#[derive(Debug, Default)]
pub struct TranscriptReducer {
    messages: Vec<Message>,
    exchange: ExchangeState,
}

impl TranscriptReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Immutable snapshot of the transcript.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn exchange_state(&self) -> ExchangeState {
        self.exchange
    }

    /// The bot message currently being filled by a stream, if any.
    pub fn in_progress(&self) -> Option<&Message> {
        match self.exchange {
            ExchangeState::InFlight(index) => self.messages.get(index),
            _ => None,
        }
    }

    /// Start a streaming exchange.
    ///
    /// Appends the user message and an empty bot placeholder and returns
    /// the placeholder's index. Rejected while another exchange is active.
    pub fn start_exchange(&mut self, user_text: &str) -> Result<usize, ChatError> {
        self.ensure_idle()?;

        self.messages.push(Message::user(user_text));
        self.messages.push(Message::bot(""));
        let index = self.messages.len() - 1;
        self.exchange = ExchangeState::InFlight(index);

        debug!(index, "exchange started");
        Ok(index)
    }

    /// Start a single-shot exchange.
    ///
    /// Appends only the user message; the reply is appended by [`reply`]
    /// or [`fail`]. Returns the user message's index.
    ///
    /// [`reply`]: Self::reply
    /// [`fail`]: Self::fail
    pub fn submit_question(&mut self, user_text: &str) -> Result<usize, ChatError> {
        self.ensure_idle()?;

        self.messages.push(Message::user(user_text));
        self.exchange = ExchangeState::AwaitingReply;

        let index = self.messages.len() - 1;
        debug!(index, "question submitted");
        Ok(index)
    }

    /// Append a delta to the in-progress bot message.
    ///
    /// Ignored when no streaming exchange is in flight, so stray late
    /// events cannot touch a finished message.
    pub fn apply_delta(&mut self, delta: &str) -> Option<TranscriptUpdate> {
        let ExchangeState::InFlight(index) = self.exchange else {
            debug!(len = delta.len(), "delta ignored: no exchange in flight");
            return None;
        };

        let message = self.messages.get_mut(index)?;
        message.content.push_str(delta);

        Some(TranscriptUpdate::DeltaApplied {
            index,
            delta: delta.to_string(),
        })
    }

    /// End the current exchange without touching content.
    ///
    /// Idempotent: completing an idle transcript is a no-op.
    pub fn complete(&mut self) -> Option<TranscriptUpdate> {
        let previous = std::mem::take(&mut self.exchange);
        match previous {
            ExchangeState::InFlight(index) => {
                debug!(index, "exchange completed");
                Some(TranscriptUpdate::Completed { index })
            }
            ExchangeState::AwaitingReply | ExchangeState::Idle => None,
        }
    }

    /// End the current exchange with a diagnostic.
    ///
    /// A streaming placeholder is overwritten with the diagnostic; otherwise
    /// a new bot message is appended. The user message is never touched.
    pub fn fail(&mut self, summary: &str, detail: Option<&str>) -> TranscriptUpdate {
        let diagnostic = format_diagnostic(summary, detail);
        let previous = std::mem::take(&mut self.exchange);

        let index = match previous {
            ExchangeState::InFlight(index) if index < self.messages.len() => {
                self.messages[index].content = diagnostic;
                index
            }
            _ => {
                self.messages.push(Message::bot(diagnostic));
                self.messages.len() - 1
            }
        };

        warn!(index, summary, "exchange failed");
        TranscriptUpdate::Failed { index }
    }

    /// Record the full reply of a single-shot exchange.
    pub fn reply(&mut self, answer: &str) -> TranscriptUpdate {
        let previous = std::mem::take(&mut self.exchange);

        let index = match previous {
            ExchangeState::InFlight(index) if index < self.messages.len() => {
                self.messages[index].content = answer.to_string();
                index
            }
            _ => {
                self.messages.push(Message::bot(answer));
                self.messages.len() - 1
            }
        };

        debug!(index, "reply recorded");
        TranscriptUpdate::Replied { index }
    }

    /// Record a stream line that failed to decode and return the error.
    ///
    /// Neither the transcript nor the exchange changes.
    pub fn malformed_event(&self, line: &str) -> ChatError {
        let err = ChatError::EventFormat {
            line: line.to_string(),
        };
        warn!(
            error = %err,
            summary = %err.summary(),
            state = ?self.exchange,
            "skipping malformed stream event"
        );
        err
    }

    fn ensure_idle(&self) -> Result<(), ChatError> {
        if self.exchange.is_active() {
            return Err(ChatError::ExchangeInFlight);
        }
        Ok(())
    }
}
