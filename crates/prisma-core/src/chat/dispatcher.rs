//! Exchange orchestration.
//!
//! `RequestDispatcher` issues one request per exchange through a
//! [`ChatTransport`] and drives the response into a [`TranscriptReducer`]:
//!
//! - streaming: chunks -> [`FrameDecoder`] -> [`EventParser`] -> reducer,
//!   strictly in arrival order;
//! - single-shot: one body, decoded as a [`ChatResponse`].
//!
//! The pipeline only suspends while awaiting response headers or the next
//! chunk. Both waits race the caller's cancellation token.

use prisma_types::chat::{ExchangeMode, ExchangeState};
use prisma_types::error::ChatError;
use prisma_types::stream::StreamEvent;
use prisma_types::wire::ChatResponse;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::stream::decoder::FrameDecoder;
use crate::stream::parser::EventParser;
use crate::transcript::observer::{TranscriptObserver, TranscriptUpdate};
use crate::transcript::reducer::TranscriptReducer;

use super::transport::{ChatTransport, ChunkSource};

/// Summary of the diagnostic left by a cancelled single-shot exchange.
pub const CANCELLED_SUMMARY: &str = "Solicitud cancelada";

/// How an exchange ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeEnd {
    /// The body ended or the completion sentinel arrived.
    Completed,
    /// The caller cancelled; streamed content received so far is kept.
    Cancelled,
    /// The exchange failed and the transcript holds a diagnostic.
    Failed(ChatError),
}

/// Result of one dispatched exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeOutcome {
    /// Index of the bot message that answers this exchange.
    pub message_index: usize,
    pub end: ExchangeEnd,
    /// Exchange state after the call; always `Idle`.
    pub state: ExchangeState,
}

/// Issues chat requests and folds their responses into a transcript.
pub struct RequestDispatcher<T> {
    transport: T,
}

impl<T: ChatTransport> RequestDispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one exchange in the given mode.
    ///
    /// Fails only with [`ChatError::ExchangeInFlight`], when the reducer
    /// already has an outstanding exchange; every other failure is folded
    /// into the transcript and reported through [`ExchangeEnd::Failed`].
    pub async fn exchange<O>(
        &self,
        mode: ExchangeMode,
        reducer: &mut TranscriptReducer,
        question: &str,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<ExchangeOutcome, ChatError>
    where
        O: TranscriptObserver + ?Sized,
    {
        match mode {
            ExchangeMode::Streaming => {
                self.stream_exchange(reducer, question, cancel, observer)
                    .await
            }
            ExchangeMode::SingleShot => {
                self.single_shot_exchange(reducer, question, cancel, observer)
                    .await
            }
        }
    }

    /// Streaming exchange against `/chat/stream`.
    pub async fn stream_exchange<O>(
        &self,
        reducer: &mut TranscriptReducer,
        question: &str,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<ExchangeOutcome, ChatError>
    where
        O: TranscriptObserver + ?Sized,
    {
        let index = reducer.start_exchange(question)?;
        notify(observer, reducer, TranscriptUpdate::ExchangeStarted { index });
        info!(index, mode = %ExchangeMode::Streaming, "exchange started");

        let end = match self.pump_stream(reducer, question, cancel, observer).await {
            Ok(end) => {
                if end == ExchangeEnd::Cancelled {
                    if let Some(partial) = reducer.in_progress() {
                        info!(index, kept = partial.content.len(), "keeping partial reply");
                    }
                }
                if let Some(update) = reducer.complete() {
                    notify(observer, reducer, update);
                }
                end
            }
            Err(err) => {
                warn!(error = %err, "streaming exchange failed");
                let update = reducer.fail(&err.summary(), err.detail());
                notify(observer, reducer, update);
                ExchangeEnd::Failed(err)
            }
        };

        info!(index, end = ?end, "exchange finished");
        Ok(ExchangeOutcome {
            message_index: index,
            end,
            state: reducer.exchange_state(),
        })
    }

    /// Pull the body until it ends, the sentinel arrives, or the caller
    /// cancels. Transport failures are returned to the caller.
    async fn pump_stream<O>(
        &self,
        reducer: &mut TranscriptReducer,
        question: &str,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<ExchangeEnd, ChatError>
    where
        O: TranscriptObserver + ?Sized,
    {
        let mut chunks = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(ExchangeEnd::Cancelled),
            opened = self.transport.open_stream(question) => opened?,
        };

        let mut decoder = FrameDecoder::new();
        let parser = EventParser::new();
        let mut end = ExchangeEnd::Completed;

        'pull: loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(buffered = decoder.pending().len(), "stream cancelled");
                    end = ExchangeEnd::Cancelled;
                    break 'pull;
                }
                next = chunks.next_chunk() => next?,
            };

            let Some(chunk) = next else {
                debug!("stream body ended");
                break;
            };

            for line in decoder.feed(&chunk) {
                match parser.parse(&line) {
                    Some(StreamEvent::ContentDelta(delta)) => {
                        if let Some(update) = reducer.apply_delta(&delta) {
                            notify(observer, reducer, update);
                        }
                    }
                    Some(StreamEvent::Completed) => {
                        debug!("completion sentinel received");
                        break 'pull;
                    }
                    Some(StreamEvent::Malformed(raw)) => {
                        reducer.malformed_event(&raw);
                    }
                    None => {}
                }
            }
        }

        if let Some(fragment) = decoder.finish() {
            debug!(len = fragment.len(), "dropping unterminated stream fragment");
        }

        Ok(end)
    }

    /// Single-shot exchange against `/chat`.
    pub async fn single_shot_exchange<O>(
        &self,
        reducer: &mut TranscriptReducer,
        question: &str,
        cancel: &CancellationToken,
        observer: &mut O,
    ) -> Result<ExchangeOutcome, ChatError>
    where
        O: TranscriptObserver + ?Sized,
    {
        let user_index = reducer.submit_question(question)?;
        notify(
            observer,
            reducer,
            TranscriptUpdate::QuestionSubmitted { index: user_index },
        );
        info!(index = user_index, mode = %ExchangeMode::SingleShot, "exchange started");

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            body = self.transport.ask(question) => Some(body),
        };

        let (update, end) = match body.map(|body| body.and_then(|b| decode_reply(&b))) {
            None => (
                reducer.fail(CANCELLED_SUMMARY, None),
                ExchangeEnd::Cancelled,
            ),
            Some(Ok(answer)) => (reducer.reply(&answer), ExchangeEnd::Completed),
            Some(Err(err)) => {
                warn!(error = %err, "single-shot exchange failed");
                (
                    reducer.fail(&err.summary(), err.detail()),
                    ExchangeEnd::Failed(err),
                )
            }
        };

        let message_index = update.index();
        notify(observer, reducer, update);

        info!(index = message_index, end = ?end, "exchange finished");
        Ok(ExchangeOutcome {
            message_index,
            end,
            state: reducer.exchange_state(),
        })
    }
}

/// Decode a `/chat` body into the answer text.
pub fn decode_reply(body: &str) -> Result<String, ChatError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ChatError::ResponseFormat {
            detail: e.to_string(),
        })?;

    if let Some(detail) = response.failure() {
        return Err(ChatError::ServerReported {
            message: response.message.clone(),
            detail: detail.to_string(),
        });
    }

    response.answer.ok_or_else(|| ChatError::ResponseFormat {
        detail: "missing field `respuesta`".to_string(),
    })
}

fn notify<O>(observer: &mut O, reducer: &TranscriptReducer, update: TranscriptUpdate)
where
    O: TranscriptObserver + ?Sized,
{
    observer.on_update(reducer.messages(), &update);
}
