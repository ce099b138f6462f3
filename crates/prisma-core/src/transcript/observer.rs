//! Read-only observation of transcript changes.

use prisma_types::chat::Message;

/// What a reducer operation changed.
///
/// Indices point into the transcript slice passed alongside the update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptUpdate {
    /// A user message and an empty bot placeholder were appended.
    ExchangeStarted { index: usize },
    /// A user message was appended for a single-shot exchange.
    QuestionSubmitted { index: usize },
    /// `delta` was appended to the bot message at `index`.
    DeltaApplied { index: usize, delta: String },
    /// The streaming exchange filling `index` ended.
    Completed { index: usize },
    /// The bot message at `index` now holds a diagnostic.
    Failed { index: usize },
    /// A full bot reply was appended at `index`.
    Replied { index: usize },
}

impl TranscriptUpdate {
    /// Index of the message this update touched.
    pub fn index(&self) -> usize {
        match self {
            TranscriptUpdate::ExchangeStarted { index }
            | TranscriptUpdate::QuestionSubmitted { index }
            | TranscriptUpdate::DeltaApplied { index, .. }
            | TranscriptUpdate::Completed { index }
            | TranscriptUpdate::Failed { index }
            | TranscriptUpdate::Replied { index } => *index,
        }
    }
}

/// Receives every transcript change, in application order.
///
/// Observers get an immutable view of the whole transcript; only the
/// reducer writes to it.
pub trait TranscriptObserver {
    fn on_update(&mut self, transcript: &[Message], update: &TranscriptUpdate);
}

impl<F> TranscriptObserver for F
where
    F: FnMut(&[Message], &TranscriptUpdate),
{
    fn on_update(&mut self, transcript: &[Message], update: &TranscriptUpdate) {
        self(transcript, update)
    }
}

/// Observer that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TranscriptObserver for NoopObserver {
    fn on_update(&mut self, _transcript: &[Message], _update: &TranscriptUpdate) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_index() {
        let update = TranscriptUpdate::DeltaApplied {
            index: 3,
            delta: "x".to_string(),
        };
        assert_eq!(update.index(), 3);
        assert_eq!(TranscriptUpdate::Failed { index: 1 }.index(), 1);
    }

    #[test]
    fn test_closure_observer_records_updates() {
        let mut seen = Vec::new();
        {
            let mut observer = |transcript: &[Message], update: &TranscriptUpdate| {
                seen.push((transcript.len(), update.clone()));
            };
            let transcript = vec![Message::user("hola"), Message::bot("")];
            observer.on_update(&transcript, &TranscriptUpdate::ExchangeStarted { index: 1 });
        }
        assert_eq!(seen, vec![(2, TranscriptUpdate::ExchangeStarted { index: 1 })]);
    }
}
