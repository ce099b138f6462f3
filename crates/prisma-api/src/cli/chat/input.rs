//! Async line input for the chat loop.
//!
//! Wraps `rustyline_async::Readline` so a line can be read while a reply is
//! still streaming; output must go through the returned `SharedWriter` to
//! keep the prompt intact.

use console::style;
use prisma_types::chat::ExchangeMode;
use rustyline_async::{Readline, ReadlineError, ReadlineEvent, SharedWriter};

#[derive(Debug)]
pub enum InputEvent {
    /// A submitted line, trimmed.
    Message(String),
    /// Ctrl+D or a closed terminal.
    Eof,
    /// Ctrl+C.
    Interrupted,
}

pub struct ChatInput {
    rl: Readline,
}

/// Prompt text for the given mode.
pub fn prompt_for(mode: ExchangeMode) -> String {
    format!("  {} ", style(format!("Tú [{mode}] >")).green().bold())
}

impl ChatInput {
    pub fn new(mode: ExchangeMode) -> Result<(Self, SharedWriter), ReadlineError> {
        let (rl, writer) = Readline::new(prompt_for(mode))?;
        Ok((Self { rl }, writer))
    }

    pub fn set_mode(&mut self, mode: ExchangeMode) {
        let _ = self.rl.update_prompt(&prompt_for(mode));
    }

    /// Wait for the next input event. Non-empty lines are added to history.
    pub async fn read_line(&mut self) -> InputEvent {
        match self.rl.readline().await {
            Ok(ReadlineEvent::Line(line)) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    self.rl.add_history_entry(line.clone());
                }
                InputEvent::Message(line)
            }
            Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
            Ok(ReadlineEvent::Eof) | Err(_) => InputEvent::Eof,
        }
    }

    pub fn clear(&mut self) {
        let _ = self.rl.clear();
    }

    /// Flush pending output before the terminal is restored.
    pub fn close(mut self) {
        let _ = self.rl.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shows_mode() {
        assert!(prompt_for(ExchangeMode::Streaming).contains("[stream]"));
        assert!(prompt_for(ExchangeMode::SingleShot).contains("[single]"));
    }
}
