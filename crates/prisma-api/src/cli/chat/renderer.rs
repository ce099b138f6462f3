//! Terminal rendering of bot replies.
//!
//! `ChatRenderer` turns markdown into styled terminal text: `termimad` for
//! prose, `syntect` for fenced code. `ReplyPrinter` is the transcript
//! observer the CLI hands to the dispatcher: it echoes streamed deltas raw
//! as they arrive and renders whole replies and diagnostics once.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use prisma_core::transcript::observer::{TranscriptObserver, TranscriptUpdate};
use prisma_types::chat::Message;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;
use termimad::crossterm::style::Color;
use tracing::warn;

const CODE_THEME: &str = "base16-ocean.dark";

/// A run of markdown that is either prose or one fenced code block.
#[derive(Debug, PartialEq, Eq)]
pub enum Segment {
    Prose(String),
    Code { lang: String, body: String },
}

/// Split markdown on ``` fences. An unclosed fence runs to the end.
pub fn split_fences(markdown: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut prose = String::new();
    let mut code: Option<(String, String)> = None;

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") {
            match code.take() {
                Some((lang, body)) => segments.push(Segment::Code { lang, body }),
                None => {
                    if !prose.is_empty() {
                        segments.push(Segment::Prose(std::mem::take(&mut prose)));
                    }
                    let lang = trimmed.trim_start_matches('`').trim().to_string();
                    code = Some((lang, String::new()));
                }
            }
        } else if let Some((_, body)) = code.as_mut() {
            body.push_str(line);
            body.push('\n');
        } else {
            prose.push_str(line);
            prose.push('\n');
        }
    }

    if let Some((lang, body)) = code {
        if !body.is_empty() {
            segments.push(Segment::Code { lang, body });
        }
    }
    if !prose.is_empty() {
        segments.push(Segment::Prose(prose));
    }
    segments
}

/// Markdown renderer with syntax-highlighted code blocks.
pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Magenta);
        skin.headers[0].set_fg(Color::Magenta);
        skin.headers[1].set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown reply for the terminal.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        for segment in split_fences(markdown) {
            match segment {
                Segment::Prose(text) => output.push_str(&self.skin.term_text(&text).to_string()),
                Segment::Code { lang, body } => output.push_str(&self.highlight_code(&body, &lang)),
            }
        }
        output
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut output = String::new();
        let Some(theme) = self.theme_set.themes.get(CODE_THEME) else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        if !lang.is_empty() {
            output.push_str(&format!("  {}\n", style(format!("── {lang} ──")).dim()));
        }
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }
        output
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Spinner shown while waiting for the first part of a reply.
pub fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("pensando...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Transcript observer that prints the bot side of each exchange.
pub struct ReplyPrinter<'r, W: Write> {
    renderer: &'r ChatRenderer,
    out: W,
    spinner: Option<ProgressBar>,
    /// Render replies as markdown; plain text otherwise.
    markdown: bool,
    labelled: bool,
    streamed: bool,
}

impl<'r, W: Write> ReplyPrinter<'r, W> {
    pub fn new(renderer: &'r ChatRenderer, out: W, markdown: bool) -> Self {
        Self {
            renderer,
            out,
            spinner: None,
            markdown,
            labelled: false,
            streamed: false,
        }
    }

    /// Show `spinner` until the first output of the next reply.
    pub fn with_spinner(mut self, spinner: ProgressBar) -> Self {
        self.spinner = Some(spinner);
        self
    }

    /// Close the current reply; clears a spinner that never got output.
    pub fn finish(&mut self) -> std::io::Result<()> {
        self.stop_spinner();
        if self.streamed {
            writeln!(self.out)?;
        }
        if self.labelled {
            writeln!(self.out)?;
        }
        self.labelled = false;
        self.streamed = false;
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn label(&mut self) -> std::io::Result<()> {
        self.stop_spinner();
        if !self.labelled {
            self.labelled = true;
            write!(self.out, "\n  {} ", style("Prisma").magenta().bold())?;
        }
        Ok(())
    }

    fn echo(&mut self, delta: &str) -> std::io::Result<()> {
        self.label()?;
        self.streamed = true;
        write!(self.out, "{delta}")?;
        self.out.flush()
    }

    fn show(&mut self, message: &Message) -> std::io::Result<()> {
        self.label()?;
        if self.streamed {
            // The diagnostic replaces text that was already echoed.
            writeln!(self.out)?;
            self.streamed = false;
        }
        if self.markdown {
            writeln!(self.out)?;
            write!(self.out, "{}", self.renderer.render_final(&message.content))?;
        } else {
            writeln!(self.out, "{}", message.content)?;
        }
        self.out.flush()
    }
}

impl<W: Write> TranscriptObserver for ReplyPrinter<'_, W> {
    fn on_update(&mut self, transcript: &[Message], update: &TranscriptUpdate) {
        let result = match update {
            TranscriptUpdate::ExchangeStarted { .. }
            | TranscriptUpdate::QuestionSubmitted { .. }
            | TranscriptUpdate::Completed { .. } => Ok(()),
            TranscriptUpdate::DeltaApplied { delta, .. } => self.echo(delta),
            TranscriptUpdate::Replied { index } | TranscriptUpdate::Failed { index } => {
                match transcript.get(*index) {
                    Some(message) => self.show(message),
                    None => Ok(()),
                }
            }
        };

        if let Err(err) = result {
            warn!(error = %err, "failed to write reply to the terminal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(printer: ReplyPrinter<'_, Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_split_fences_prose_only() {
        assert_eq!(
            split_fences("Hola\n**mundo**"),
            vec![Segment::Prose("Hola\n**mundo**\n".to_string())]
        );
    }

    #[test]
    fn test_split_fences_code_block() {
        let segments = split_fences("Ejemplo:\n```python\nprint('hola')\n```\nFin");
        assert_eq!(
            segments,
            vec![
                Segment::Prose("Ejemplo:\n".to_string()),
                Segment::Code {
                    lang: "python".to_string(),
                    body: "print('hola')\n".to_string(),
                },
                Segment::Prose("Fin\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_split_fences_unclosed_block_runs_to_end() {
        let segments = split_fences("```\nlet x = 1;");
        assert_eq!(
            segments,
            vec![Segment::Code {
                lang: String::new(),
                body: "let x = 1;\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_render_final_keeps_prose_text() {
        let renderer = ChatRenderer::new();
        let rendered = renderer.render_final("Las inscripciones abren en marzo.");
        assert!(rendered.contains("Las inscripciones abren en marzo."));
    }

    #[test]
    fn test_render_final_highlights_code() {
        let renderer = ChatRenderer::new();
        let rendered = renderer.render_final("```rust\nfn main() {}\n```");
        assert!(rendered.contains("rust"));
        assert!(rendered.contains("\x1b["));
    }

    #[test]
    fn test_printer_echoes_deltas_in_order() {
        let renderer = ChatRenderer::new();
        let mut printer = ReplyPrinter::new(&renderer, Vec::new(), false);
        let transcript = vec![Message::user("hola"), Message::bot("Hola, ")];

        printer.on_update(
            &transcript,
            &TranscriptUpdate::DeltaApplied {
                index: 1,
                delta: "Hola, ".to_string(),
            },
        );
        printer.on_update(
            &transcript,
            &TranscriptUpdate::DeltaApplied {
                index: 1,
                delta: "¿qué tal?".to_string(),
            },
        );
        printer.on_update(&transcript, &TranscriptUpdate::Completed { index: 1 });
        printer.finish().unwrap();

        let out = printed(printer);
        assert!(out.contains("Prisma"));
        assert!(out.contains("Hola, ¿qué tal?"));
        assert_eq!(out.matches("Prisma").count(), 1);
    }

    #[test]
    fn test_printer_shows_failure_diagnostic() {
        let renderer = ChatRenderer::new();
        let mut printer = ReplyPrinter::new(&renderer, Vec::new(), false);
        let diagnostic = "❌ **Error**: Error de conexión con el servidor";
        let transcript = vec![Message::user("hola"), Message::bot(diagnostic)];

        printer.on_update(&transcript, &TranscriptUpdate::Failed { index: 1 });
        printer.finish().unwrap();

        assert!(printed(printer).contains(diagnostic));
    }

    #[test]
    fn test_printer_ignores_out_of_range_index() {
        let renderer = ChatRenderer::new();
        let mut printer = ReplyPrinter::new(&renderer, Vec::new(), false);

        printer.on_update(&[], &TranscriptUpdate::Replied { index: 3 });
        printer.finish().unwrap();

        assert_eq!(printed(printer), "");
    }

    #[test]
    fn test_printer_clears_spinner_without_output() {
        let renderer = ChatRenderer::new();
        let spinner = ProgressBar::hidden();
        let mut printer =
            ReplyPrinter::new(&renderer, Vec::new(), false).with_spinner(spinner.clone());

        printer.finish().unwrap();

        assert!(spinner.is_finished());
    }
}
