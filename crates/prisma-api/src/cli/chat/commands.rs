//! Slash commands available inside the chat loop.

use std::io::Write;

use console::style;
use prisma_types::chat::{ExchangeMode, Message, Role};

/// Characters of each message shown by `/history`.
const HISTORY_PREVIEW_CHARS: usize = 100;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    Clear,
    Exit,
    /// Print the transcript so far.
    History,
    /// Switch exchange mode; `None` toggles.
    Mode(Option<ExchangeMode>),
    /// Unrecognized command or bad argument, with the text to report.
    Unknown(String),
}

/// Parse a line as a slash command; `None` when it is a question.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "/help" | "/h" | "/?" | "/ayuda" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" | "/salir" => ChatCommand::Exit,
        "/history" | "/historial" => ChatCommand::History,
        "/mode" | "/modo" if arg.is_empty() => ChatCommand::Mode(None),
        "/mode" | "/modo" => match arg.parse::<ExchangeMode>() {
            Ok(mode) => ChatCommand::Mode(Some(mode)),
            Err(_) => ChatCommand::Unknown(format!("/mode {arg}")),
        },
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// The mode `/mode` switches to from `current`.
pub fn next_mode(current: ExchangeMode, requested: Option<ExchangeMode>) -> ExchangeMode {
    requested.unwrap_or(match current {
        ExchangeMode::Streaming => ExchangeMode::SingleShot,
        ExchangeMode::SingleShot => ExchangeMode::Streaming,
    })
}

pub fn print_help(out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {}", style("Comandos disponibles:").bold())?;
    writeln!(out)?;
    for (name, help) in [
        ("/help", "Muestra esta ayuda"),
        ("/clear", "Limpia la pantalla"),
        ("/history", "Muestra la conversación"),
        ("/mode [stream|single]", "Cambia entre respuesta en vivo y completa"),
        ("/exit", "Termina la sesión"),
    ] {
        writeln!(out, "  {:<22} {}", style(name).cyan(), help)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("Ctrl+C cancela la respuesta en curso, Ctrl+D sale").dim()
    )?;
    writeln!(out)
}

/// Shorten `content` to `max` characters on a char boundary.
fn preview(content: &str, max: usize) -> String {
    let single_line = content.replace('\n', " ");
    if single_line.chars().count() <= max {
        return single_line;
    }
    let cut: String = single_line.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

pub fn print_history(out: &mut impl Write, messages: &[Message]) -> std::io::Result<()> {
    writeln!(out)?;
    if messages.is_empty() {
        writeln!(out, "  {}", style("Todavía no hay mensajes.").dim())?;
    }
    for message in messages {
        let label = match message.role {
            Role::User => style("Tú    ").green().bold(),
            Role::Bot => style("Prisma").magenta().bold(),
        };
        writeln!(
            out,
            "  {} {}",
            label,
            preview(&message.content, HISTORY_PREVIEW_CHARS)
        )?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/AYUDA"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /salir  "), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse("/mode"), Some(ChatCommand::Mode(None)));
        assert_eq!(
            parse("/mode single"),
            Some(ChatCommand::Mode(Some(ExchangeMode::SingleShot)))
        );
        assert_eq!(
            parse("/modo   stream"),
            Some(ChatCommand::Mode(Some(ExchangeMode::Streaming)))
        );
        assert_eq!(
            parse("/mode turbo"),
            Some(ChatCommand::Unknown("/mode turbo".to_string()))
        );
    }

    #[test]
    fn test_parse_question_is_not_command() {
        assert_eq!(parse("¿Cuándo abren las inscripciones?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn test_next_mode_toggles_or_sets() {
        assert_eq!(
            next_mode(ExchangeMode::Streaming, None),
            ExchangeMode::SingleShot
        );
        assert_eq!(
            next_mode(ExchangeMode::SingleShot, None),
            ExchangeMode::Streaming
        );
        assert_eq!(
            next_mode(ExchangeMode::Streaming, Some(ExchangeMode::Streaming)),
            ExchangeMode::Streaming
        );
    }

    #[test]
    fn test_preview_is_char_safe() {
        let long = "ñ".repeat(150);
        let short = preview(&long, 100);
        assert_eq!(short.chars().count(), 100);
        assert!(short.ends_with("..."));
        assert_eq!(preview("hola\nmundo", 100), "hola mundo");
    }

    #[test]
    fn test_print_history_lists_messages() {
        let messages = vec![Message::user("hola"), Message::bot("Hola, ¿en qué ayudo?")];
        let mut out = Vec::new();
        print_history(&mut out, &messages).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("hola"));
        assert!(text.contains("Hola, ¿en qué ayudo?"));
    }
}
