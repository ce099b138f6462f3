//! Welcome banner shown when a chat session starts.

use std::io::Write;

use console::style;
use prisma_types::chat::ExchangeMode;

pub fn print_welcome_banner(
    out: &mut impl Write,
    base_url: &str,
    mode: ExchangeMode,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "  {} {}", style("◆").magenta(), style("PrismaUNAL").magenta().bold())?;
    writeln!(
        out,
        "  {}",
        style("Asistente de preguntas de la Universidad Nacional").dim()
    )?;
    writeln!(out)?;
    writeln!(out, "  {}  {}", style("Servidor:").bold(), style(base_url).dim())?;
    writeln!(out, "  {}      {}", style("Modo:").bold(), style(mode).dim())?;
    writeln!(out)?;
    writeln!(
        out,
        "  {}",
        style("Escribe /help para ver los comandos, Ctrl+D para salir").dim()
    )?;
    writeln!(out, "  {}", style("---").dim())?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_shows_server_and_mode() {
        let mut out = Vec::new();
        print_welcome_banner(&mut out, "http://localhost:8000", ExchangeMode::SingleShot).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("http://localhost:8000"));
        assert!(text.contains("single"));
    }
}
