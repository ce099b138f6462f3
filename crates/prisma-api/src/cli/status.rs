//! Service status command.

use anyhow::Result;
use console::style;
use serde::Serialize;

use prisma_core::chat::transport::ChatTransport;
use prisma_types::error::ChatError;
use prisma_types::wire::ServiceHealth;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub version: &'static str,
    pub base_url: String,
    pub mode: String,
    pub config_dir: String,
    pub healthy: bool,
    /// Status reported by `/health`, or the failure summary.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Reduce a health check result to `(healthy, status, detail)`.
pub fn health_summary(
    checked: &Result<ServiceHealth, ChatError>,
) -> (bool, String, Option<String>) {
    match checked {
        Ok(health) => (health.is_healthy(), health.status.clone(), None),
        Err(err) => (false, err.summary(), err.detail().map(str::to_string)),
    }
}

/// Query `GET /health` and print the result.
///
/// Fails when the service is unreachable or reports itself unhealthy.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let checked = state.dispatcher.transport().health().await;
    let (healthy, status, detail) = health_summary(&checked);

    let report = StatusReport {
        version: env!("CARGO_PKG_VERSION"),
        base_url: state.base_url().to_string(),
        mode: state.config.mode().to_string(),
        config_dir: state.config_dir.display().to_string(),
        healthy,
        status,
        detail,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !healthy {
        anyhow::bail!("el servicio no está disponible en {}", report.base_url);
    }
    Ok(())
}

fn print_report(report: &StatusReport) {
    let mark = if report.healthy {
        style("✓").green()
    } else {
        style("✗").red()
    };

    println!();
    println!(
        "  {} PrismaUNAL v{}",
        style("◆").magenta().bold(),
        report.version
    );
    println!();

    println!("  {}", style("── Servicio ──").dim());
    println!("  URL:    {}", style(&report.base_url).cyan());
    println!("  Estado: {} {}", mark, report.status);
    if let Some(detail) = &report.detail {
        println!("          {}", style(detail).dim());
    }
    println!();

    println!("  {}", style("── Cliente ──").dim());
    println!("  Modo:          {}", report.mode);
    println!("  Configuración: {}", style(&report.config_dir).dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_summary_healthy() {
        let checked = Ok(ServiceHealth {
            status: "healthy".to_string(),
        });
        assert_eq!(health_summary(&checked), (true, "healthy".to_string(), None));
    }

    #[test]
    fn test_health_summary_degraded() {
        let checked = Ok(ServiceHealth {
            status: "degraded".to_string(),
        });
        let (healthy, status, _) = health_summary(&checked);
        assert!(!healthy);
        assert_eq!(status, "degraded");
    }

    #[test]
    fn test_health_summary_unreachable() {
        let checked = Err(ChatError::Connection {
            detail: "connection refused".to_string(),
        });
        assert_eq!(
            health_summary(&checked),
            (
                false,
                "Error de conexión con el servidor".to_string(),
                Some("connection refused".to_string())
            )
        );
    }
}
