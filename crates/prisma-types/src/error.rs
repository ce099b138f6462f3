use thiserror::Error;

/// Summary shown when the service cannot be reached.
pub const CONNECTION_SUMMARY: &str = "Error de conexión con el servidor";

/// Summary shown when the service flags a failure without a message of its own.
pub const SERVER_FALLBACK_SUMMARY: &str = "Error procesando la pregunta";

/// Errors produced while talking to the chat service.
///
/// Every variant except `EventFormat` terminates the current exchange and
/// is surfaced to the user as a bot-authored diagnostic; `EventFormat` is
/// logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("connection error: {detail}")]
    Connection { detail: String },

    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("response format error: {detail}")]
    ResponseFormat { detail: String },

    #[error("server reported error: {detail}")]
    ServerReported {
        message: Option<String>,
        detail: String,
    },

    #[error("malformed stream event: {line}")]
    EventFormat { line: String },

    #[error("an exchange is already in flight")]
    ExchangeInFlight,

    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// User-facing one-line summary of the failure.
    pub fn summary(&self) -> String {
        match self {
            ChatError::Connection { .. } => CONNECTION_SUMMARY.to_string(),
            ChatError::HttpStatus { status } => {
                format!("El servidor respondió con el estado HTTP {status}")
            }
            ChatError::ResponseFormat { .. } => {
                "La respuesta del servidor no tiene un formato válido".to_string()
            }
            ChatError::ServerReported { message, .. } => message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(SERVER_FALLBACK_SUMMARY)
                .to_string(),
            ChatError::EventFormat { .. } => "Evento de stream inválido".to_string(),
            ChatError::ExchangeInFlight => "Ya hay una respuesta en curso".to_string(),
            ChatError::Config(_) => "Configuración inválida".to_string(),
        }
    }

    /// Optional technical detail shown under the summary.
    pub fn detail(&self) -> Option<&str> {
        let detail = match self {
            ChatError::Connection { detail }
            | ChatError::ResponseFormat { detail }
            | ChatError::ServerReported { detail, .. } => detail.as_str(),
            ChatError::EventFormat { line } => line.as_str(),
            ChatError::Config(detail) => detail.as_str(),
            ChatError::HttpStatus { .. } | ChatError::ExchangeInFlight => return None,
        };
        (!detail.is_empty()).then_some(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_summary_and_detail() {
        let err = ChatError::Connection {
            detail: "connection refused".to_string(),
        };
        assert_eq!(err.summary(), CONNECTION_SUMMARY);
        assert_eq!(err.detail(), Some("connection refused"));
        assert_eq!(err.to_string(), "connection error: connection refused");
    }

    #[test]
    fn test_http_status_summary_has_code() {
        let err = ChatError::HttpStatus { status: 503 };
        assert!(err.summary().contains("503"));
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_server_reported_uses_message() {
        let err = ChatError::ServerReported {
            message: Some("No se pudo procesar".to_string()),
            detail: "timeout".to_string(),
        };
        assert_eq!(err.summary(), "No se pudo procesar");
        assert_eq!(err.detail(), Some("timeout"));
    }

    #[test]
    fn test_server_reported_falls_back() {
        let err = ChatError::ServerReported {
            message: None,
            detail: String::new(),
        };
        assert_eq!(err.summary(), SERVER_FALLBACK_SUMMARY);
        assert_eq!(err.detail(), None);
    }
}
