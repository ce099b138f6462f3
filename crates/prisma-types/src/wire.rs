//! Request and response bodies of the chat service.
//!
//! The service speaks Spanish field names on the wire (`pregunta`,
//! `respuesta`, `mensaje`); the Rust side uses English names with serde
//! renames.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat` and `POST /chat/stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "pregunta")]
    pub question: String,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// Body of a `POST /chat` response.
///
/// Success carries `respuesta`; a failure carries a non-empty `error` and
/// optionally a user-facing `mensaje`. An empty or null `error` does not
/// flag a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Technical detail of a failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// User-facing summary of a failure.
    #[serde(rename = "mensaje", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "pregunta", default, skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(rename = "respuesta", default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl ChatResponse {
    /// The failure detail, when the body flags one.
    pub fn failure(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.is_empty())
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_name() {
        let body = serde_json::to_value(ChatRequest::new("¿Qué es PrismaUNAL?")).unwrap();
        assert_eq!(body, serde_json::json!({ "pregunta": "¿Qué es PrismaUNAL?" }));
    }

    #[test]
    fn test_chat_response_answer() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"pregunta":"hola","respuesta":"Hola, soy un bot."}"#)
                .unwrap();
        assert_eq!(resp.failure(), None);
        assert_eq!(resp.question.as_deref(), Some("hola"));
        assert_eq!(resp.answer.as_deref(), Some("Hola, soy un bot."));
    }

    #[test]
    fn test_chat_response_failure_with_message() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"error":"timeout","mensaje":"No se pudo procesar"}"#)
                .unwrap();
        assert_eq!(resp.failure(), Some("timeout"));
        assert_eq!(resp.message.as_deref(), Some("No se pudo procesar"));
    }

    #[test]
    fn test_chat_response_empty_or_null_error_is_not_a_failure() {
        for body in [
            r#"{"error":"","pregunta":"hola","respuesta":"Hola."}"#,
            r#"{"error":null,"respuesta":"Hola."}"#,
        ] {
            let resp: ChatResponse = serde_json::from_str(body).unwrap();
            assert_eq!(resp.failure(), None, "{body}");
            assert_eq!(resp.answer.as_deref(), Some("Hola."));
        }
    }

    #[test]
    fn test_chat_response_rejects_non_objects() {
        assert!(serde_json::from_str::<ChatResponse>("<html>").is_err());
        assert!(serde_json::from_str::<ChatResponse>(r#"["respuesta"]"#).is_err());
        assert!(serde_json::from_str::<ChatResponse>(r#"{"respuesta":42}"#).is_err());
    }

    #[test]
    fn test_service_health() {
        let health: ServiceHealth = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert!(health.is_healthy());
    }
}
