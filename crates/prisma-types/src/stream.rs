//! Typed events decoded from the `/chat/stream` frame protocol.

use serde::{Deserialize, Serialize};

/// One event decoded from a stream line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// An incremental fragment of the bot reply.
    ContentDelta(String),

    /// The server's completion sentinel (`"done": true`).
    Completed,

    /// A `data:` line whose payload did not decode. Carries the raw line.
    Malformed(String),
}

/// Decoded payload of one `data:` frame.
///
/// Both fields are optional on the wire; a frame carrying neither is
/// ignored by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramePayload {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_payload_content_only() {
        let payload: FramePayload = serde_json::from_str(r#"{"content":"Es "}"#).unwrap();
        assert_eq!(payload.content.as_deref(), Some("Es "));
        assert_eq!(payload.done, None);
    }

    #[test]
    fn test_frame_payload_done_only() {
        let payload: FramePayload = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert_eq!(payload.done, Some(true));
        assert!(payload.content.is_none());
    }

    #[test]
    fn test_frame_payload_ignores_unknown_fields() {
        let payload: FramePayload =
            serde_json::from_str(r#"{"content":"x","sources":["a.pdf"]}"#).unwrap();
        assert_eq!(payload.content.as_deref(), Some("x"));
    }

    #[test]
    fn test_frame_payload_null_content() {
        let payload: FramePayload = serde_json::from_str(r#"{"content":null}"#).unwrap();
        assert_eq!(payload, FramePayload::default());
    }
}
