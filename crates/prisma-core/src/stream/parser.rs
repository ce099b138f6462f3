//! `data:` line to [`StreamEvent`] parsing.
//!
//! Lines without the data prefix (SSE comments, keep-alives, `event:` or
//! blank separator lines) are ignored. Payload decoding failures are not
//! fatal: they surface as [`StreamEvent::Malformed`] and the stream goes on.

use prisma_types::stream::{FramePayload, StreamEvent};

/// Prefix carried by every data frame line.
pub const DATA_PREFIX: &str = "data: ";

/// Stateless parser from decoded lines to stream events.
///
/// After it yields [`StreamEvent::Completed`] the caller must stop feeding
/// it lines from the same stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one complete line.
    ///
    /// Returns `None` for lines that carry no event: non-data lines and
    /// payloads with neither a completion flag nor content.
    pub fn parse(&self, line: &str) -> Option<StreamEvent> {
        let payload = line.strip_prefix(DATA_PREFIX)?;

        let frame: FramePayload = match serde_json::from_str(payload) {
            Ok(frame) => frame,
            Err(_) => return Some(StreamEvent::Malformed(line.to_string())),
        };

        if frame.done == Some(true) {
            return Some(StreamEvent::Completed);
        }

        frame.content.map(StreamEvent::ContentDelta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<StreamEvent> {
        EventParser::new().parse(line)
    }

    #[test]
    fn test_content_delta() {
        assert_eq!(
            parse(r#"data: {"content":"Es "}"#),
            Some(StreamEvent::ContentDelta("Es ".to_string()))
        );
    }

    #[test]
    fn test_done_flag_completes() {
        assert_eq!(parse(r#"data: {"done":true}"#), Some(StreamEvent::Completed));
    }

    #[test]
    fn test_done_wins_over_content() {
        assert_eq!(
            parse(r#"data: {"content":"tail","done":true}"#),
            Some(StreamEvent::Completed)
        );
    }

    #[test]
    fn test_done_false_with_content_is_delta() {
        assert_eq!(
            parse(r#"data: {"content":"x","done":false}"#),
            Some(StreamEvent::ContentDelta("x".to_string()))
        );
    }

    #[test]
    fn test_empty_content_is_still_a_delta() {
        assert_eq!(
            parse(r#"data: {"content":""}"#),
            Some(StreamEvent::ContentDelta(String::new()))
        );
    }

    #[test]
    fn test_payload_without_fields_yields_nothing() {
        assert_eq!(parse("data: {}"), None);
        assert_eq!(parse(r#"data: {"content":null}"#), None);
        assert_eq!(parse(r#"data: {"done":false}"#), None);
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        assert_eq!(parse(""), None);
        assert_eq!(parse(": keep-alive"), None);
        assert_eq!(parse("event: message"), None);
        // The prefix includes the space.
        assert_eq!(parse(r#"data:{"content":"x"}"#), None);
    }

    #[test]
    fn test_undecodable_payload_is_malformed() {
        let line = r#"data: {"content":"unterminated"#;
        assert_eq!(parse(line), Some(StreamEvent::Malformed(line.to_string())));
        assert_eq!(
            parse("data: [DONE]"),
            Some(StreamEvent::Malformed("data: [DONE]".to_string()))
        );
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        assert!(matches!(
            parse(r#"data: {"content":42}"#),
            Some(StreamEvent::Malformed(_))
        ));
    }

    #[test]
    fn test_non_boolean_done_is_malformed() {
        assert!(matches!(
            parse(r#"data: {"done":1}"#),
            Some(StreamEvent::Malformed(_))
        ));
        assert!(matches!(
            parse(r#"data: {"done":"true"}"#),
            Some(StreamEvent::Malformed(_))
        ));
    }
}
