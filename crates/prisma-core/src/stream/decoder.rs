//! Line framing for the `/chat/stream` body.
//!
//! The body arrives in arbitrarily sized chunks that do not respect line
//! boundaries. A chunk may be:
//! - a complete line: `data: {"content":"Hi"}\n`
//! - a partial line: `data: {"cont` (the rest comes in a later chunk)
//! - several lines: `data: {...}\n\ndata: {...}\n`
//!
//! [`FrameDecoder`] buffers the unterminated tail and emits every complete
//! line exactly once, in arrival order.

/// Splits a chunked text stream into complete, newline-terminated lines.
///
/// One instance per active stream. The pending buffer never contains a
/// line break.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and collect the lines it completes.
    ///
    /// Lines are returned without their terminator. A trailing `\r` is
    /// stripped so CRLF-framed streams decode the same as LF-framed ones.
    /// Empty lines are returned as empty strings.
    pub fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);

        // Only the new chunk can contain a break; the buffer had none.
        if !chunk.contains('\n') {
            return Vec::new();
        }

        let Some(last_break) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        // Keep the unterminated tail, take everything up to the last break.
        let tail = self.buffer.split_off(last_break + 1);
        let complete = std::mem::replace(&mut self.buffer, tail);

        complete[..last_break]
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect()
    }

    /// The unterminated fragment buffered so far.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// End the stream, returning any fragment that never got a terminator.
    ///
    /// The fragment cannot be a complete event; callers drop it.
    pub fn finish(self) -> Option<String> {
        (!self.buffer.is_empty()).then_some(self.buffer)
    }
}
