//! Pull-based reader over a streamed HTTP response body.
//!
//! Network chunks split UTF-8 sequences arbitrarily (`¿` is two bytes and
//! may straddle a chunk boundary), so incomplete trailing bytes are carried
//! into the next chunk instead of being decoded lossily.

use prisma_core::chat::transport::ChunkSource;
use prisma_types::error::ChatError;
use tracing::debug;

use super::client::connection_error;

/// Incremental UTF-8 decoder that carries incomplete sequences forward.
#[derive(Debug, Default)]
pub(crate) struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    /// Decode as much of `pending + bytes` as forms complete characters.
    ///
    /// Invalid sequences become U+FFFD; an incomplete sequence at the end
    /// is kept for the next call.
    pub(crate) fn decode(&mut self, bytes: &[u8]) -> String {
        let mut buf = std::mem::take(&mut self.pending);
        buf.extend_from_slice(bytes);

        let mut out = String::with_capacity(buf.len());
        let mut input = buf.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, rest) = input.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &rest[len..];
                        }
                        None => {
                            self.pending = rest.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Bytes still waiting for the rest of their character.
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// [`ChunkSource`] over a live `reqwest::Response`.
#[derive(Debug)]
pub struct HttpChunkSource {
    response: reqwest::Response,
    utf8: Utf8Carry,
}

impl HttpChunkSource {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            utf8: Utf8Carry::default(),
        }
    }
}

impl ChunkSource for HttpChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<String>, ChatError> {
        loop {
            let Some(bytes) = self.response.chunk().await.map_err(connection_error)? else {
                if self.utf8.pending_len() > 0 {
                    debug!(
                        bytes = self.utf8.pending_len(),
                        "body ended inside a UTF-8 sequence"
                    );
                }
                return Ok(None);
            };

            let text = self.utf8.decode(&bytes);
            // A chunk holding only part of a character yields no text yet.
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        let mut carry = Utf8Carry::default();
        assert_eq!(carry.decode(b"data: hi\n"), "data: hi\n");
        assert_eq!(carry.pending_len(), 0);
    }

    #[test]
    fn test_split_multibyte_sequence_is_carried() {
        let text = "¿Qué?";
        let bytes = text.as_bytes();
        let mut carry = Utf8Carry::default();

        // Cut inside the two-byte '¿'.
        let first = carry.decode(&bytes[..1]);
        assert_eq!(first, "");
        assert_eq!(carry.pending_len(), 1);

        let second = carry.decode(&bytes[1..4]);
        let third = carry.decode(&bytes[4..]);
        assert_eq!(format!("{first}{second}{third}"), text);
        assert_eq!(carry.pending_len(), 0);
    }

    #[test]
    fn test_every_byte_split_roundtrips() {
        let text = "data: {\"content\":\"Año académico ñandú\"}\n";
        let bytes = text.as_bytes();
        for cut in 0..=bytes.len() {
            let mut carry = Utf8Carry::default();
            let mut out = carry.decode(&bytes[..cut]);
            out.push_str(&carry.decode(&bytes[cut..]));
            assert_eq!(out, text, "cut at {cut}");
        }
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let mut carry = Utf8Carry::default();
        assert_eq!(carry.decode(b"a\xFFb"), "a\u{FFFD}b");
        assert_eq!(carry.pending_len(), 0);
    }
}
