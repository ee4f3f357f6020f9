use crate::types::error::Result;

/// Text transport that turns raw byte buffers into printable container lines and back.
///
/// The container's own encoding lives outside this crate; serialization only
/// depends on this capability.
pub trait LineEncoder {
    /// Encodes one binary section into wrapped text lines.
    fn encode_bytes_to_lines(&self, bytes: &[u8]) -> Vec<String>;

    /// Inverse of [`LineEncoder::encode_bytes_to_lines`].
    fn decode_lines_to_bytes(&self, lines: &[String]) -> Result<Vec<u8>>;

    /// Encodes a single row field without wrapping.
    fn encode_field(&self, bytes: &[u8]) -> String;

    /// Wraps an already-encoded row (fields joined with `,`) into lines.
    fn format_encoded(&self, encoded: &str) -> Vec<String>;
}
