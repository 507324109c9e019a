use bytes::Bytes;

/// A single fully-decoded RESP reply.
///
/// Generic over `R`, the type produced for `-` (error) replies by the
/// caller-supplied reply-error constructor (see
/// [`Parser::new`](crate::Parser::new)).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<R> {
    /// `+<text>\r\n`
    SimpleString(Bytes),
    /// `-<text>\r\n`, wrapped by the caller's reply-error constructor.
    Error(R),
    /// `:<decimal>\r\n`
    Integer(i64),
    /// `$<len>\r\n<bytes>\r\n`, or `$-1\r\n` (`None`).
    BulkString(Option<BulkPayload>),
    /// `*<len>\r\n<element>*`, or `*-1\r\n` (`None`).
    Array(Option<Vec<Value<R>>>),
}

/// The payload of a non-null bulk string, after the text decoding policy
/// (see `set_encoding`) has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkPayload {
    /// Delivered as-is: no encoding was configured, or the bytes were not
    /// valid in the configured encoding (silent fallback).
    Raw(Bytes),
    /// Successfully decoded as text in the configured encoding.
    Text(String),
}

impl BulkPayload {
    /// Returns the payload as raw bytes regardless of which variant it is.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            BulkPayload::Raw(bytes) => bytes,
            BulkPayload::Text(text) => text.as_bytes(),
        }
    }
}
