use bytes::Bytes;
use thiserror::Error;

/// Everything a [`Parser::get`](crate::Parser::get) call can fail
/// with.
///
/// A protocol error (taxonomy item 2: unrecoverable, the buffer and stack
/// are cleared) is distinct from a deferred encoding-lookup error
/// (taxonomy item 4: the configured text encoding could not be resolved,
/// and the error only surfaces once the reply it occurred in reaches its
/// top-level boundary).
#[derive(Debug, Error)]
pub enum ParseFailure<P>
where
    P: std::error::Error + 'static,
{
    /// The input did not conform to RESP framing. The stream is
    /// unrecoverable; the caller must resynchronize (typically by
    /// reconnecting).
    #[error(transparent)]
    Protocol(P),
    /// A bulk-string payload was decoded under a text encoding that could
    /// not be resolved by name. The parser already delivered `Null` in
    /// place of that payload; this error surfaces once, at the next
    /// completed top-level reply.
    #[error("unknown text encoding: {label:?}")]
    UnknownEncoding {
        /// The encoding label passed to `set_encoding` that could not be
        /// resolved.
        label: String,
    },
}

/// Default protocol-error type, used by
/// [`Parser::with_default_errors`](crate::Parser::with_default_errors).
///
/// Stands in for the "protocol-error constructor" a host language would
/// inject; since this crate has no host, it is a concrete unit error type
/// instead.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Default)]
#[error("malformed RESP reply stream")]
pub struct ProtocolError;

/// Default reply-error type, used by
/// [`Parser::with_default_errors`](crate::Parser::with_default_errors).
///
/// Wraps the raw bytes of a `-` reply, the same payload a host's
/// reply-error constructor would have received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", String::from_utf8_lossy(.message))]
pub struct ReplyError {
    /// The bytes between `-` and the terminating CRLF.
    pub message: Bytes,
}

impl ReplyError {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            message: Bytes::copy_from_slice(bytes),
        }
    }
}
