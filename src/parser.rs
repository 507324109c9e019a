use bytes::Bytes;
use tracing::trace;

use crate::{
    buffer::{ByteBuffer, TrailingCrlfMismatch},
    encoding,
    error::{ParseFailure, ProtocolError, ReplyError},
    frame::Frame,
    value::Value,
};

/// Result of a [`Parser::get`] call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<R> {
    /// A fully-decoded reply. The buffer has been advanced past all bytes
    /// it consumed.
    Ready(Value<R>),
    /// No complete reply is available yet. Feed more bytes and call
    /// `get()` again. Calling `get()` again with no intervening `feed`
    /// returns `NotReady` again and does not mutate the parser.
    NotReady,
}

/// Incremental, non-blocking parser for a RESP reply stream.
///
/// A `Parser` owns an append-only byte buffer and a stack of in-progress
/// aggregate decodes (see the `buffer`/`frame` modules). It performs no
/// I/O itself: the caller feeds it bytes as they arrive from the
/// transport and drains replies by calling [`get`](Parser::get) in a loop
/// until it returns [`Outcome::NotReady`].
///
/// `P` and `R` are, respectively, the type produced for protocol errors
/// and the type produced for `-` (error) replies. They stand in for the
/// two exception-object constructors a host language would inject across
/// an FFI boundary; here they are ordinary closures supplied at
/// construction. Callers who don't need custom error types can use
/// [`Parser::with_default_errors`].
pub struct Parser<P, R> {
    buffer: ByteBuffer,
    stack: Vec<Frame<R>>,
    encoding: Option<String>,
    // Set when a bulk-string payload was decoded under an encoding label
    // that failed to resolve. Surfaced (and cleared) at the next
    // completed top-level reply. Only the first such failure within a
    // reply is retained.
    pending_decode_error: Option<String>,
    make_protocol_error: Box<dyn Fn() -> P>,
    make_reply_error: Box<dyn Fn(&[u8]) -> R>,
}

impl<P, R> std::fmt::Debug for Parser<P, R>
where
    R: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("buffer", &self.buffer)
            .field("stack", &self.stack)
            .field("encoding", &self.encoding)
            .field("pending_decode_error", &self.pending_decode_error)
            .finish_non_exhaustive()
    }
}

impl<P, R> Parser<P, R> {
    /// Constructs a parser with the given protocol-error and reply-error
    /// constructors.
    ///
    /// `make_protocol_error` is called with no arguments whenever a
    /// protocol violation is detected. `make_reply_error` is called with
    /// the bytes between `-` and the terminating CRLF of an error reply.
    pub fn new(
        make_protocol_error: impl Fn() -> P + 'static,
        make_reply_error: impl Fn(&[u8]) -> R + 'static,
    ) -> Self {
        Self {
            buffer: ByteBuffer::new(),
            stack: Vec::new(),
            encoding: None,
            pending_decode_error: None,
            make_protocol_error: Box::new(make_protocol_error),
            make_reply_error: Box::new(make_reply_error),
        }
    }

    /// Appends a chunk of bytes received from the transport. Never parses,
    /// never fails; the caller's backpressure policy, if any, is external
    /// to this type.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.append(bytes);
    }

    /// Configures how bulk-string payloads are delivered. An empty label
    /// means "raw bytes"; any other label means "decode as text in that
    /// encoding" (see the `encoding` module for the exact policy). Never
    /// fails.
    pub fn set_encoding(&mut self, label: &str) {
        self.encoding = if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        };
    }

    /// Returns the bytes currently buffered but not yet delivered as part
    /// of a reply. Diagnostic only.
    pub fn snapshot_buffer(&self) -> &[u8] {
        self.buffer.snapshot()
    }
}

impl<P, R> Parser<P, R>
where
    P: std::error::Error + 'static,
{
    /// Attempts to decode the next reply from the buffered bytes.
    ///
    /// Returns at most one reply per call. Loop calling `get()` until it
    /// returns [`Outcome::NotReady`] to fully drain a `feed()`.
    pub fn get(&mut self) -> Result<Outcome<R>, ParseFailure<P>> {
        self.drive()
    }

    // The explicit, non-recursive driver loop: pop the top frame, try to
    // advance it, and feed its completed value to whichever frame is now
    // on top (or to the caller, if the stack is empty). This bounds
    // native call-stack usage independent of array nesting depth.
    fn drive(&mut self) -> Result<Outcome<R>, ParseFailure<P>> {
        let mut pending: Option<Value<R>> = None;

        loop {
            match self.stack.pop() {
                Some(frame) => match self.advance_frame(frame, pending.take())? {
                    FrameStep::Blocked(frame) => {
                        self.stack.push(frame);
                        return Ok(Outcome::NotReady);
                    }
                    FrameStep::NeedsChild(frame) => {
                        self.stack.push(frame);
                        match self.read_header()? {
                            None => return Ok(Outcome::NotReady),
                            Some(HeaderOutcome::Value(value)) => pending = Some(value),
                            Some(HeaderOutcome::Pushed(child)) => self.stack.push(child),
                        }
                    }
                    FrameStep::Done(value) => pending = Some(value),
                },
                None => match pending.take() {
                    Some(value) => return self.finish_top_level(value),
                    None => match self.read_header()? {
                        None => return Ok(Outcome::NotReady),
                        Some(HeaderOutcome::Value(value)) => pending = Some(value),
                        Some(HeaderOutcome::Pushed(frame)) => self.stack.push(frame),
                    },
                },
            }
        }
    }

    // Reads one line from the buffer and dispatches on its type byte.
    // Returns `None` if no full line is buffered yet.
    fn read_header(&mut self) -> Result<Option<HeaderOutcome<R>>, ParseFailure<P>> {
        let Some(line) = self.buffer.read_line() else {
            return Ok(None);
        };

        if line.is_empty() {
            return Err(self.fail_protocol());
        }

        let marker = line[0];
        let rest = line.slice(1..);

        let outcome = match marker {
            b'+' => HeaderOutcome::Value(Value::SimpleString(rest)),
            b'-' => {
                let error = (self.make_reply_error)(&rest);
                HeaderOutcome::Value(Value::Error(error))
            }
            b':' => match parse_i64(&rest) {
                Some(n) => HeaderOutcome::Value(Value::Integer(n)),
                None => return Err(self.fail_protocol()),
            },
            b'$' => match parse_i64(&rest) {
                Some(-1) => HeaderOutcome::Value(Value::BulkString(None)),
                Some(len) if len >= 0 => {
                    trace!(len, "pushing bulk frame");
                    HeaderOutcome::Pushed(Frame::Bulk {
                        expected_len: len as usize,
                    })
                }
                _ => return Err(self.fail_protocol()),
            },
            b'*' => match parse_i64(&rest) {
                Some(-1) => HeaderOutcome::Value(Value::Array(None)),
                Some(0) => HeaderOutcome::Value(Value::Array(Some(Vec::new()))),
                Some(len) if len > 0 => {
                    trace!(len, "pushing array frame");
                    HeaderOutcome::Pushed(Frame::Array {
                        remaining: len,
                        accumulator: Vec::with_capacity(len as usize),
                    })
                }
                _ => return Err(self.fail_protocol()),
            },
            _ => return Err(self.fail_protocol()),
        };

        Ok(Some(outcome))
    }

    fn advance_frame(
        &mut self,
        frame: Frame<R>,
        pending_child: Option<Value<R>>,
    ) -> Result<FrameStep<R>, ParseFailure<P>> {
        match frame {
            Frame::Bulk { expected_len } => match self.buffer.read_exact(expected_len) {
                Ok(None) => Ok(FrameStep::Blocked(Frame::Bulk { expected_len })),
                Ok(Some(bytes)) => Ok(FrameStep::Done(self.make_bulk_value(bytes))),
                Err(TrailingCrlfMismatch) => Err(self.fail_protocol()),
            },
            Frame::Array {
                mut remaining,
                mut accumulator,
            } => {
                if let Some(child) = pending_child {
                    accumulator.push(child);
                    remaining -= 1;
                }

                if remaining == 0 {
                    Ok(FrameStep::Done(Value::Array(Some(accumulator))))
                } else {
                    Ok(FrameStep::NeedsChild(Frame::Array {
                        remaining,
                        accumulator,
                    }))
                }
            }
        }
    }

    fn make_bulk_value(&mut self, bytes: Bytes) -> Value<R> {
        match encoding::decode_bulk(self.encoding.as_deref(), bytes) {
            Ok(payload) => Value::BulkString(Some(payload)),
            Err(()) => {
                if self.pending_decode_error.is_none() {
                    trace!(label = ?self.encoding, "deferring unknown-encoding error");
                    self.pending_decode_error = self.encoding.clone();
                }
                Value::BulkString(None)
            }
        }
    }

    fn finish_top_level(&mut self, value: Value<R>) -> Result<Outcome<R>, ParseFailure<P>> {
        if let Some(label) = self.pending_decode_error.take() {
            return Err(ParseFailure::UnknownEncoding { label });
        }
        Ok(Outcome::Ready(value))
    }

    fn fail_protocol(&mut self) -> ParseFailure<P> {
        trace!("protocol error: clearing buffer and stack");
        self.buffer.clear();
        self.stack.clear();
        self.pending_decode_error = None;
        ParseFailure::Protocol((self.make_protocol_error)())
    }
}

impl Parser<ProtocolError, ReplyError> {
    /// Constructs a parser using the crate's built-in error types, for
    /// callers that don't need to plug in their own.
    pub fn with_default_errors() -> Self {
        Self::new(|| ProtocolError, ReplyError::from_bytes)
    }
}

impl Default for Parser<ProtocolError, ReplyError> {
    fn default() -> Self {
        Self::with_default_errors()
    }
}

enum HeaderOutcome<R> {
    Value(Value<R>),
    Pushed(Frame<R>),
}

enum FrameStep<R> {
    Blocked(Frame<R>),
    NeedsChild(Frame<R>),
    Done(Value<R>),
}

fn parse_i64(bytes: &[u8]) -> Option<i64> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}
