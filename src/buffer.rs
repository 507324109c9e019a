use bytes::{Buf, Bytes, BytesMut};

/// Append-only sink for incoming bytes, offering the two framing reads the
/// RESP wire format needs: a CRLF-delimited line, and a length-prefixed
/// payload followed by a trailing CRLF.
///
/// Both reads are atomic with respect to the buffer: either they return a
/// result and advance past the consumed bytes, or they return `None`/an
/// error and leave the buffer untouched.
#[derive(Debug, Default)]
pub(crate) struct ByteBuffer {
    inner: BytesMut,
}

impl ByteBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) {
        self.inner.extend_from_slice(bytes);
    }

    /// Returns the bytes preceding the first CRLF, consuming them plus the
    /// CRLF itself. Returns `None`, without consuming anything, if no CRLF
    /// is present yet.
    pub(crate) fn read_line(&mut self) -> Option<Bytes> {
        let pos = self
            .inner
            .windows(2)
            .position(|window| window == b"\r\n")?;

        let line = self.inner.split_to(pos).freeze();
        self.inner.advance(2);
        Some(line)
    }

    /// Returns the first `n` bytes if at least `n + 2` bytes are buffered,
    /// consuming `n + 2` bytes (payload plus trailing CRLF). Returns
    /// `Ok(None)`, without consuming anything, if fewer than `n + 2` bytes
    /// are buffered. Returns `Err(())` if the two bytes after the payload
    /// are present but are not `\r\n`.
    pub(crate) fn read_exact(&mut self, n: usize) -> Result<Option<Bytes>, TrailingCrlfMismatch> {
        if self.inner.len() < n + 2 {
            return Ok(None);
        }

        if &self.inner[n..n + 2] != b"\r\n" {
            return Err(TrailingCrlfMismatch);
        }

        let payload = self.inner.split_to(n).freeze();
        self.inner.advance(2);
        Ok(Some(payload))
    }

    pub(crate) fn snapshot(&self) -> &[u8] {
        &self.inner
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}

/// The bytes following a bulk-string payload were not `\r\n`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct TrailingCrlfMismatch;
