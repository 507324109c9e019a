//! Text decoding policy for bulk-string payloads (`spec.md` §4.4).
//!
//! Simple strings, errors, and header-derived values are always raw
//! bytes; only bulk-string payloads are subject to the configured
//! encoding. Two failure modes are distinguished:
//!
//! - The encoding *label* does not resolve to a known encoding: the
//!   payload is replaced with `Null` and the error is deferred until the
//!   enclosing top-level reply completes.
//! - The label resolves, but the bytes are not valid in that encoding:
//!   the parser falls back to raw bytes for that one payload, silently.

use bytes::Bytes;
use encoding_rs::Encoding;

use crate::value::BulkPayload;

/// Decodes one bulk-string payload under the given encoding label (`None`
/// meaning "deliver raw bytes").
///
/// Returns `Ok(payload)` on success (including the "deliver raw" and
/// "silent fallback" cases). Returns `Err(())` when the label itself
/// could not be resolved to a known encoding — the caller is responsible
/// for turning that into a deferred error and substituting `Null`.
pub(crate) fn decode_bulk(label: Option<&str>, bytes: Bytes) -> Result<BulkPayload, ()> {
    let Some(label) = label else {
        return Ok(BulkPayload::Raw(bytes));
    };

    let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
        return Err(());
    };

    let (text, _, had_errors) = encoding.decode(&bytes);
    if had_errors {
        Ok(BulkPayload::Raw(bytes))
    } else {
        Ok(BulkPayload::Text(text.into_owned()))
    }
}
