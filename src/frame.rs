use crate::value::Value;

/// In-progress decoding state for one aggregate reply. The stack
/// (`Vec<Frame<R>>` in [`Parser`](crate::Parser)) holds one of
/// these per nested aggregate currently being filled; the top of the
/// stack is the innermost one.
///
/// A Null bulk string or Null array (declared length -1) never produces a
/// frame — it resolves to a `Value` directly while reading the header.
#[derive(Debug)]
pub(crate) enum Frame<R> {
    /// Awaiting the payload of a `$<len>\r\n` bulk string. `expected_len`
    /// is never -1 (see above).
    Bulk { expected_len: usize },
    /// Awaiting `remaining` more elements of a `*<len>\r\n` array.
    /// `accumulator` holds the elements already decoded, in order.
    Array {
        remaining: i64,
        accumulator: Vec<Value<R>>,
    },
}
