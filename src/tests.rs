//! Cross-module property tests (`spec.md` §8): chunk-independence,
//! idempotent suspension, buffer-shrink accounting, nesting depth, wire
//! order, and protocol-error isolation.

use bytes::Bytes;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    error::{ParseFailure, ProtocolError, ReplyError},
    Outcome, Parser, Value,
};

fn sample_stream() -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"+OK\r\n");
    buf.extend_from_slice(b":-123\r\n");
    buf.extend_from_slice(b"$6\r\nfoobar\r\n");
    buf.extend_from_slice(b"$-1\r\n");
    buf.extend_from_slice(b"*0\r\n");
    buf.extend_from_slice(b"*2\r\n*2\r\n:1\r\n:2\r\n*1\r\n+x\r\n");
    buf.extend_from_slice(b"-ERR wrong type\r\n");
    buf
}

fn collect_replies(chunks: &[&[u8]]) -> Vec<Value<ReplyError>> {
    let mut parser = Parser::with_default_errors();
    let mut values = Vec::new();
    for chunk in chunks {
        parser.feed(chunk);
        loop {
            match parser.get().expect("sample stream is well-formed") {
                Outcome::Ready(value) => values.push(value),
                Outcome::NotReady => break,
            }
        }
    }
    values
}

#[test]
fn chunk_independence() {
    let stream = sample_stream();
    let whole = collect_replies(&[&stream]);

    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..30 {
        let cut_count = rng.gen_range(1..8);
        let mut cuts: Vec<usize> = (0..cut_count)
            .map(|_| rng.gen_range(0..=stream.len()))
            .collect();
        cuts.sort_unstable();
        cuts.dedup();

        let mut chunks = Vec::new();
        let mut prev = 0;
        for &cut in &cuts {
            chunks.push(&stream[prev..cut]);
            prev = cut;
        }
        chunks.push(&stream[prev..]);

        let chunked = collect_replies(&chunks);
        assert_eq!(chunked, whole, "cuts were {cuts:?}");
    }
}

#[test]
fn idempotent_suspension_across_calls() {
    let mut parser = Parser::with_default_errors();
    parser.feed(b"*3\r\n:1\r\n:2\r\n");
    assert_eq!(parser.get().unwrap(), Outcome::NotReady);

    let buffer_before = parser.snapshot_buffer().to_vec();
    for _ in 0..3 {
        assert_eq!(parser.get().unwrap(), Outcome::NotReady);
        assert_eq!(parser.snapshot_buffer(), &buffer_before[..]);
    }
}

#[test]
fn buffer_shrink_matches_consumed_wire_bytes() {
    let mut stream = sample_stream();
    let partial_next = b"hello"; // 5 of the 10 bytes a `$10` payload needs
    stream.extend_from_slice(b"$10\r\n");
    stream.extend_from_slice(partial_next);

    let mut parser = Parser::with_default_errors();
    parser.feed(&stream);

    loop {
        match parser.get().unwrap() {
            Outcome::Ready(_) => {}
            Outcome::NotReady => break,
        }
    }

    // The `$10\r\n` header was consumed by the frame push; only the
    // not-yet-complete payload prefix remains undelivered.
    assert_eq!(parser.snapshot_buffer(), &partial_next[..]);
}

#[test]
fn deep_nesting_parses_without_recursion_limits() {
    const DEPTH: usize = 5_000;

    let mut stream = Vec::new();
    for _ in 0..DEPTH {
        stream.extend_from_slice(b"*1\r\n");
    }
    stream.extend_from_slice(b":42\r\n");

    let mut parser = Parser::with_default_errors();
    parser.feed(&stream);

    let mut value = match parser.get().unwrap() {
        Outcome::Ready(value) => value,
        Outcome::NotReady => panic!("expected a complete reply"),
    };

    let mut depth = 0;
    loop {
        match value {
            Value::Array(Some(mut items)) if items.len() == 1 => {
                depth += 1;
                value = items.pop().unwrap();
            }
            Value::Integer(42) => break,
            other => panic!("unexpected value at depth {depth}: {other:?}"),
        }
    }
    assert_eq!(depth, DEPTH);
}

#[test]
fn replies_are_produced_in_wire_order() {
    let mut parser = Parser::with_default_errors();
    parser.feed(b"+first\r\n:2\r\n$5\r\nthird\r\n");

    let mut values = Vec::new();
    loop {
        match parser.get().unwrap() {
            Outcome::Ready(value) => values.push(value),
            Outcome::NotReady => break,
        }
    }

    assert_eq!(
        values,
        vec![
            Value::SimpleString(Bytes::from_static(b"first")),
            Value::Integer(2),
            Value::BulkString(Some(crate::BulkPayload::Raw(Bytes::from_static(b"third")))),
        ]
    );
}

#[test]
fn protocol_error_resets_a_suspended_aggregate() {
    let mut parser = Parser::with_default_errors();
    parser.feed(b"*2\r\n:1\r\n");
    assert_eq!(parser.get().unwrap(), Outcome::NotReady);

    parser.feed(b"?bad\r\n");
    assert!(matches!(parser.get(), Err(ParseFailure::Protocol(_))));
    assert!(parser.snapshot_buffer().is_empty());

    // The stack's leftover array frame was discarded along with the
    // buffer: the next reply parses as if the parser were fresh.
    parser.feed(b"+OK\r\n");
    assert_eq!(
        parser.get().unwrap(),
        Outcome::Ready(Value::SimpleString(Bytes::from_static(b"OK")))
    );
}

#[test]
fn protocol_error_type_has_stable_display() {
    assert_eq!(ProtocolError.to_string(), "malformed RESP reply stream");
}
