//! Feeds RESP bytes from stdin to a [`resp_next::Parser`] and prints each
//! decoded reply. Run with `RUST_LOG=trace` to see the parser's internal
//! frame push/pop tracing.
//!
//! ```sh
//! printf '+OK\r\n:42\r\n*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n' | cargo run --example quickstart
//! ```

use std::io::{self, Read};

use resp_next::{Outcome, Parser};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let mut parser = Parser::with_default_errors();
    let mut offset = 0;

    // Feed a handful of bytes at a time to exercise the chunked path even
    // when the whole input arrived in one read.
    const CHUNK_SIZE: usize = 16;
    loop {
        let end = (offset + CHUNK_SIZE).min(input.len());
        parser.feed(&input[offset..end]);
        offset = end;

        loop {
            match parser.get() {
                Ok(Outcome::Ready(value)) => println!("{value:#?}"),
                Ok(Outcome::NotReady) => break,
                Err(error) => {
                    eprintln!("protocol error: {error}");
                    return Ok(());
                }
            }
        }

        if offset == input.len() {
            break;
        }
    }

    Ok(())
}
