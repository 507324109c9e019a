#![forbid(unsafe_code)]

//! A thin, sans-I/O, incremental parser for the RESP (REdis Serialization
//! Protocol) reply stream.
//!
//! [`Parser`] accepts arbitrary byte chunks from a transport via
//! [`Parser::feed`], and emits fully-decoded [`Value`]s one at a time via
//! [`Parser::get`] as the stream delivers enough bytes to complete them.
//! When a reply is not yet complete, the parser preserves all partial
//! state (buffered bytes, and any in-progress aggregate decodes) so that a
//! later `feed` resumes decoding exactly where it left off.
//!
//! The parser never touches a socket, never blocks, and never spawns a
//! task: it is purely data-driven. Driving a real connection — reading
//! from a socket, calling `feed`, draining `get()` in a loop, handling
//! pipelining — is the caller's concern.
//!
//! ```
//! use resp_next::{Outcome, Parser, Value};
//!
//! let mut parser = Parser::with_default_errors();
//! parser.feed(b"+OK\r\n");
//! assert_eq!(
//!     parser.get().unwrap(),
//!     Outcome::Ready(Value::SimpleString("OK".into()))
//! );
//! ```

mod buffer;
mod encoding;
pub mod error;
mod frame;
mod parser;
#[cfg(test)]
mod tests;
pub mod value;

pub use error::ParseFailure;
pub use parser::{Outcome, Parser};
pub use value::{BulkPayload, Value};
