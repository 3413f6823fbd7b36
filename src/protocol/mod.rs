//! Line-oriented record protocol
//!
//! Porcelain output is newline-delimited. Each line is independently either a JSON
//! object (a structured record) or plain text (a raw record). Decoding is total:
//! every line becomes exactly one [`Record`] and malformed JSON is simply raw.

mod record;

pub use record::{Document, Record, decode};
