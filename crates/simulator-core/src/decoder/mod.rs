//! Text and binary instruction decoders.
//!
//! The two decoders are independent pure functions over one source line. Both
//! converge on [`Instruction`](crate::Instruction) via the validator, so the
//! execution engine never knows which format a program was loaded from.

/// Fixed 16-bit binary word decoder and its inverse encoder.
pub mod binary;
/// Whitespace-delimited mnemonic decoder.
pub mod text;

pub use binary::{decode_binary_line, encode_binary, EncodeError, BINARY_WORD_LENGTH};
pub use text::decode_text_line;
