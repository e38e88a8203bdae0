//! Text-to-binary program conversion.
//!
//! Each text line is decoded and validated exactly as the simulator would load
//! it, then re-encoded as one 16-character binary word. Line `n` of the input
//! becomes line `n` of the output, so instruction addresses are preserved.

use simulator_core::{decode_text_line, encode_binary, EncodeError, Instruction, ValidationError};
use thiserror::Error;

/// Conversion failure for a single text line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    /// The line is not a valid text instruction.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The instruction is valid but has no binary form.
    #[error("line {line}: {source}")]
    Encode {
        /// 1-based source line.
        line: usize,
        /// Why it cannot be encoded.
        source: EncodeError,
    },
}

/// One converted instruction, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Program address.
    pub address: u64,
    /// Binary word written for it.
    pub word: String,
    /// Decoded instruction.
    pub instruction: Instruction,
}

/// Output of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleResult {
    /// Binary program text, one word per line with a trailing newline.
    pub binary: String,
    /// Per-instruction listing in address order.
    pub listing: Vec<ListingEntry>,
}

/// Converts a text program to the binary program format.
///
/// # Errors
///
/// Returns the first line that fails to decode, or whose instruction uses a
/// literal operand or a value above 15.
pub fn assemble(source: &str) -> Result<AssembleResult, AssembleError> {
    let mut binary = String::new();
    let mut listing = Vec::new();

    for ((idx, line), address) in source.trim_end().lines().enumerate().zip(0_u64..) {
        let line_number = idx + 1;
        let instruction = decode_text_line(line_number, line)?;
        let word = encode_binary(&instruction).map_err(|source| AssembleError::Encode {
            line: line_number,
            source,
        })?;

        binary.push_str(&word);
        binary.push('\n');
        listing.push(ListingEntry {
            address,
            word,
            instruction,
        });
    }

    tracing::debug!(instructions = listing.len(), "assembled program");
    Ok(AssembleResult { binary, listing })
}
