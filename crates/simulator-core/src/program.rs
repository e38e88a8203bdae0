//! Program image: instruction address to validated instruction.

use std::collections::BTreeMap;

use crate::decoder::{decode_binary_line, decode_text_line};
use crate::errors::ValidationError;
use crate::instruction::Instruction;

/// Source format of a program; chosen by the loader, never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ProgramFormat {
    /// One mnemonic instruction per line.
    #[default]
    Text,
    /// One 16-character binary word per line.
    Binary,
}

/// Content of one program address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ProgramWord {
    /// Executable instruction.
    Instruction(Instruction),
    /// Raw data word; fetching it is a no-op cycle.
    Data(i64),
}

/// Address-ordered program image.
///
/// Every stored instruction has passed validation; a program that fails to
/// decode on any line is never constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    words: BTreeMap<u64, ProgramWord>,
}

impl Program {
    /// Creates an empty program.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: BTreeMap::new(),
        }
    }

    /// Places already-decoded instructions at consecutive addresses from 0.
    #[must_use]
    pub fn from_instructions(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        Self {
            words: (0_u64..)
                .zip(instructions)
                .map(|(address, instruction)| (address, ProgramWord::Instruction(instruction)))
                .collect(),
        }
    }

    /// Decodes a mnemonic program, one instruction per line.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`]; no partial program is produced.
    pub fn from_text(source: &str) -> Result<Self, ValidationError> {
        Self::parse(source, ProgramFormat::Text)
    }

    /// Decodes a binary program, one 16-character word per line.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`]; no partial program is produced.
    pub fn from_binary(source: &str) -> Result<Self, ValidationError> {
        Self::parse(source, ProgramFormat::Binary)
    }

    /// Decodes `source` with the decoder for `format`.
    ///
    /// Line `n` (1-based) lands at address `n - 1`. Trailing blank lines are
    /// ignored; blank lines inside the program are rejected.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`]; no partial program is produced.
    pub fn parse(source: &str, format: ProgramFormat) -> Result<Self, ValidationError> {
        let decode: fn(usize, &str) -> Result<Instruction, ValidationError> = match format {
            ProgramFormat::Text => decode_text_line,
            ProgramFormat::Binary => decode_binary_line,
        };

        let instructions = source
            .trim_end()
            .lines()
            .enumerate()
            .map(|(idx, line)| decode(idx + 1, line))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(?format, instructions = instructions.len(), "decoded program");
        Ok(Self::from_instructions(instructions))
    }

    /// Places an inert data word at `address`, returning what it replaced.
    pub fn insert_data(&mut self, address: u64, value: i64) -> Option<ProgramWord> {
        self.words.insert(address, ProgramWord::Data(value))
    }

    /// Places an instruction at `address`, returning what it replaced.
    pub fn insert_instruction(
        &mut self,
        address: u64,
        instruction: Instruction,
    ) -> Option<ProgramWord> {
        self.words
            .insert(address, ProgramWord::Instruction(instruction))
    }

    /// Word stored at `address`, if any.
    #[must_use]
    pub fn get(&self, address: u64) -> Option<&ProgramWord> {
        self.words.get(&address)
    }

    /// Number of populated addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when no address is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Populated addresses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &ProgramWord)> + '_ {
        self.words.iter().map(|(address, word)| (*address, word))
    }

    pub(crate) fn into_words(self) -> BTreeMap<u64, ProgramWord> {
        self.words
    }
}
