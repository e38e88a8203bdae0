//! Sparse word-addressed memory shared by instructions and data.

use std::collections::BTreeMap;

use crate::program::{Program, ProgramWord};

/// Unbounded address space holding the loaded program and any data words
/// written by `STORE`. Addresses exist only once populated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    cells: BTreeMap<u64, ProgramWord>,
}

impl Memory {
    /// Creates an empty memory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Word at `address`, if populated.
    #[must_use]
    pub fn fetch(&self, address: u64) -> Option<ProgramWord> {
        self.cells.get(&address).copied()
    }

    /// Reads a data value.
    ///
    /// Unpopulated addresses and instruction words read as zero.
    #[must_use]
    pub fn read(&self, address: u64) -> i64 {
        match self.cells.get(&address) {
            Some(ProgramWord::Data(value)) => *value,
            Some(ProgramWord::Instruction(_)) | None => 0,
        }
    }

    /// Writes a data word, replacing whatever the address held.
    pub fn write(&mut self, address: u64, value: i64) {
        let _ = self.cells.insert(address, ProgramWord::Data(value));
    }

    /// Number of populated addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` when no address is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Populated cells in ascending address order.
    #[must_use]
    pub const fn cells(&self) -> &BTreeMap<u64, ProgramWord> {
        &self.cells
    }
}

impl From<Program> for Memory {
    fn from(program: Program) -> Self {
        Self {
            cells: program.into_words(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Memory;
    use crate::instruction::Instruction;
    use crate::program::{Program, ProgramWord};

    #[test]
    fn unwritten_addresses_read_as_zero_and_stay_absent() {
        let memory = Memory::new();
        assert_eq!(memory.read(0), 0);
        assert_eq!(memory.read(u64::MAX), 0);
        assert_eq!(memory.fetch(0), None);
        assert!(memory.is_empty());
    }

    #[test]
    fn writes_populate_only_the_target_address() {
        let mut memory = Memory::new();
        memory.write(1_000_000, -7);
        memory.write(3, 9);
        memory.write(3, 11);

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.read(1_000_000), -7);
        assert_eq!(memory.read(3), 11);
        assert_eq!(
            memory.cells().keys().copied().collect::<Vec<_>>(),
            vec![3, 1_000_000]
        );
    }

    #[test]
    fn program_words_share_the_data_address_space() {
        let mut memory = Memory::from(Program::from_text("NOP\nHALT").expect("valid program"));
        assert_eq!(memory.fetch(1), Some(ProgramWord::Instruction(Instruction::Halt)));
        assert_eq!(memory.read(1), 0, "instructions read as zero");

        memory.write(1, 42);
        assert_eq!(memory.fetch(1), Some(ProgramWord::Data(42)));
        assert_eq!(memory.read(1), 42);
        assert_eq!(memory.fetch(0), Some(ProgramWord::Instruction(Instruction::Nop)));
    }
}
