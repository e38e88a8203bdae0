//! Opcode set, mnemonic table and binary opcode table.

use std::fmt;

/// Operations understood by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum Opcode {
    Nop,
    Halt,
    Cmp,
    Cne,
    Jmp,
    Load,
    Store,
    Add,
    Sub,
    Mult,
}

/// Canonical text mnemonic for every opcode.
pub const MNEMONIC_TABLE: &[(Opcode, &str)] = &[
    (Opcode::Nop, "NOP"),
    (Opcode::Halt, "HALT"),
    (Opcode::Cmp, "CMP"),
    (Opcode::Cne, "CNE"),
    (Opcode::Jmp, "JMP"),
    (Opcode::Load, "LOAD"),
    (Opcode::Store, "STORE"),
    (Opcode::Add, "ADD"),
    (Opcode::Sub, "SUB"),
    (Opcode::Mult, "MULT"),
];

impl Opcode {
    /// Every opcode in table order.
    pub const ALL: [Self; 10] = [
        Self::Nop,
        Self::Halt,
        Self::Cmp,
        Self::Cne,
        Self::Jmp,
        Self::Load,
        Self::Store,
        Self::Add,
        Self::Sub,
        Self::Mult,
    ];

    /// Resolves an exact (case-sensitive) mnemonic.
    #[must_use]
    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        MNEMONIC_TABLE
            .iter()
            .find_map(|(opcode, name)| (*name == mnemonic).then_some(*opcode))
    }

    /// Returns the canonical mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Halt => "HALT",
            Self::Cmp => "CMP",
            Self::Cne => "CNE",
            Self::Jmp => "JMP",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mult => "MULT",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Opcodes as they appear in the 4-bit opcode field of a binary word.
///
/// The two jump forms are kept apart here so the decoder knows how many
/// operand fields to keep; both normalise to [`Opcode::Jmp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BinaryOpcode {
    Nop,
    Halt,
    Cmp,
    Cne,
    JmpConditional,
    JmpUnconditional,
    Load,
    Store,
    Add,
    Sub,
    Mult,
}

/// Binary opcode nibble assignments.
pub const BINARY_OPCODE_TABLE: &[(u8, BinaryOpcode)] = &[
    (0b0000, BinaryOpcode::Nop),
    (0b0001, BinaryOpcode::Halt),
    (0b0010, BinaryOpcode::Cmp),
    (0b0011, BinaryOpcode::Cne),
    (0b0100, BinaryOpcode::JmpConditional),
    (0b0101, BinaryOpcode::JmpUnconditional),
    (0b0110, BinaryOpcode::Load),
    (0b0111, BinaryOpcode::Store),
    (0b1000, BinaryOpcode::Add),
    (0b1001, BinaryOpcode::Sub),
    (0b1010, BinaryOpcode::Mult),
];

impl BinaryOpcode {
    /// Looks up a 4-bit opcode nibble.
    #[must_use]
    pub fn from_nibble(nibble: u8) -> Option<Self> {
        BINARY_OPCODE_TABLE
            .iter()
            .find_map(|(bits, opcode)| (*bits == nibble).then_some(*opcode))
    }

    /// Returns the nibble assigned to this binary opcode.
    #[must_use]
    pub const fn nibble(self) -> u8 {
        match self {
            Self::Nop => 0b0000,
            Self::Halt => 0b0001,
            Self::Cmp => 0b0010,
            Self::Cne => 0b0011,
            Self::JmpConditional => 0b0100,
            Self::JmpUnconditional => 0b0101,
            Self::Load => 0b0110,
            Self::Store => 0b0111,
            Self::Add => 0b1000,
            Self::Sub => 0b1001,
            Self::Mult => 0b1010,
        }
    }

    /// Number of operand fields this opcode consumes; the rest are discarded.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Nop | Self::Halt => 0,
            Self::JmpUnconditional => 1,
            Self::JmpConditional | Self::Load | Self::Store => 2,
            Self::Cmp | Self::Cne | Self::Add | Self::Sub | Self::Mult => 3,
        }
    }

    /// Normalised opcode shared with the text decoder.
    #[must_use]
    pub const fn opcode(self) -> Opcode {
        match self {
            Self::Nop => Opcode::Nop,
            Self::Halt => Opcode::Halt,
            Self::Cmp => Opcode::Cmp,
            Self::Cne => Opcode::Cne,
            Self::JmpConditional | Self::JmpUnconditional => Opcode::Jmp,
            Self::Load => Opcode::Load,
            Self::Store => Opcode::Store,
            Self::Add => Opcode::Add,
            Self::Sub => Opcode::Sub,
            Self::Mult => Opcode::Mult,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{BinaryOpcode, Opcode, BINARY_OPCODE_TABLE, MNEMONIC_TABLE};

    #[test]
    fn mnemonic_table_covers_every_opcode_once() {
        let names: HashSet<_> = MNEMONIC_TABLE.iter().map(|(_, name)| *name).collect();
        assert_eq!(names.len(), Opcode::ALL.len());

        for opcode in Opcode::ALL {
            assert_eq!(Opcode::from_mnemonic(opcode.mnemonic()), Some(opcode));
        }
    }

    #[test]
    fn mnemonics_are_case_sensitive() {
        assert_eq!(Opcode::from_mnemonic("add"), None);
        assert_eq!(Opcode::from_mnemonic("JUMP"), None);
    }

    #[test]
    fn binary_table_nibbles_are_unique_and_self_consistent() {
        let nibbles: HashSet<_> = BINARY_OPCODE_TABLE.iter().map(|(bits, _)| *bits).collect();
        assert_eq!(nibbles.len(), BINARY_OPCODE_TABLE.len());

        for (bits, opcode) in BINARY_OPCODE_TABLE {
            assert_eq!(opcode.nibble(), *bits);
            assert_eq!(BinaryOpcode::from_nibble(*bits), Some(*opcode));
        }
    }

    #[test]
    fn unassigned_nibbles_are_rejected() {
        for nibble in 0b1011_u8..=0b1111 {
            assert!(BinaryOpcode::from_nibble(nibble).is_none());
        }
    }

    #[test]
    fn both_jump_forms_normalise_to_jmp() {
        assert_eq!(BinaryOpcode::JmpConditional.opcode(), Opcode::Jmp);
        assert_eq!(BinaryOpcode::JmpUnconditional.opcode(), Opcode::Jmp);
        assert_eq!(BinaryOpcode::JmpConditional.arity(), 2);
        assert_eq!(BinaryOpcode::JmpUnconditional.arity(), 1);
    }
}
