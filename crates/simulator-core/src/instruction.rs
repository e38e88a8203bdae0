//! Canonical decoded instruction form shared by both decoders and the engine.

use std::fmt;

use crate::encoding::Opcode;

/// Prefix that marks a literal operand in the text format.
pub const LITERAL_SENTINEL: char = '#';

/// Source operand of a compare or arithmetic instruction.
///
/// Whether an operand is a literal or a register reference is decided once at
/// decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Operand {
    /// Data register index, read through the cache.
    Register(usize),
    /// Immediate value.
    Literal(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(index) => write!(f, "{index}"),
            Self::Literal(value) => write!(f, "{LITERAL_SENTINEL}{value}"),
        }
    }
}

/// Arithmetic operator shared by `ADD`, `SUB` and `MULT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mult,
}

impl ArithmeticOp {
    /// Applies the operator with two's-complement wrap-around.
    #[must_use]
    pub const fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mult => lhs.wrapping_mul(rhs),
        }
    }

    const fn opcode(self) -> Opcode {
        match self {
            Self::Add => Opcode::Add,
            Self::Sub => Opcode::Sub,
            Self::Mult => Opcode::Mult,
        }
    }
}

/// Comparison operator shared by `CMP` and `CNE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CompareOp {
    /// `CMP`: operands are equal.
    Equal,
    /// `CNE`: operands differ.
    NotEqual,
}

impl CompareOp {
    /// Evaluates the comparison.
    #[must_use]
    pub const fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Equal => lhs == rhs,
            Self::NotEqual => lhs != rhs,
        }
    }

    const fn opcode(self) -> Opcode {
        match self {
            Self::Equal => Opcode::Cmp,
            Self::NotEqual => Opcode::Cne,
        }
    }
}

/// A validated instruction ready for execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Instruction {
    /// No state change.
    Nop,
    /// Clears the run flag.
    Halt,
    /// Writes the comparison result to status register `dest`.
    Compare {
        /// Equality or inequality.
        op: CompareOp,
        /// First source operand.
        lhs: Operand,
        /// Second source operand.
        rhs: Operand,
        /// Destination status register.
        dest: usize,
    },
    /// Writes the arithmetic result to data register `dest`.
    Arithmetic {
        /// Operator to apply.
        op: ArithmeticOp,
        /// First source operand.
        lhs: Operand,
        /// Second source operand.
        rhs: Operand,
        /// Destination data register.
        dest: usize,
    },
    /// Copies memory at `address` into data register `dest`.
    Load {
        /// Memory address to read.
        address: u64,
        /// Destination data register.
        dest: usize,
    },
    /// Copies data register `source` into memory at `address`.
    Store {
        /// Source data register.
        source: usize,
        /// Memory address to write.
        address: u64,
    },
    /// Sets the program counter to `target`, optionally only when a status
    /// register is set.
    Jump {
        /// Program address to continue at.
        target: u64,
        /// Status register gating the jump; `None` jumps unconditionally.
        condition: Option<usize>,
    },
}

impl Instruction {
    /// Opcode this instruction was decoded from.
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::Nop => Opcode::Nop,
            Self::Halt => Opcode::Halt,
            Self::Compare { op, .. } => op.opcode(),
            Self::Arithmetic { op, .. } => op.opcode(),
            Self::Load { .. } => Opcode::Load,
            Self::Store { .. } => Opcode::Store,
            Self::Jump { .. } => Opcode::Jmp,
        }
    }
}

/// Renders the canonical text form, which the text decoder accepts back.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opcode = self.opcode();
        match self {
            Self::Nop | Self::Halt => write!(f, "{opcode}"),
            Self::Compare { lhs, rhs, dest, .. } | Self::Arithmetic { lhs, rhs, dest, .. } => {
                write!(f, "{opcode} {lhs} {rhs} {dest}")
            }
            Self::Load { address, dest } => write!(f, "{opcode} {address} {dest}"),
            Self::Store { source, address } => write!(f, "{opcode} {source} {address}"),
            Self::Jump {
                target,
                condition: None,
            } => write!(f, "{opcode} {target}"),
            Self::Jump {
                target,
                condition: Some(status),
            } => write!(f, "{opcode} {target} {status}"),
        }
    }
}
