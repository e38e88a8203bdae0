//! Error taxonomy for program loading and execution.
//!
//! Every error is fail-fast: a [`ValidationError`] or [`RangeError`] aborts the
//! whole load, and an [`OperationError`] aborts the run that raised it.

use thiserror::Error;

use crate::encoding::Opcode;

/// Reason a program line was rejected by a decoder or the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    /// Line holds no tokens.
    #[error("empty line")]
    EmptyLine,
    /// First token is not a recognised mnemonic.
    #[error("unknown mnemonic `{0}`")]
    UnknownMnemonic(String),
    /// Wrong operand count for the opcode.
    #[error("{opcode} expects {expected} operand(s), found {found}")]
    Arity {
        /// Opcode being validated.
        opcode: Opcode,
        /// Accepted operand count(s), rendered for humans.
        expected: &'static str,
        /// Operand count present on the line.
        found: usize,
    },
    /// Operand token is neither an integer nor a `#`-prefixed literal.
    #[error("operand {position} `{token}` is not an integer or literal")]
    MalformedOperand {
        /// 1-based operand position.
        position: usize,
        /// Offending token.
        token: String,
    },
    /// A literal appeared where only a bare index is accepted.
    #[error("operand {position} of {opcode} must be a bare integer, found literal")]
    LiteralNotAllowed {
        /// Opcode being validated.
        opcode: Opcode,
        /// 1-based operand position.
        position: usize,
    },
    /// Register index, address or jump target below zero.
    #[error("operand {position} of {opcode} must be non-negative, found {value}")]
    NegativeIndex {
        /// Opcode being validated.
        opcode: Opcode,
        /// 1-based operand position.
        position: usize,
        /// Offending value.
        value: i64,
    },
    /// Binary line is not exactly 16 characters.
    #[error("binary instruction must be 16 characters, found {0}")]
    BinaryLength(usize),
    /// A 4-bit field contains characters other than `0` and `1`.
    #[error("{field} field `{bits}` is not valid binary")]
    InvalidBinaryField {
        /// Field name (`opcode`, `op1`, `op2`, `dest`).
        field: &'static str,
        /// Raw field text.
        bits: String,
    },
    /// Opcode nibble has no entry in the binary opcode table.
    #[error("unknown binary opcode {0:04b}")]
    UnknownBinaryOpcode(u8),
}

/// Load-time rejection of a single program line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct ValidationError {
    /// 1-based source line number.
    pub line: usize,
    /// What was wrong with the line.
    pub reason: ValidationReason,
}

impl ValidationError {
    /// Creates a validation error for a 1-based line number.
    #[must_use]
    pub const fn new(line: usize, reason: ValidationReason) -> Self {
        Self { line, reason }
    }
}

/// Load-time rejection of initial register data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Entry is not two whitespace-separated integers.
    #[error("line {line}: malformed initial data entry `{entry}`: {reason}")]
    MalformedEntry {
        /// 1-based line number.
        line: usize,
        /// Raw entry text.
        entry: String,
        /// Human-readable cause.
        reason: &'static str,
    },
    /// Register index outside the configured data register count.
    #[error("line {line}: register {index} out of range (machine has {count} data registers)")]
    RegisterOutOfRange {
        /// 1-based line number.
        line: usize,
        /// Offending register index.
        index: usize,
        /// Configured data register count.
        count: usize,
    },
}

/// Register bank addressed by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RegisterKind {
    /// Integer data registers (cached).
    Data,
    /// Boolean status registers.
    Status,
}

impl std::fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data => f.write_str("data"),
            Self::Status => f.write_str("status"),
        }
    }
}

/// Register access outside the configured bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} register {index} out of range (machine has {count})")]
pub struct RegisterOutOfRange {
    /// Bank that was addressed.
    pub kind: RegisterKind,
    /// Offending index.
    pub index: usize,
    /// Configured register count for the bank.
    pub count: usize,
}

/// Execution-time failure that aborts a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("instruction at {pc}: {source}")]
pub struct OperationError {
    /// Address of the instruction that failed.
    pub pc: u64,
    /// Underlying register access failure.
    pub source: RegisterOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::{
        OperationError, RangeError, RegisterKind, RegisterOutOfRange, ValidationError,
        ValidationReason,
    };
    use crate::encoding::Opcode;

    #[test]
    fn validation_error_names_the_line() {
        let error = ValidationError::new(
            3,
            ValidationReason::Arity {
                opcode: Opcode::Add,
                expected: "3",
                found: 2,
            },
        );
        assert_eq!(
            error.to_string(),
            "line 3: ADD expects 3 operand(s), found 2"
        );
    }

    #[test]
    fn unknown_binary_opcode_renders_as_nibble() {
        let error = ValidationError::new(1, ValidationReason::UnknownBinaryOpcode(0xC));
        assert_eq!(error.to_string(), "line 1: unknown binary opcode 1100");
    }

    #[test]
    fn range_error_reports_configured_count() {
        let error = RangeError::RegisterOutOfRange {
            line: 2,
            index: 40,
            count: 16,
        };
        assert!(error.to_string().contains("machine has 16 data registers"));
    }

    #[test]
    fn operation_error_carries_failing_address() {
        let error = OperationError {
            pc: 7,
            source: RegisterOutOfRange {
                kind: RegisterKind::Status,
                index: 99,
                count: 16,
            },
        };
        assert_eq!(
            error.to_string(),
            "instruction at 7: status register 99 out of range (machine has 16)"
        );
    }
}
