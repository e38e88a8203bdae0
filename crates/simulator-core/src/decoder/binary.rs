use thiserror::Error;

use crate::encoding::BinaryOpcode;
use crate::errors::{ValidationError, ValidationReason};
use crate::instruction::{ArithmeticOp, CompareOp, Instruction, Operand};
use crate::validator::{validate, RawOperand};

/// Characters in one binary program line: four 4-bit fields.
pub const BINARY_WORD_LENGTH: usize = 16;

const FIELD_NAMES: [&str; 4] = ["opcode", "op1", "op2", "dest"];
const FIELD_MAX: u64 = 0b1111;

/// Decodes one `[opcode:4][op1:4][op2:4][dest:4]` line such as
/// `1000000000010001`.
///
/// Operand fields beyond the opcode's arity are discarded without checking
/// that they are zero.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the line is not exactly 16 characters
/// (a trailing carriage return aside), a field holds anything other than
/// `0`/`1`, or the opcode nibble is unassigned.
pub fn decode_binary_line(line: usize, source: &str) -> Result<Instruction, ValidationError> {
    let source = source.strip_suffix('\r').unwrap_or(source);
    let chars: Vec<char> = source.chars().collect();
    if chars.len() != BINARY_WORD_LENGTH {
        return Err(ValidationError::new(
            line,
            ValidationReason::BinaryLength(chars.len()),
        ));
    }

    let mut fields = [0_u8; 4];
    for ((field, bits), name) in fields.iter_mut().zip(chars.chunks(4)).zip(FIELD_NAMES) {
        *field = parse_nibble(bits).ok_or_else(|| {
            ValidationError::new(
                line,
                ValidationReason::InvalidBinaryField {
                    field: name,
                    bits: bits.iter().collect(),
                },
            )
        })?;
    }

    let opcode = BinaryOpcode::from_nibble(fields[0]).ok_or(ValidationError::new(
        line,
        ValidationReason::UnknownBinaryOpcode(fields[0]),
    ))?;

    let operands: Vec<RawOperand> = fields[1..=opcode.arity()]
        .iter()
        .map(|field| RawOperand::Bare(i64::from(*field)))
        .collect();

    validate(line, opcode.opcode(), &operands)
}

fn parse_nibble(bits: &[char]) -> Option<u8> {
    bits.iter().try_fold(0_u8, |acc, bit| match bit {
        '0' => Some(acc << 1),
        '1' => Some((acc << 1) | 1),
        _ => None,
    })
}

/// Instruction that has no binary representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The binary format has no literal operands.
    #[error("operand {position} is a literal; binary words only hold register indices")]
    LiteralOperand {
        /// 1-based operand position.
        position: usize,
    },
    /// Index, address or target does not fit in a 4-bit field.
    #[error("operand {position} value {value} does not fit in a 4-bit field")]
    FieldOverflow {
        /// 1-based operand position.
        position: usize,
        /// Offending value.
        value: u64,
    },
}

/// Encodes an instruction as a 16-character binary line.
///
/// Unused operand fields are written as zero and unconditional jumps use the
/// unconditional jump opcode, so [`decode_binary_line`] restores the same
/// instruction.
///
/// # Errors
///
/// Returns an [`EncodeError`] for literal operands or values above 15.
pub fn encode_binary(instruction: &Instruction) -> Result<String, EncodeError> {
    let (opcode, operands): (BinaryOpcode, Vec<u64>) = match *instruction {
        Instruction::Nop => (BinaryOpcode::Nop, Vec::new()),
        Instruction::Halt => (BinaryOpcode::Halt, Vec::new()),
        Instruction::Compare { op, lhs, rhs, dest } => {
            let opcode = match op {
                CompareOp::Equal => BinaryOpcode::Cmp,
                CompareOp::NotEqual => BinaryOpcode::Cne,
            };
            (opcode, vec![register(lhs, 1)?, register(rhs, 2)?, widen(dest)])
        }
        Instruction::Arithmetic { op, lhs, rhs, dest } => {
            let opcode = match op {
                ArithmeticOp::Add => BinaryOpcode::Add,
                ArithmeticOp::Sub => BinaryOpcode::Sub,
                ArithmeticOp::Mult => BinaryOpcode::Mult,
            };
            (opcode, vec![register(lhs, 1)?, register(rhs, 2)?, widen(dest)])
        }
        Instruction::Load { address, dest } => (BinaryOpcode::Load, vec![address, widen(dest)]),
        Instruction::Store { source, address } => {
            (BinaryOpcode::Store, vec![widen(source), address])
        }
        Instruction::Jump {
            target,
            condition: None,
        } => (BinaryOpcode::JmpUnconditional, vec![target]),
        Instruction::Jump {
            target,
            condition: Some(status),
        } => (BinaryOpcode::JmpConditional, vec![target, widen(status)]),
    };

    let mut word = format!("{:04b}", opcode.nibble());
    for slot in 0..3 {
        let value = operands.get(slot).copied().unwrap_or(0);
        if value > FIELD_MAX {
            return Err(EncodeError::FieldOverflow {
                position: slot + 1,
                value,
            });
        }
        word.push_str(&format!("{value:04b}"));
    }
    Ok(word)
}

fn register(operand: Operand, position: usize) -> Result<u64, EncodeError> {
    match operand {
        Operand::Register(index) => Ok(widen(index)),
        Operand::Literal(_) => Err(EncodeError::LiteralOperand { position }),
    }
}

fn widen(index: usize) -> u64 {
    u64::try_from(index).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{decode_binary_line, encode_binary, EncodeError};
    use crate::errors::ValidationReason;
    use crate::instruction::{ArithmeticOp, CompareOp, Instruction, Operand};

    #[test]
    fn decodes_three_operand_word() {
        assert_eq!(
            decode_binary_line(1, "1000000000010001"),
            Ok(Instruction::Arithmetic {
                op: ArithmeticOp::Add,
                lhs: Operand::Register(0),
                rhs: Operand::Register(1),
                dest: 1,
            })
        );
        assert_eq!(
            decode_binary_line(1, "0010001001000000"),
            Ok(Instruction::Compare {
                op: CompareOp::Equal,
                lhs: Operand::Register(2),
                rhs: Operand::Register(4),
                dest: 0,
            })
        );
    }

    #[test]
    fn jump_forms_keep_their_own_arity() {
        assert_eq!(
            decode_binary_line(1, "0100101000000000"),
            Ok(Instruction::Jump {
                target: 10,
                condition: Some(0),
            })
        );
        assert_eq!(
            decode_binary_line(1, "0101000011111111"),
            Ok(Instruction::Jump {
                target: 0,
                condition: None,
            })
        );
    }

    #[test]
    fn fields_past_arity_are_discarded() {
        assert_eq!(decode_binary_line(1, "0001111111111111"), Ok(Instruction::Halt));
        assert_eq!(
            decode_binary_line(1, "0110001100101111"),
            Ok(Instruction::Load {
                address: 3,
                dest: 2,
            })
        );
    }

    #[test]
    fn trailing_carriage_return_is_ignored() {
        assert_eq!(decode_binary_line(1, "0000000000000000\r"), Ok(Instruction::Nop));
    }

    #[rstest]
    #[case::short("000100000000000", ValidationReason::BinaryLength(15))]
    #[case::long("00010000000000000", ValidationReason::BinaryLength(17))]
    #[case::empty("", ValidationReason::BinaryLength(0))]
    #[case::padded("  0001000000000000  ", ValidationReason::BinaryLength(20))]
    #[case::leading_space(" 000100000000000", ValidationReason::InvalidBinaryField { field: "opcode", bits: " 000".to_string() })]
    #[case::bad_opcode_field(
        "00x1000000000000",
        ValidationReason::InvalidBinaryField { field: "opcode", bits: "00x1".to_string() }
    )]
    #[case::bad_dest_field(
        "100000000001002a",
        ValidationReason::InvalidBinaryField { field: "dest", bits: "002a".to_string() }
    )]
    #[case::multibyte("é000000000000000", ValidationReason::InvalidBinaryField { field: "opcode", bits: "é000".to_string() })]
    #[case::unassigned_opcode("1011000000000000", ValidationReason::UnknownBinaryOpcode(0b1011))]
    #[case::top_opcode("1111000000000000", ValidationReason::UnknownBinaryOpcode(0b1111))]
    fn malformed_words_are_rejected(#[case] source: &str, #[case] reason: ValidationReason) {
        let error = decode_binary_line(4, source).expect_err("word must be rejected");
        assert_eq!(error.line, 4);
        assert_eq!(error.reason, reason);
    }

    #[test]
    fn encoder_is_inverse_of_decoder() {
        for source in [
            "0000000000000000",
            "0001000000000000",
            "1001001000110010",
            "0011010101100111",
            "0100101000000000",
            "0101100000000000",
            "0111000100100000",
        ] {
            let instruction = decode_binary_line(1, source).expect("valid word");
            assert_eq!(encode_binary(&instruction).as_deref(), Ok(source));
        }
    }

    #[test]
    fn encoder_rejects_literals_and_wide_fields() {
        let literal = Instruction::Arithmetic {
            op: ArithmeticOp::Sub,
            lhs: Operand::Register(1),
            rhs: Operand::Literal(1),
            dest: 1,
        };
        assert_eq!(
            encode_binary(&literal),
            Err(EncodeError::LiteralOperand { position: 2 })
        );

        let wide = Instruction::Jump {
            target: 16,
            condition: None,
        };
        assert_eq!(
            encode_binary(&wide),
            Err(EncodeError::FieldOverflow {
                position: 1,
                value: 16,
            })
        );
    }
}
