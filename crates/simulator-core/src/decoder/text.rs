use crate::encoding::Opcode;
use crate::errors::{ValidationError, ValidationReason};
use crate::instruction::{Instruction, LITERAL_SENTINEL};
use crate::validator::{validate, RawOperand};

/// Decodes one mnemonic line such as `ADD 0 #1 0`.
///
/// `line` is the 1-based source line number attached to any error.
///
/// # Errors
///
/// Returns a [`ValidationError`] for an empty line, an unknown mnemonic, an
/// operand that is neither an integer nor a `#`-prefixed literal, or any
/// arity/operand-kind violation reported by the validator.
pub fn decode_text_line(line: usize, source: &str) -> Result<Instruction, ValidationError> {
    let mut tokens = source.split_whitespace();
    let mnemonic = tokens
        .next()
        .ok_or(ValidationError::new(line, ValidationReason::EmptyLine))?;
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| {
        ValidationError::new(
            line,
            ValidationReason::UnknownMnemonic(mnemonic.to_string()),
        )
    })?;

    let operands = tokens
        .enumerate()
        .map(|(idx, token)| {
            parse_operand(token).ok_or_else(|| {
                ValidationError::new(
                    line,
                    ValidationReason::MalformedOperand {
                        position: idx + 1,
                        token: token.to_string(),
                    },
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate(line, opcode, &operands)
}

fn parse_operand(token: &str) -> Option<RawOperand> {
    token.strip_prefix(LITERAL_SENTINEL).map_or_else(
        || token.parse().ok().map(RawOperand::Bare),
        |literal| literal.parse().ok().map(RawOperand::Literal),
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::decode_text_line;
    use crate::errors::ValidationReason;
    use crate::instruction::{ArithmeticOp, CompareOp, Instruction, Operand};

    #[test]
    fn decodes_arithmetic_with_literal() {
        assert_eq!(
            decode_text_line(1, "MULT 0 #-3 4"),
            Ok(Instruction::Arithmetic {
                op: ArithmeticOp::Mult,
                lhs: Operand::Register(0),
                rhs: Operand::Literal(-3),
                dest: 4,
            })
        );
    }

    #[test]
    fn tolerates_surrounding_and_repeated_whitespace() {
        assert_eq!(
            decode_text_line(1, "  CMP\t1   #0 0  "),
            Ok(Instruction::Compare {
                op: CompareOp::Equal,
                lhs: Operand::Register(1),
                rhs: Operand::Literal(0),
                dest: 0,
            })
        );
    }

    #[test]
    fn decodes_zero_operand_opcodes() {
        assert_eq!(decode_text_line(1, "NOP"), Ok(Instruction::Nop));
        assert_eq!(decode_text_line(1, "HALT"), Ok(Instruction::Halt));
    }

    #[test]
    fn canonical_rendering_decodes_back() {
        for source in ["ADD 0 1 0", "SUB 1 #1 1", "JMP 6 0", "JMP 0", "LOAD 7 2", "STORE 2 9"] {
            let instruction = decode_text_line(1, source).expect("valid line");
            assert_eq!(instruction.to_string(), source);
        }
    }

    #[rstest]
    #[case::empty("", ValidationReason::EmptyLine)]
    #[case::blank("   \t", ValidationReason::EmptyLine)]
    #[case::unknown("MOV 0 1", ValidationReason::UnknownMnemonic("MOV".to_string()))]
    #[case::lowercase("add 0 1 2", ValidationReason::UnknownMnemonic("add".to_string()))]
    #[case::word_operand(
        "ADD 0 x 2",
        ValidationReason::MalformedOperand { position: 2, token: "x".to_string() }
    )]
    #[case::bare_sentinel(
        "ADD # 1 2",
        ValidationReason::MalformedOperand { position: 1, token: "#".to_string() }
    )]
    #[case::float_literal(
        "CMP 0 #1.5 0",
        ValidationReason::MalformedOperand { position: 2, token: "#1.5".to_string() }
    )]
    fn malformed_lines_are_rejected(#[case] source: &str, #[case] reason: ValidationReason) {
        let error = decode_text_line(12, source).expect_err("line must be rejected");
        assert_eq!(error.line, 12);
        assert_eq!(error.reason, reason);
    }

    #[test]
    fn arity_errors_surface_from_validator() {
        let error = decode_text_line(2, "HALT 1").expect_err("HALT takes no operands");
        assert!(matches!(error.reason, ValidationReason::Arity { found: 1, .. }));
    }
}
