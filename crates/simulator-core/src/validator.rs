//! Static arity and operand-type checks applied before an instruction is
//! committed to the program store.
//!
//! Both decoders reduce a line to an [`Opcode`] plus a list of [`RawOperand`]s
//! and hand them here; nothing reaches the program store without passing
//! [`validate`].

use crate::encoding::Opcode;
use crate::errors::{ValidationError, ValidationReason};
use crate::instruction::{ArithmeticOp, CompareOp, Instruction, Operand};

/// Operand token as written, before its role is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawOperand {
    /// Plain integer: a register index, address or jump target.
    Bare(i64),
    /// Sentinel-prefixed immediate value.
    Literal(i64),
}

/// Checks arity and operand kinds for `opcode` and builds the instruction.
///
/// # Errors
///
/// Returns a [`ValidationError`] tagged with `line` when the operand count is
/// wrong, a literal sits where an index is required, or an index is negative.
pub fn validate(
    line: usize,
    opcode: Opcode,
    operands: &[RawOperand],
) -> Result<Instruction, ValidationError> {
    let check = OperandCheck {
        line,
        opcode,
        operands,
    };

    match opcode {
        Opcode::Nop => check.arity(&[0], "0").map(|()| Instruction::Nop),
        Opcode::Halt => check.arity(&[0], "0").map(|()| Instruction::Halt),
        Opcode::Cmp => check.compare(CompareOp::Equal),
        Opcode::Cne => check.compare(CompareOp::NotEqual),
        Opcode::Add => check.arithmetic(ArithmeticOp::Add),
        Opcode::Sub => check.arithmetic(ArithmeticOp::Sub),
        Opcode::Mult => check.arithmetic(ArithmeticOp::Mult),
        Opcode::Load => {
            check.arity(&[2], "2")?;
            Ok(Instruction::Load {
                address: check.address(0)?,
                dest: check.index(1)?,
            })
        }
        Opcode::Store => {
            check.arity(&[2], "2")?;
            Ok(Instruction::Store {
                source: check.index(0)?,
                address: check.address(1)?,
            })
        }
        Opcode::Jmp => {
            check.arity(&[1, 2], "1 or 2")?;
            let target = check.address(0)?;
            let condition = if operands.len() == 2 {
                Some(check.index(1)?)
            } else {
                None
            };
            Ok(Instruction::Jump { target, condition })
        }
    }
}

struct OperandCheck<'a> {
    line: usize,
    opcode: Opcode,
    operands: &'a [RawOperand],
}

impl OperandCheck<'_> {
    fn fail(&self, reason: ValidationReason) -> ValidationError {
        ValidationError::new(self.line, reason)
    }

    fn arity(&self, accepted: &[usize], expected: &'static str) -> Result<(), ValidationError> {
        if accepted.contains(&self.operands.len()) {
            Ok(())
        } else {
            Err(self.fail(ValidationReason::Arity {
                opcode: self.opcode,
                expected,
                found: self.operands.len(),
            }))
        }
    }

    fn compare(&self, op: CompareOp) -> Result<Instruction, ValidationError> {
        self.arity(&[3], "3")?;
        Ok(Instruction::Compare {
            op,
            lhs: self.source(0)?,
            rhs: self.source(1)?,
            dest: self.index(2)?,
        })
    }

    fn arithmetic(&self, op: ArithmeticOp) -> Result<Instruction, ValidationError> {
        self.arity(&[3], "3")?;
        Ok(Instruction::Arithmetic {
            op,
            lhs: self.source(0)?,
            rhs: self.source(1)?,
            dest: self.index(2)?,
        })
    }

    fn source(&self, slot: usize) -> Result<Operand, ValidationError> {
        match self.operands[slot] {
            RawOperand::Literal(value) => Ok(Operand::Literal(value)),
            RawOperand::Bare(_) => self.index(slot).map(Operand::Register),
        }
    }

    fn bare(&self, slot: usize) -> Result<i64, ValidationError> {
        match self.operands[slot] {
            RawOperand::Bare(value) => Ok(value),
            RawOperand::Literal(_) => Err(self.fail(ValidationReason::LiteralNotAllowed {
                opcode: self.opcode,
                position: slot + 1,
            })),
        }
    }

    fn address(&self, slot: usize) -> Result<u64, ValidationError> {
        let value = self.bare(slot)?;
        u64::try_from(value).map_err(|_| self.negative(slot, value))
    }

    fn index(&self, slot: usize) -> Result<usize, ValidationError> {
        let value = self.bare(slot)?;
        usize::try_from(value).map_err(|_| self.negative(slot, value))
    }

    fn negative(&self, slot: usize, value: i64) -> ValidationError {
        self.fail(ValidationReason::NegativeIndex {
            opcode: self.opcode,
            position: slot + 1,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{validate, RawOperand};
    use crate::encoding::Opcode;
    use crate::errors::ValidationReason;
    use crate::instruction::{ArithmeticOp, CompareOp, Instruction, Operand};

    use super::RawOperand::{Bare, Literal};

    #[test]
    fn arithmetic_accepts_literal_sources() {
        let instruction = validate(1, Opcode::Sub, &[Bare(1), Literal(1), Bare(1)])
            .expect("valid SUB");
        assert_eq!(
            instruction,
            Instruction::Arithmetic {
                op: ArithmeticOp::Sub,
                lhs: Operand::Register(1),
                rhs: Operand::Literal(1),
                dest: 1,
            }
        );
    }

    #[test]
    fn compare_builds_status_destination() {
        let instruction =
            validate(1, Opcode::Cne, &[Literal(4), Bare(2), Bare(0)]).expect("valid CNE");
        assert_eq!(
            instruction,
            Instruction::Compare {
                op: CompareOp::NotEqual,
                lhs: Operand::Literal(4),
                rhs: Operand::Register(2),
                dest: 0,
            }
        );
    }

    #[test]
    fn jump_accepts_one_or_two_operands() {
        assert_eq!(
            validate(1, Opcode::Jmp, &[Bare(4)]),
            Ok(Instruction::Jump {
                target: 4,
                condition: None,
            })
        );
        assert_eq!(
            validate(1, Opcode::Jmp, &[Bare(4), Bare(1)]),
            Ok(Instruction::Jump {
                target: 4,
                condition: Some(1),
            })
        );
    }

    #[test]
    fn load_and_store_order_operands() {
        assert_eq!(
            validate(1, Opcode::Load, &[Bare(100), Bare(3)]),
            Ok(Instruction::Load {
                address: 100,
                dest: 3,
            })
        );
        assert_eq!(
            validate(1, Opcode::Store, &[Bare(3), Bare(100)]),
            Ok(Instruction::Store {
                source: 3,
                address: 100,
            })
        );
    }

    #[rstest]
    #[case::nop_with_operand(Opcode::Nop, vec![Bare(1)])]
    #[case::halt_with_operand(Opcode::Halt, vec![Bare(0)])]
    #[case::add_two_operands(Opcode::Add, vec![Bare(0), Bare(1)])]
    #[case::mult_four_operands(Opcode::Mult, vec![Bare(0), Bare(1), Bare(2), Bare(3)])]
    #[case::cmp_no_operands(Opcode::Cmp, vec![])]
    #[case::load_one_operand(Opcode::Load, vec![Bare(0)])]
    #[case::store_three_operands(Opcode::Store, vec![Bare(0), Bare(1), Bare(2)])]
    #[case::jmp_no_operands(Opcode::Jmp, vec![])]
    #[case::jmp_three_operands(Opcode::Jmp, vec![Bare(0), Bare(1), Bare(2)])]
    fn wrong_arity_is_rejected(#[case] opcode: Opcode, #[case] operands: Vec<RawOperand>) {
        let error = validate(9, opcode, &operands).expect_err("arity must be checked");
        assert_eq!(error.line, 9);
        assert!(
            matches!(error.reason, ValidationReason::Arity { found, .. } if found == operands.len()),
            "{error}"
        );
    }

    #[rstest]
    #[case::literal_destination(Opcode::Add, vec![Bare(0), Bare(1), Literal(2)], 3)]
    #[case::literal_cmp_destination(Opcode::Cmp, vec![Bare(0), Bare(1), Literal(0)], 3)]
    #[case::literal_load_address(Opcode::Load, vec![Literal(5), Bare(1)], 1)]
    #[case::literal_store_source(Opcode::Store, vec![Literal(5), Bare(1)], 1)]
    #[case::literal_jump_target(Opcode::Jmp, vec![Literal(5)], 1)]
    #[case::literal_jump_condition(Opcode::Jmp, vec![Bare(5), Literal(0)], 2)]
    fn literals_outside_source_slots_are_rejected(
        #[case] opcode: Opcode,
        #[case] operands: Vec<RawOperand>,
        #[case] position: usize,
    ) {
        let error = validate(1, opcode, &operands).expect_err("literal must be rejected");
        assert_eq!(
            error.reason,
            ValidationReason::LiteralNotAllowed { opcode, position }
        );
    }

    #[rstest]
    #[case::negative_register(Opcode::Add, vec![Bare(-1), Bare(1), Bare(2)], 1)]
    #[case::negative_destination(Opcode::Sub, vec![Bare(0), Literal(-1), Bare(-2)], 3)]
    #[case::negative_address(Opcode::Load, vec![Bare(-8), Bare(0)], 1)]
    #[case::negative_target(Opcode::Jmp, vec![Bare(-1)], 1)]
    fn negative_indices_are_rejected(
        #[case] opcode: Opcode,
        #[case] operands: Vec<RawOperand>,
        #[case] position: usize,
    ) {
        let error = validate(1, opcode, &operands).expect_err("negative index");
        assert!(
            matches!(error.reason, ValidationReason::NegativeIndex { position: p, .. } if p == position),
            "{error}"
        );
    }
}
