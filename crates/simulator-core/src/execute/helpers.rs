//! Helper functions for instruction execution.

use crate::errors::RegisterOutOfRange;
use crate::instruction::Operand;
use crate::state::RegisterFile;

/// Resolves a source operand to its value. Register operands are read
/// through the cache; literals never touch it.
pub(super) fn resolve_operand(
    registers: &mut RegisterFile,
    operand: Operand,
) -> Result<i64, RegisterOutOfRange> {
    match operand {
        Operand::Register(index) => registers.fetch(index),
        Operand::Literal(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_operand;
    use crate::instruction::Operand;
    use crate::state::RegisterFile;

    #[test]
    fn literal_bypasses_cache() {
        let mut registers = RegisterFile::new(2, 1, 2);
        assert_eq!(resolve_operand(&mut registers, Operand::Literal(-7)), Ok(-7));
        assert!(registers.cache().is_empty());
    }

    #[test]
    fn register_operand_is_cached() {
        let mut registers = RegisterFile::new(2, 1, 2);
        registers.write(1, 3).expect("in range");
        assert_eq!(resolve_operand(&mut registers, Operand::Register(1)), Ok(3));
        assert!(registers.cache().contains(1));
    }
}
