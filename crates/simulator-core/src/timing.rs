use crate::encoding::Opcode;

/// Single source-of-truth complexity cost charged per executed opcode.
pub const COMPLEXITY_COST_TABLE: &[(Opcode, u64)] = &[
    (Opcode::Nop, 0),
    (Opcode::Halt, 0),
    (Opcode::Cmp, 4),
    (Opcode::Cne, 4),
    (Opcode::Jmp, 4),
    (Opcode::Load, 2),
    (Opcode::Store, 2),
    (Opcode::Add, 4),
    (Opcode::Sub, 4),
    (Opcode::Mult, 4),
];

/// Looks up the complexity cost of an opcode.
#[must_use]
pub fn complexity_cost(opcode: Opcode) -> u64 {
    COMPLEXITY_COST_TABLE
        .iter()
        .find_map(|(entry, cost)| (*entry == opcode).then_some(*cost))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{complexity_cost, COMPLEXITY_COST_TABLE};
    use crate::encoding::Opcode;

    #[test]
    fn table_contains_every_opcode_once() {
        let opcodes: HashSet<_> = COMPLEXITY_COST_TABLE.iter().map(|(op, _)| *op).collect();
        assert_eq!(opcodes.len(), COMPLEXITY_COST_TABLE.len());
        assert_eq!(opcodes.len(), Opcode::ALL.len());
    }

    #[test]
    fn table_values_match_canonical_costs() {
        assert_eq!(complexity_cost(Opcode::Nop), 0);
        assert_eq!(complexity_cost(Opcode::Halt), 0);
        assert_eq!(complexity_cost(Opcode::Load), 2);
        assert_eq!(complexity_cost(Opcode::Store), 2);
        for opcode in [
            Opcode::Jmp,
            Opcode::Add,
            Opcode::Sub,
            Opcode::Mult,
            Opcode::Cmp,
            Opcode::Cne,
        ] {
            assert_eq!(complexity_cost(opcode), 4, "{opcode}");
        }
    }
}
