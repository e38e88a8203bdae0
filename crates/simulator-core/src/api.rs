//! Public host-facing API contracts for embedding the machine.

use std::collections::BTreeMap;

use crate::encoding::Opcode;
use crate::program::ProgramWord;
use crate::state::RunState;

/// Default number of data registers; matches the 4-bit binary operand fields.
pub const DEFAULT_DATA_REGISTERS: usize = 16;

/// Default number of status registers.
pub const DEFAULT_STATUS_REGISTERS: usize = 16;

/// Default number of cached data registers.
pub const DEFAULT_CACHE_CAPACITY: usize = 4;

/// Immutable configuration for a machine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MachineConfig {
    /// Size of the data register bank.
    pub data_registers: usize,
    /// Size of the status register bank.
    pub status_registers: usize,
    /// Maximum number of data registers held in the LRU cache.
    pub cache_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            data_registers: DEFAULT_DATA_REGISTERS,
            status_registers: DEFAULT_STATUS_REGISTERS,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Result of one fetch-decode-execute iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// An instruction ran.
    Executed {
        /// Address it was fetched from.
        pc: u64,
        /// Its opcode.
        opcode: Opcode,
        /// Complexity cost charged for it.
        cost: u64,
    },
    /// A raw data word was fetched and skipped.
    SkippedData {
        /// Address of the data word.
        pc: u64,
    },
    /// The machine had already halted; nothing ran.
    Halted,
    /// No word at the program counter; nothing ran.
    EndOfProgram,
}

/// Why a bounded run returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StopReason {
    /// `HALT` executed.
    Halted,
    /// The program counter ran off the end of the program.
    EndOfProgram,
    /// The step budget ran out while the machine was still running.
    BudgetExhausted,
}

/// Aggregated outcome of a bounded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunOutcome {
    /// Iterations performed during this call, data-word skips included.
    pub steps: u64,
    /// Why the run returned.
    pub stop: StopReason,
}

/// Final (or current) machine state handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Snapshot {
    /// Data register values by index.
    pub data_registers: Vec<i64>,
    /// Status register values by index.
    pub status_registers: Vec<bool>,
    /// Populated memory cells in address order, program words included.
    pub memory: BTreeMap<u64, ProgramWord>,
    /// Cached `(register, value)` pairs, least to most recently used.
    pub cache: Vec<(usize, i64)>,
    /// Program counter.
    pub pc: u64,
    /// Cumulative complexity cost.
    pub cost: u64,
    /// Run state at the time of the snapshot.
    pub run_state: RunState,
}
