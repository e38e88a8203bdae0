//! Final-state report rendering.

use std::fmt::Write as _;

use serde::Serialize;
use simulator_core::{ProgramWord, Snapshot, StopReason};

use crate::errors::LoadError;

/// Everything a finished run hands back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Why the run stopped.
    pub stop: StopReason,
    /// Iterations performed, data-word skips included.
    pub steps: u64,
    /// Machine state at the stop.
    pub state: Snapshot,
}

impl RunReport {
    /// Renders the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Report`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LoadError> {
        serde_json::to_string_pretty(self).map_err(LoadError::Report)
    }

    /// Renders the report as human-readable text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let stop = match self.stop {
            StopReason::Halted => "halted",
            StopReason::EndOfProgram => "ran off the end of the program",
            StopReason::BudgetExhausted => "step budget exhausted",
        };
        format!(
            "stop: {stop} after {} steps\n{}",
            self.steps,
            state_to_text(&self.state)
        )
    }
}

/// Renders a machine state as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`LoadError::Report`] if serialization fails.
pub fn state_to_json(state: &Snapshot) -> Result<String, LoadError> {
    serde_json::to_string_pretty(state).map_err(LoadError::Report)
}

/// Renders a machine state as human-readable text.
#[must_use]
pub fn state_to_text(state: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "pc: {}", state.pc);
    let _ = writeln!(out, "cost: {}", state.cost);

    let _ = writeln!(out, "data registers:");
    for (index, value) in state.data_registers.iter().enumerate() {
        let _ = writeln!(out, "  r{index} = {value}");
    }

    let _ = writeln!(out, "status registers:");
    for (index, value) in state.status_registers.iter().enumerate() {
        let _ = writeln!(out, "  s{index} = {value}");
    }

    if state.memory.is_empty() {
        let _ = writeln!(out, "memory: (empty)");
    } else {
        let _ = writeln!(out, "memory:");
        for (address, word) in &state.memory {
            let _ = match word {
                ProgramWord::Instruction(instruction) => {
                    writeln!(out, "  [{address}] = {instruction}")
                }
                ProgramWord::Data(value) => writeln!(out, "  [{address}] = {value}"),
            };
        }
    }

    let cache = state
        .cache
        .iter()
        .map(|(index, value)| format!("r{index}={value}"))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "cache (lru -> mru): {cache}");
    out
}
