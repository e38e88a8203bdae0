/// Execution-state machine for the fetch-decode-execute loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Ready to fetch the next instruction.
    #[default]
    Running,
    /// `HALT` cleared the run flag.
    Halted,
    /// The program counter left the populated program addresses.
    EndOfProgram,
}

impl RunState {
    /// Returns `true` once the loop can make no further progress.
    #[must_use]
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Halted | Self::EndOfProgram)
    }
}
