//! Fetch-decode-execute engine.
//!
//! Each iteration fetches the word at the program counter, advances the
//! counter, then dispatches the instruction. Instructions see the advanced
//! counter, so a conditional jump that is not taken falls through naturally.
//! A failing instruction charges no cost and aborts the run.

mod helpers;

use helpers::resolve_operand;

use crate::api::{MachineConfig, RunOutcome, Snapshot, StepOutcome, StopReason};
use crate::errors::{OperationError, RangeError, RegisterOutOfRange};
use crate::initial_data::InitialDataEntry;
use crate::instruction::{ArithmeticOp, CompareOp, Instruction, Operand};
use crate::memory::Memory;
use crate::program::{Program, ProgramWord};
use crate::state::{RegisterFile, RunState};
use crate::timing::complexity_cost;

/// One simulated machine: register banks, cache, the shared program and data
/// memory, program counter and cumulative cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    config: MachineConfig,
    registers: RegisterFile,
    memory: Memory,
    pc: u64,
    cost: u64,
    run_state: RunState,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

impl Machine {
    /// Creates a machine with zeroed registers, empty memory and no program.
    #[must_use]
    pub fn new(config: MachineConfig) -> Self {
        Self {
            config,
            registers: RegisterFile::new(
                config.data_registers,
                config.status_registers,
                config.cache_capacity,
            ),
            memory: Memory::new(),
            pc: 0,
            cost: 0,
            run_state: RunState::Running,
        }
    }

    /// Creates a machine already holding `program`.
    #[must_use]
    pub fn with_program(config: MachineConfig, program: Program) -> Self {
        let mut machine = Self::new(config);
        machine.load_program(program);
        machine
    }

    /// Replaces memory with the program image and rewinds the program
    /// counter to 0.
    ///
    /// Registers and the cost counter are left untouched.
    pub fn load_program(&mut self, program: Program) {
        tracing::debug!(words = program.len(), "program loaded");
        self.memory = Memory::from(program);
        self.pc = 0;
        self.run_state = RunState::Running;
    }

    /// Writes initial data register values.
    ///
    /// Every entry is bounds-checked before any register is written, so a
    /// rejected load leaves the registers unchanged. Initial values bypass
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::RegisterOutOfRange`] for the first entry whose
    /// index is past the configured data register count.
    pub fn load_initial_data(&mut self, entries: &[InitialDataEntry]) -> Result<(), RangeError> {
        let count = self.config.data_registers;
        let out_of_range = |entry: &InitialDataEntry| RangeError::RegisterOutOfRange {
            line: entry.line,
            index: entry.index,
            count,
        };

        if let Some(entry) = entries.iter().find(|entry| entry.index >= count) {
            return Err(out_of_range(entry));
        }
        for entry in entries {
            self.registers
                .write(entry.index, entry.value)
                .map_err(|_| out_of_range(entry))?;
        }

        tracing::debug!(entries = entries.len(), "initial data loaded");
        Ok(())
    }

    /// Runs one fetch-decode-execute iteration.
    ///
    /// A stopped machine reports why it stopped and does nothing else.
    ///
    /// # Errors
    ///
    /// Returns an [`OperationError`] when the instruction addresses a register
    /// outside the configured banks. The program counter has already advanced
    /// past the failing instruction and its cost is not charged.
    pub fn step(&mut self) -> Result<StepOutcome, OperationError> {
        match self.run_state {
            RunState::Halted => return Ok(StepOutcome::Halted),
            RunState::EndOfProgram => return Ok(StepOutcome::EndOfProgram),
            RunState::Running => {}
        }

        let pc = self.pc;
        let Some(word) = self.memory.fetch(pc) else {
            self.run_state = RunState::EndOfProgram;
            tracing::debug!(pc, cost = self.cost, "ran off the end of the program");
            return Ok(StepOutcome::EndOfProgram);
        };
        self.pc = pc.wrapping_add(1);

        let instruction = match word {
            ProgramWord::Instruction(instruction) => instruction,
            ProgramWord::Data(value) => {
                tracing::trace!(pc, value, "skipped data word");
                return Ok(StepOutcome::SkippedData { pc });
            }
        };

        self.execute(instruction).map_err(|source| {
            let error = OperationError { pc, source };
            tracing::warn!(%error, "operation failed");
            error
        })?;

        let opcode = instruction.opcode();
        let cost = complexity_cost(opcode);
        self.cost = self.cost.saturating_add(cost);
        tracing::trace!(pc, %instruction, total_cost = self.cost, "executed");

        if self.run_state == RunState::Halted {
            tracing::debug!(pc = self.pc, cost = self.cost, "halted");
        }
        Ok(StepOutcome::Executed { pc, opcode, cost })
    }

    /// Runs until `HALT` or the end of the program and returns the final
    /// state.
    ///
    /// Nothing bounds the number of iterations; a program that loops forever
    /// without halting never returns. Use [`Self::run_with_budget`] to impose
    /// a limit.
    ///
    /// # Errors
    ///
    /// Returns the first [`OperationError`]; no snapshot is produced.
    pub fn run(&mut self) -> Result<Snapshot, OperationError> {
        while !self.run_state.is_stopped() {
            let _ = self.step()?;
        }
        Ok(self.snapshot())
    }

    /// Runs at most `max_steps` iterations.
    ///
    /// Data-word skips count as iterations. A machine that is already stopped
    /// returns immediately with zero steps.
    ///
    /// # Errors
    ///
    /// Returns the first [`OperationError`].
    pub fn run_with_budget(&mut self, max_steps: u64) -> Result<RunOutcome, OperationError> {
        let mut steps = 0;
        while steps < max_steps && !self.run_state.is_stopped() {
            match self.step()? {
                StepOutcome::Executed { .. } | StepOutcome::SkippedData { .. } => steps += 1,
                StepOutcome::Halted | StepOutcome::EndOfProgram => break,
            }
        }

        let stop = match self.run_state {
            RunState::Halted => StopReason::Halted,
            RunState::EndOfProgram => StopReason::EndOfProgram,
            RunState::Running => {
                tracing::debug!(steps, pc = self.pc, "step budget exhausted");
                StopReason::BudgetExhausted
            }
        };
        Ok(RunOutcome { steps, stop })
    }

    /// Captures the current machine state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            data_registers: self.registers.data().to_vec(),
            status_registers: self.registers.status_registers().to_vec(),
            memory: self.memory.cells().clone(),
            cache: self.registers.cache().entries().collect(),
            pc: self.pc,
            cost: self.cost,
            run_state: self.run_state,
        }
    }

    /// Configuration this machine was built with.
    #[must_use]
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Register banks and cache.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Program and data memory.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable memory, for seeding data words before a run.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Address of the next word to fetch.
    #[must_use]
    pub const fn pc(&self) -> u64 {
        self.pc
    }

    /// Cumulative complexity cost.
    #[must_use]
    pub const fn cost(&self) -> u64 {
        self.cost
    }

    /// Current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    fn execute(&mut self, instruction: Instruction) -> Result<(), RegisterOutOfRange> {
        match instruction {
            Instruction::Nop => Ok(()),
            Instruction::Halt => {
                self.run_state = RunState::Halted;
                Ok(())
            }
            Instruction::Compare { op, lhs, rhs, dest } => {
                execute_compare(&mut self.registers, op, lhs, rhs, dest)
            }
            Instruction::Arithmetic { op, lhs, rhs, dest } => {
                execute_arithmetic(&mut self.registers, op, lhs, rhs, dest)
            }
            Instruction::Load { address, dest } => {
                self.registers.write(dest, self.memory.read(address))
            }
            Instruction::Store { source, address } => {
                let value = self.registers.fetch(source)?;
                self.memory.write(address, value);
                Ok(())
            }
            Instruction::Jump { target, condition } => {
                if let Some(pc) = execute_jump(&self.registers, target, condition)? {
                    self.pc = pc;
                }
                Ok(())
            }
        }
    }
}

fn execute_compare(
    registers: &mut RegisterFile,
    op: CompareOp,
    lhs: Operand,
    rhs: Operand,
    dest: usize,
) -> Result<(), RegisterOutOfRange> {
    let lhs = resolve_operand(registers, lhs)?;
    let rhs = resolve_operand(registers, rhs)?;
    registers.set_status(dest, op.apply(lhs, rhs))
}

fn execute_arithmetic(
    registers: &mut RegisterFile,
    op: ArithmeticOp,
    lhs: Operand,
    rhs: Operand,
    dest: usize,
) -> Result<(), RegisterOutOfRange> {
    let lhs = resolve_operand(registers, lhs)?;
    let rhs = resolve_operand(registers, rhs)?;
    registers.write(dest, op.apply(lhs, rhs))
}

/// Returns the new program counter when the jump is taken.
fn execute_jump(
    registers: &RegisterFile,
    target: u64,
    condition: Option<usize>,
) -> Result<Option<u64>, RegisterOutOfRange> {
    let taken = match condition {
        None => true,
        Some(status) => registers.status(status)?,
    };
    Ok(taken.then_some(target))
}
