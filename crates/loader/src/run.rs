//! Loads files into a fresh machine and runs it to completion.

use std::path::PathBuf;

use simulator_core::{Machine, MachineConfig, ProgramFormat};

use crate::errors::LoadError;
use crate::report::RunReport;
use crate::source::{read_initial_data, read_program};

/// Inputs for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunRequest {
    /// Program file.
    pub program: PathBuf,
    /// Optional initial data file.
    pub data: Option<PathBuf>,
    /// Explicit program format; inferred from the extension when `None`.
    pub format: Option<ProgramFormat>,
    /// Machine dimensions.
    pub config: MachineConfig,
    /// Iteration limit; unlimited when `None`.
    pub max_steps: Option<u64>,
}

/// Loads the program and initial data, then runs the machine.
///
/// Everything is loaded and checked before the first instruction executes.
///
/// # Errors
///
/// Returns a [`LoadError`] for unreadable or invalid inputs, or
/// [`LoadError::Operation`] carrying the machine state when an instruction
/// fails mid-run.
pub fn simulate(request: &RunRequest) -> Result<RunReport, LoadError> {
    let program = read_program(&request.program, request.format)?;
    let entries = match &request.data {
        Some(path) => read_initial_data(path)?,
        None => Vec::new(),
    };

    let mut machine = Machine::with_program(request.config, program);
    if let Some(path) = &request.data {
        machine
            .load_initial_data(&entries)
            .map_err(|source| LoadError::Range {
                path: path.clone(),
                source,
            })?;
    }

    let outcome = machine
        .run_with_budget(request.max_steps.unwrap_or(u64::MAX))
        .map_err(|source| LoadError::Operation {
            source,
            state: Box::new(machine.snapshot()),
        })?;
    tracing::debug!(steps = outcome.steps, stop = ?outcome.stop, "run finished");

    Ok(RunReport {
        stop: outcome.stop,
        steps: outcome.steps,
        state: machine.snapshot(),
    })
}
