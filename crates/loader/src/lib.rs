//! Host-side loading, conversion and reporting for the register-machine
//! simulator.

/// Text-to-binary program conversion.
pub mod assembler;
/// Structured load and run error types.
pub mod errors;
/// Final-state report rendering.
pub mod report;
/// End-to-end run orchestration.
pub mod run;
/// Program, initial data and configuration file loading.
pub mod source;

pub use errors::LoadError;
pub use report::RunReport;
pub use run::{simulate, RunRequest};

use tracing_subscriber as _;
