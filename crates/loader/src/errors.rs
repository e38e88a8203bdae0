//! Structured error reporting for loading and running programs.
//!
//! Every variant that originates in a file carries the file path, so errors
//! print in the usual `path: line N: message` style:
//!
//! ```text
//! programs/sum/program.txt: line 3: CMP expects 3 operand(s), found 2
//! ```

use std::io;
use std::path::PathBuf;

use simulator_core::{OperationError, RangeError, Snapshot, ValidationError};
use thiserror::Error;

use crate::assembler::AssembleError;

/// Any failure between reading input files and producing a report.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A program line failed to decode or validate.
    #[error("{}: {source}", .path.display())]
    Validation {
        /// Program file.
        path: PathBuf,
        /// First rejected line.
        source: ValidationError,
    },
    /// Initial data was malformed or out of range.
    #[error("{}: {source}", .path.display())]
    Range {
        /// Initial data file.
        path: PathBuf,
        /// First rejected entry.
        source: RangeError,
    },
    /// The machine configuration file is not valid JSON for the config schema.
    #[error("{}: invalid machine configuration: {source}", .path.display())]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// A text program could not be converted to the binary format.
    #[error("{}: {source}", .path.display())]
    Assemble {
        /// Text program file.
        path: PathBuf,
        /// First line that has no binary form.
        source: AssembleError,
    },
    /// An instruction failed while running.
    #[error("{source}")]
    Operation {
        /// Failing instruction and register.
        source: OperationError,
        /// Machine state as the failure left it.
        state: Box<Snapshot>,
    },
    /// The report could not be serialized.
    #[error("failed to render report: {0}")]
    Report(#[source] serde_json::Error),
}

impl LoadError {
    /// Wraps an I/O error with the path that caused it.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use simulator_core::{ValidationError, ValidationReason};

    use super::LoadError;

    #[test]
    fn validation_error_is_prefixed_with_the_path() {
        let error = LoadError::Validation {
            path: "prog.txt".into(),
            source: ValidationError::new(2, ValidationReason::EmptyLine),
        };
        assert_eq!(error.to_string(), "prog.txt: line 2: empty line");
    }

    #[test]
    fn io_error_keeps_the_path() {
        let error = LoadError::io("missing.txt", io::Error::from(io::ErrorKind::NotFound));
        assert!(error.to_string().starts_with("missing.txt: "));
    }
}
