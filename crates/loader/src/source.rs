//! Source ingestion for program, initial data and configuration files.
//!
//! The program format is chosen here, never inside the simulator: an explicit
//! choice wins, otherwise a `.bin` extension selects the binary format and
//! anything else is read as text.

use std::fs;
use std::path::Path;

use simulator_core::{parse_initial_data, InitialDataEntry, MachineConfig, Program, ProgramFormat};

use crate::errors::LoadError;

/// Picks the program format for `path` when none was given explicitly.
#[must_use]
pub fn format_for_path(path: &Path) -> ProgramFormat {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"))
    {
        ProgramFormat::Binary
    } else {
        ProgramFormat::Text
    }
}

/// Parses a `--format` value.
#[must_use]
pub fn parse_format(value: &str) -> Option<ProgramFormat> {
    match value {
        "text" => Some(ProgramFormat::Text),
        "binary" | "bin" => Some(ProgramFormat::Binary),
        _ => None,
    }
}

/// Reads a whole file as UTF-8 text.
///
/// # Errors
///
/// Returns [`LoadError::Io`] naming `path` when the file cannot be read.
pub fn read_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::io(path, source))
}

/// Reads and decodes a program file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] or [`LoadError::Validation`].
pub fn read_program(path: &Path, format: Option<ProgramFormat>) -> Result<Program, LoadError> {
    let format = format.unwrap_or_else(|| format_for_path(path));
    let source = read_text(path)?;
    Program::parse(&source, format).map_err(|source| LoadError::Validation {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an initial data file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] or [`LoadError::Range`] for a malformed entry.
pub fn read_initial_data(path: &Path) -> Result<Vec<InitialDataEntry>, LoadError> {
    let source = read_text(path)?;
    parse_initial_data(&source).map_err(|source| LoadError::Range {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a JSON machine configuration. Missing fields take their defaults.
///
/// # Errors
///
/// Returns [`LoadError::Io`] or [`LoadError::Config`].
pub fn read_config(path: &Path) -> Result<MachineConfig, LoadError> {
    let source = read_text(path)?;
    serde_json::from_str(&source).map_err(|source| LoadError::Config {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rstest::rstest;
    use simulator_core::ProgramFormat;

    use super::{format_for_path, parse_format};

    #[rstest]
    #[case::bin("programs/fib/program.bin", ProgramFormat::Binary)]
    #[case::upper_bin("FIB.BIN", ProgramFormat::Binary)]
    #[case::txt("programs/fib/program.txt", ProgramFormat::Text)]
    #[case::no_extension("program", ProgramFormat::Text)]
    fn extension_selects_format(#[case] path: &str, #[case] format: ProgramFormat) {
        assert_eq!(format_for_path(Path::new(path)), format);
    }

    #[test]
    fn explicit_format_names() {
        assert_eq!(parse_format("text"), Some(ProgramFormat::Text));
        assert_eq!(parse_format("binary"), Some(ProgramFormat::Binary));
        assert_eq!(parse_format("hex"), None);
    }
}
