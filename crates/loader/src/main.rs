//! CLI entry point for the `regsim` binary.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use loader::assembler::{assemble, AssembleResult};
use loader::report::{state_to_json, state_to_text};
use loader::source::{parse_format, read_config, read_text};
use loader::{simulate, LoadError, RunRequest};
use serde as _;
use serde_json as _;
use simulator_core::{MachineConfig, ProgramFormat, StopReason};
#[cfg(test)]
use rstest as _;
#[cfg(test)]
use tempfile as _;
use thiserror as _;
use tracing as _;
use tracing_subscriber::EnvFilter;

const USAGE_TEXT: &str = "\
Usage: regsim <command> [options]

Commands:
  run <program> [options]            Load and run a program, then print the final state
  encode <input> [-o <output>]       Convert a text program to the binary format

Run options:
  -d, --data <file>                  Initial data register file
  -f, --format <text|binary>         Program format (default: from extension, .bin is binary)
  -c, --config <file.json>           Machine configuration
      --data-registers <n>           Override the data register count
      --status-registers <n>         Override the status register count
      --cache-capacity <n>           Override the register cache capacity
      --max-steps <n>                Stop after n iterations (exit code 2)
      --json                         Print the final state as JSON

Common options:
  -o, --output <file>                Output file path (encode; default: input stem + .bin)
  -v, --verbose                      Log load and halt events to stderr
  -h, --help                         Show this help message

Examples:
  regsim run programs/sum/program.txt -d programs/sum/inputdata.txt
  regsim run programs/fib/program.bin -d programs/fib/inputdata.txt --json
  regsim encode programs/fib/program.txt -o fib.bin
";

const EXIT_BUDGET_EXHAUSTED: i32 = 2;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(RunArgs),
    Encode(EncodeArgs),
}

#[derive(Debug, Default, PartialEq, Eq)]
struct RunArgs {
    program: PathBuf,
    data: Option<PathBuf>,
    format: Option<ProgramFormat>,
    config: Option<PathBuf>,
    overrides: ConfigOverrides,
    max_steps: Option<u64>,
    json: bool,
    verbose: bool,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ConfigOverrides {
    data_registers: Option<usize>,
    status_registers: Option<usize>,
    cache_capacity: Option<usize>,
}

impl ConfigOverrides {
    fn apply(&self, config: MachineConfig) -> MachineConfig {
        MachineConfig {
            data_registers: self.data_registers.unwrap_or(config.data_registers),
            status_registers: self.status_registers.unwrap_or(config.status_registers),
            cache_capacity: self.cache_capacity.unwrap_or(config.cache_capacity),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct EncodeArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let command = args.next().ok_or_else(|| "missing command".to_string())?;

    match &*command.to_string_lossy() {
        "--help" | "-h" => Ok(ParseResult::Help),
        "run" => parse_run_args(args).map(|run| ParseResult::Command(Command::Run(run))),
        "encode" => {
            parse_encode_args(args).map(|encode| ParseResult::Command(Command::Encode(encode)))
        }
        other => Err(format!("unknown command: {other}")),
    }
}

fn option_value(
    args: &mut impl Iterator<Item = OsString>,
    flag: &OsString,
) -> Result<OsString, String> {
    args.next()
        .ok_or_else(|| format!("missing value for {}", flag.to_string_lossy()))
}

fn numeric_value<T: FromStr>(
    args: &mut impl Iterator<Item = OsString>,
    flag: &OsString,
) -> Result<T, String> {
    let value = option_value(args, flag)?;
    let text = value.to_string_lossy();
    text.parse().map_err(|_| {
        format!(
            "invalid value for {}: {text} (expected a non-negative integer)",
            flag.to_string_lossy()
        )
    })
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut program: Option<PathBuf> = None;
    let mut parsed = RunArgs::default();

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().into_owned();
        match flag.as_str() {
            "--help" | "-h" => return Err(USAGE_TEXT.to_string()),
            "--verbose" | "-v" => parsed.verbose = true,
            "--json" => parsed.json = true,
            "--data" | "-d" => parsed.data = Some(option_value(&mut args, &arg)?.into()),
            "--config" | "-c" => parsed.config = Some(option_value(&mut args, &arg)?.into()),
            "--format" | "-f" => {
                let value = option_value(&mut args, &arg)?;
                let value = value.to_string_lossy();
                parsed.format = Some(
                    parse_format(&value).ok_or_else(|| format!("unknown format: {value}"))?,
                );
            }
            "--data-registers" => {
                parsed.overrides.data_registers = Some(numeric_value(&mut args, &arg)?);
            }
            "--status-registers" => {
                parsed.overrides.status_registers = Some(numeric_value(&mut args, &arg)?);
            }
            "--cache-capacity" => {
                parsed.overrides.cache_capacity = Some(numeric_value(&mut args, &arg)?);
            }
            "--max-steps" => parsed.max_steps = Some(numeric_value(&mut args, &arg)?),
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            _ if program.is_some() => return Err("multiple program paths provided".to_string()),
            _ => program = Some(PathBuf::from(arg)),
        }
    }

    parsed.program = program.ok_or_else(|| "missing program path".to_string())?;
    Ok(parsed)
}

#[allow(clippy::while_let_on_iterator)]
fn parse_encode_args(mut args: impl Iterator<Item = OsString>) -> Result<EncodeArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut verbose = false;

    while let Some(arg) = args.next() {
        let flag = arg.to_string_lossy().into_owned();
        match flag.as_str() {
            "--help" | "-h" => return Err(USAGE_TEXT.to_string()),
            "--verbose" | "-v" => verbose = true,
            "--output" | "-o" => output = Some(option_value(&mut args, &arg)?.into()),
            other if other.starts_with('-') => return Err(format!("unknown option: {other}")),
            _ if input.is_some() => return Err("multiple input paths provided".to_string()),
            _ => input = Some(PathBuf::from(arg)),
        }
    }

    Ok(EncodeArgs {
        input: input.ok_or_else(|| "missing input path".to_string())?,
        output,
        verbose,
    })
}

/// `prog.txt` encodes to `prog.bin` next to it.
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("bin")
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn execute(command: Command) -> Result<(), i32> {
    match command {
        Command::Run(args) => {
            init_logging(args.verbose);
            run_simulation(args)
        }
        Command::Encode(args) => {
            init_logging(args.verbose);
            run_encode(&args).map_err(|error| {
                eprintln!("error: {error}");
                1
            })
        }
    }
}

fn run_simulation(args: RunArgs) -> Result<(), i32> {
    let json = args.json;
    let result = build_config(&args).and_then(|config| {
        simulate(&RunRequest {
            program: args.program,
            data: args.data,
            format: args.format,
            config,
            max_steps: args.max_steps,
        })
    });

    match result {
        Ok(report) => {
            let rendered = if json {
                report.to_json()
            } else {
                Ok(report.to_text())
            };
            print_rendered(rendered)?;
            if report.stop == StopReason::BudgetExhausted {
                Err(EXIT_BUDGET_EXHAUSTED)
            } else {
                Ok(())
            }
        }
        Err(LoadError::Operation { source, state }) => {
            let rendered = if json {
                state_to_json(&state)
            } else {
                Ok(state_to_text(&state))
            };
            print_rendered(rendered)?;
            eprintln!("error: {source}");
            Err(1)
        }
        Err(error) => {
            eprintln!("error: {error}");
            Err(1)
        }
    }
}

fn print_rendered(rendered: Result<String, LoadError>) -> Result<(), i32> {
    match rendered {
        Ok(text) => {
            println!("{}", text.trim_end());
            Ok(())
        }
        Err(error) => {
            eprintln!("error: {error}");
            Err(1)
        }
    }
}

fn build_config(args: &RunArgs) -> Result<MachineConfig, LoadError> {
    let base = match &args.config {
        Some(path) => read_config(path)?,
        None => MachineConfig::default(),
    };
    Ok(args.overrides.apply(base))
}

fn run_encode(args: &EncodeArgs) -> Result<(), LoadError> {
    let source = read_text(&args.input)?;
    let result = assemble(&source).map_err(|source| LoadError::Assemble {
        path: args.input.clone(),
        source,
    })?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    fs::write(&output, &result.binary).map_err(|error| LoadError::io(&output, error))?;

    if args.verbose {
        print_listing(&result);
    }
    println!(
        "{} -> {} ({} words)",
        args.input.display(),
        output.display(),
        result.listing.len()
    );
    Ok(())
}

fn print_listing(result: &AssembleResult) {
    for entry in &result.listing {
        eprintln!("{:4}: {} ; {}", entry.address, entry.word, entry.instruction);
    }
}

fn main() {
    let outcome = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            Ok(())
        }
        Ok(ParseResult::Command(command)) => execute(command),
        Err(usage) if usage == USAGE_TEXT => {
            println!("{usage}");
            Err(1)
        }
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE_TEXT}");
            Err(1)
        }
    };

    std::process::exit(outcome.err().unwrap_or(0));
}
