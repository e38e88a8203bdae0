//! Core register-machine simulator: decoders, validator, register file with
//! LRU cache, memory and the fetch-decode-execute engine.

/// Public host-facing API contract types.
pub mod api;
pub use api::{
    MachineConfig, RunOutcome, Snapshot, StepOutcome, StopReason, DEFAULT_CACHE_CAPACITY,
    DEFAULT_DATA_REGISTERS, DEFAULT_STATUS_REGISTERS,
};

/// Load-time and run-time error taxonomy.
pub mod errors;
pub use errors::{
    OperationError, RangeError, RegisterKind, RegisterOutOfRange, ValidationError,
    ValidationReason,
};

/// Opcode, mnemonic and binary opcode tables.
pub mod encoding;
pub use encoding::{BinaryOpcode, Opcode, BINARY_OPCODE_TABLE, MNEMONIC_TABLE};

/// Canonical decoded instruction form.
pub mod instruction;
pub use instruction::{ArithmeticOp, CompareOp, Instruction, Operand, LITERAL_SENTINEL};

/// Operand count and kind checks shared by both decoders.
pub mod validator;
pub use validator::{validate, RawOperand};

/// Text and binary line decoders.
pub mod decoder;
pub use decoder::{
    decode_binary_line, decode_text_line, encode_binary, EncodeError, BINARY_WORD_LENGTH,
};

/// Program store keyed by instruction address.
pub mod program;
pub use program::{Program, ProgramFormat, ProgramWord};

/// Initial data register file parsing.
pub mod initial_data;
pub use initial_data::{parse_initial_data, InitialDataEntry};

/// Sparse memory shared by program and data words.
pub mod memory;
pub use memory::Memory;

/// Register banks, register cache and run state.
pub mod state;
pub use state::{LruCache, RegisterFile, RunState};

/// Deterministic per-opcode complexity cost table.
pub mod timing;
pub use timing::{complexity_cost, COMPLEXITY_COST_TABLE};

/// Fetch-decode-execute engine.
pub mod execute;
pub use execute::Machine;

#[cfg(test)]
use proptest as _;
