//! Register file, register cache and run-state primitives.

/// LRU cache of data register values.
pub mod cache;
/// Data/status register banks behind the write-through cache.
pub mod registers;
mod run_state;

pub use cache::LruCache;
pub use registers::RegisterFile;
pub use run_state::RunState;
