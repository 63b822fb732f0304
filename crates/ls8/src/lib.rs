//! Program loader for the LS-8 virtual machine.
//!
//! The core consumes only a sequence of decoded bytes; everything about
//! reading and parsing the textual `.ls8` format lives here.

/// Textual `.ls8` program format parsing.
pub mod loader;
pub use loader::{parse_program, LoadError};

#[cfg(test)]
use tempfile as _;
