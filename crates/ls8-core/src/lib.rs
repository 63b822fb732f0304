//! Core machine model for the LS-8 virtual machine.
//!
//! The crate is a library: loading a program image, stepping the
//! fetch-decode-execute loop, and reading back state are all caller
//! driven, and every detectable invariant violation surfaces as a
//! [`Fault`] instead of terminating the process.

/// Fixed 256-byte memory model.
pub mod memory;
pub use memory::{Memory, MEMORY_SIZE};

/// Register file and register identifiers.
pub mod registers;
pub use registers::{
    GeneralRegister, RegisterFile, GENERAL_REGISTER_COUNT, STACK_POINTER_INIT,
};

/// Opcode table and instruction-byte classification.
pub mod opcode;
pub use opcode::{Opcode, OPCODE_TABLE};

/// Narrow arithmetic/logic dispatch.
pub mod alu;

/// Fault taxonomy for machine execution.
pub mod fault;
pub use fault::Fault;

/// Owned machine state bundle.
pub mod machine;
pub use machine::Machine;

/// Host collaborator seams for `PRN` output and tracing.
pub mod output;
pub use output::{CapturedOutput, OutputSink, TraceSink};

/// Fetch-decode-execute engine.
pub mod execute;
pub use execute::{run, run_traced, step, Control, RunConfig, RunOutcome, StepOutcome};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
