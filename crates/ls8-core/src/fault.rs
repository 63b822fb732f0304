use thiserror::Error;

/// Non-recoverable machine faults.
///
/// Every fault aborts the containing [`run`](crate::run) or
/// [`step`](crate::step) call; there is no retry or resumption path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Fault {
    /// Memory access targeted an address outside the 256-byte space.
    #[error("memory access out of bounds at address {addr:#06X}")]
    OutOfBoundsAccess {
        /// Offending address.
        addr: u16,
    },
    /// Fetched byte has no entry in the opcode table.
    #[error("unknown instruction {opcode:#010b} at PC {pc:#04X}")]
    UnknownInstruction {
        /// Raw opcode byte fetched from memory.
        opcode: u8,
        /// Program counter at the time of the fetch.
        pc: u16,
    },
    /// ALU was handed an opcode it has no operation for.
    #[error("unsupported ALU operation {opcode:#010b}")]
    UnsupportedOperation {
        /// Raw opcode byte routed to the ALU.
        opcode: u8,
    },
    /// Register operand byte does not name one of `R0..R7`.
    #[error("invalid register index {index} at PC {pc:#04X}")]
    InvalidRegister {
        /// Operand byte that failed to decode.
        index: u8,
        /// Program counter of the instruction that carried the operand.
        pc: u16,
    },
    /// Run exceeded the configured step budget without reaching `HLT`.
    #[error("step budget of {budget} instructions exhausted")]
    StepBudgetExhausted {
        /// Configured maximum number of retired instructions.
        budget: u64,
    },
}
