//! Arithmetic/logic unit.
//!
//! All ALU-class instructions funnel through [`apply`] so that numeric
//! semantics live in one place; wiring a new operation (SUB, AND, OR,
//! XOR) is a new match arm here plus an opcode-table entry, not a new
//! top-level handler.

use crate::{Fault, Opcode};

/// Applies an ALU-class opcode to two register values, wrapping modulo
/// 256.
///
/// # Errors
///
/// Returns [`Fault::UnsupportedOperation`] when `opcode` is not
/// ALU-class per its encoding flag, or is ALU-class but has no wired
/// operation.
pub const fn apply(opcode: Opcode, a: u8, b: u8) -> Result<u8, Fault> {
    if !opcode.is_alu() {
        return Err(Fault::UnsupportedOperation {
            opcode: opcode.as_byte(),
        });
    }

    match opcode {
        Opcode::Add => Ok(a.wrapping_add(b)),
        Opcode::Mul => Ok(a.wrapping_mul(b)),
        _ => Err(Fault::UnsupportedOperation {
            opcode: opcode.as_byte(),
        }),
    }
}
