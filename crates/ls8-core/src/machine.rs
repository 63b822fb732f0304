//! Owned machine state: memory, register file, program counter, halt flag.

use std::fmt::Write as _;

use crate::{Fault, GeneralRegister, Memory, Opcode, RegisterFile};

/// Complete mutable state of one LS-8 machine.
///
/// Constructed once per program run; the execution engine borrows it
/// mutably for each step. There is no shared or global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Machine {
    registers: RegisterFile,
    memory: Memory,
    pc: u16,
    halted: bool,
}

impl Machine {
    /// Creates a machine with zeroed memory and registers, `SP = 0xF4`,
    /// and `PC = 0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Mutable view of the register file.
    pub const fn registers_mut(&mut self) -> &mut RegisterFile {
        &mut self.registers
    }

    /// Shared view of memory.
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Mutable view of memory.
    pub const fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// Current program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Sets the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// True once `HLT` has retired.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Latches the halt flag; only `HLT` calls this.
    pub const fn halt(&mut self) {
        self.halted = true;
    }

    /// Writes a program image into memory at sequential addresses
    /// starting from 0.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBoundsAccess`] when the image does not fit
    /// in the 256-byte space.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Fault> {
        for (offset, byte) in image.iter().enumerate() {
            let addr = u16::try_from(offset)
                .map_err(|_| Fault::OutOfBoundsAccess { addr: u16::MAX })?;
            self.memory.write(addr, *byte)?;
        }
        Ok(())
    }

    /// Stack-write primitive: decrements SP and stores `value` at the new
    /// top of stack.
    ///
    /// Both the `PUSH` handler (register contents) and `CALL` (literal
    /// return address) go through here; there is exactly one stack-write
    /// path.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBoundsAccess`] when the stack cell cannot be
    /// written.
    pub fn push_byte(&mut self, value: u8) -> Result<(), Fault> {
        let sp = self.registers.sp().wrapping_sub(1);
        self.registers.set_sp(sp);
        self.memory.write(u16::from(sp), value)
    }

    /// Stack-read primitive: reads the top of stack and increments SP.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBoundsAccess`] when the stack cell cannot be
    /// read.
    pub fn pop_byte(&mut self) -> Result<u8, Fault> {
        let sp = self.registers.sp();
        let value = self.memory.read(u16::from(sp))?;
        self.registers.set_sp(sp.wrapping_add(1));
        Ok(value)
    }

    /// Formats a one-line state dump: PC, the decoded mnemonic at PC, the
    /// three bytes at and after PC, and all eight registers, as two-digit
    /// uppercase hex.
    ///
    /// Bytes past the end of memory render as `00`; a byte with no opcode
    /// table entry renders as `???`.
    #[must_use]
    pub fn trace_line(&self) -> String {
        let current = self.memory.read(self.pc).unwrap_or(0);
        let mnemonic = Opcode::from_byte(current).map_or("???", Opcode::mnemonic);
        let mut line = format!(
            "TRACE: {:02X} {mnemonic:<4} | {current:02X} {:02X} {:02X} |",
            self.pc,
            self.memory.read(self.pc.wrapping_add(1)).unwrap_or(0),
            self.memory.read(self.pc.wrapping_add(2)).unwrap_or(0),
        );

        for reg in GeneralRegister::ALL {
            let _ = write!(line, " {:02X}", self.registers.get(reg));
        }

        line
    }
}
