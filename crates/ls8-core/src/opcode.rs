//! Opcode table and instruction-byte classification.
//!
//! An instruction byte is laid out as `AABCDDDD`: `AA` is the operand
//! count, `B` marks an ALU-class instruction, `C` marks an instruction
//! that sets the PC itself, and `DDDD` identifies the operation. The
//! opcode table is the single source of truth for decode and any byte
//! absent from it is illegal; the `AA` and `B` fields additionally
//! drive instruction widths and ALU routing.

/// Operand-count field shift (bits 7..6).
const OPERAND_COUNT_SHIFT: u8 = 6;
/// ALU-class flag (bit 5).
const ALU_FLAG: u8 = 0b0010_0000;

/// Instruction opcodes, with discriminants equal to their encoded byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum Opcode {
    /// Halt the machine.
    Hlt = 0b0000_0001,
    /// Pop the return address into the PC.
    Ret = 0b0001_0001,
    /// Push a register's value onto the stack.
    Push = 0b0100_0101,
    /// Pop the top of the stack into a register.
    Pop = 0b0100_0110,
    /// Emit a register's numeric value to the output sink.
    Prn = 0b0100_0111,
    /// Push the return address and jump to the address held in a register.
    Call = 0b0101_0000,
    /// Load an immediate value into a register.
    Ldi = 0b1000_0010,
    /// Add two registers, modulo 256.
    Add = 0b1010_0000,
    /// Multiply two registers, modulo 256.
    Mul = 0b1010_0010,
}

/// Single source-of-truth opcode table. Any byte not present here has no
/// dispatch entry and faults as an unknown instruction.
pub const OPCODE_TABLE: &[(u8, Opcode)] = &[
    (0b0000_0001, Opcode::Hlt),
    (0b0001_0001, Opcode::Ret),
    (0b0100_0101, Opcode::Push),
    (0b0100_0110, Opcode::Pop),
    (0b0100_0111, Opcode::Prn),
    (0b0101_0000, Opcode::Call),
    (0b1000_0010, Opcode::Ldi),
    (0b1010_0000, Opcode::Add),
    (0b1010_0010, Opcode::Mul),
];

impl Opcode {
    /// Returns the opcode for an instruction byte, or `None` when the byte
    /// has no table entry.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find_map(|(encoded, opcode)| (*encoded == byte).then_some(*opcode))
    }

    /// Returns the encoded instruction byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Number of operand bytes following the instruction byte (0..=2).
    ///
    /// The engine derives every non-jump PC advance from this field via
    /// [`Control::advance_past`](crate::Control::advance_past).
    #[must_use]
    pub const fn operand_count(self) -> u8 {
        self.as_byte() >> OPERAND_COUNT_SHIFT
    }

    /// True when the instruction is ALU-class; [`alu::apply`](crate::alu::apply)
    /// rejects any opcode without this flag.
    #[must_use]
    pub const fn is_alu(self) -> bool {
        self.as_byte() & ALU_FLAG != 0
    }

    /// Assembly mnemonic, shown in the trace line.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Hlt => "HLT",
            Self::Ret => "RET",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::Prn => "PRN",
            Self::Call => "CALL",
            Self::Ldi => "LDI",
            Self::Add => "ADD",
            Self::Mul => "MUL",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{Opcode, OPCODE_TABLE};

    #[test]
    fn table_contains_unique_bytes() {
        let bytes: HashSet<_> = OPCODE_TABLE.iter().map(|(byte, _)| *byte).collect();
        assert_eq!(bytes.len(), OPCODE_TABLE.len());
    }

    #[test]
    fn every_table_entry_resolves_via_lookup() {
        for (byte, opcode) in OPCODE_TABLE {
            assert_eq!(Opcode::from_byte(*byte), Some(*opcode));
            assert_eq!(opcode.as_byte(), *byte);
        }
    }

    #[test]
    fn bytes_without_entries_are_illegal() {
        assert_eq!(Opcode::from_byte(0b0000_0000), None);
        assert_eq!(Opcode::from_byte(0b1111_1111), None);
        // SUB's conventional slot is deliberately unwired.
        assert_eq!(Opcode::from_byte(0b1010_0001), None);
    }

    #[test]
    fn operand_counts_match_encoding_field() {
        assert_eq!(Opcode::Hlt.operand_count(), 0);
        assert_eq!(Opcode::Ret.operand_count(), 0);
        assert_eq!(Opcode::Push.operand_count(), 1);
        assert_eq!(Opcode::Pop.operand_count(), 1);
        assert_eq!(Opcode::Prn.operand_count(), 1);
        assert_eq!(Opcode::Call.operand_count(), 1);
        assert_eq!(Opcode::Ldi.operand_count(), 2);
        assert_eq!(Opcode::Add.operand_count(), 2);
        assert_eq!(Opcode::Mul.operand_count(), 2);
    }

    #[test]
    fn alu_flag_marks_only_arithmetic_opcodes() {
        assert!(Opcode::Add.is_alu());
        assert!(Opcode::Mul.is_alu());
        assert!(!Opcode::Ldi.is_alu());
        assert!(!Opcode::Push.is_alu());
    }

    #[test]
    fn mnemonics_match_table_order() {
        let names: Vec<_> = OPCODE_TABLE
            .iter()
            .map(|(_, opcode)| opcode.mnemonic())
            .collect();
        assert_eq!(
            names,
            ["HLT", "RET", "PUSH", "POP", "PRN", "CALL", "LDI", "ADD", "MUL"]
        );
    }

}
