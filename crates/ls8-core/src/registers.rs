/// Number of general-purpose registers (`R0..R7`).
pub const GENERAL_REGISTER_COUNT: usize = 8;

/// Initial stack pointer value: the stack grows downward from here, leaving
/// the cells above it reserved.
pub const STACK_POINTER_INIT: u8 = 0xF4;

/// General-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum GeneralRegister {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl GeneralRegister {
    /// Register reserved as the stack pointer.
    pub const SP: Self = Self::R7;

    /// Ordered list of all general-purpose registers.
    pub const ALL: [Self; GENERAL_REGISTER_COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    /// Returns the array index for this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a register operand byte into a register identifier.
    #[must_use]
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.get(usize::from(byte)).copied()
    }
}

/// The 8-slot register file. Words are 8 bits wide; arithmetic on register
/// contents wraps modulo 256.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    slots: [u8; GENERAL_REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        let mut slots = [0; GENERAL_REGISTER_COUNT];
        slots[GeneralRegister::SP.index()] = STACK_POINTER_INIT;
        Self { slots }
    }
}

impl RegisterFile {
    /// Reads a general-purpose register.
    #[must_use]
    pub const fn get(&self, reg: GeneralRegister) -> u8 {
        self.slots[reg.index()]
    }

    /// Writes a general-purpose register.
    pub const fn set(&mut self, reg: GeneralRegister, value: u8) {
        self.slots[reg.index()] = value;
    }

    /// Reads the stack pointer (`R7`).
    #[must_use]
    pub const fn sp(&self) -> u8 {
        self.get(GeneralRegister::SP)
    }

    /// Writes the stack pointer (`R7`).
    pub const fn set_sp(&mut self, value: u8) {
        self.set(GeneralRegister::SP, value);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        GeneralRegister, RegisterFile, GENERAL_REGISTER_COUNT, STACK_POINTER_INIT,
    };

    #[test]
    fn register_count_and_decode_match_architecture() {
        assert_eq!(GENERAL_REGISTER_COUNT, 8);

        for byte in 0_u8..=7 {
            let reg = GeneralRegister::from_byte(byte).expect("valid register operand");
            assert_eq!(reg.index(), usize::from(byte));
        }

        assert!(GeneralRegister::from_byte(8).is_none());
        assert!(GeneralRegister::from_byte(0xFF).is_none());
    }

    #[test]
    fn registers_start_zeroed_except_stack_pointer() {
        let file = RegisterFile::default();

        for reg in GeneralRegister::ALL {
            if reg == GeneralRegister::SP {
                assert_eq!(file.get(reg), STACK_POINTER_INIT);
            } else {
                assert_eq!(file.get(reg), 0);
            }
        }
    }

    #[test]
    fn register_file_tracks_each_slot_independently() {
        let mut file = RegisterFile::default();

        for (offset, reg) in (0_u8..).zip(GeneralRegister::ALL.iter().copied()) {
            file.set(reg, 0x10 + offset);
        }

        for (offset, reg) in (0_u8..).zip(GeneralRegister::ALL.iter().copied()) {
            assert_eq!(file.get(reg), 0x10 + offset);
        }
    }

    #[test]
    fn stack_pointer_aliases_r7() {
        let mut file = RegisterFile::default();
        assert_eq!(file.sp(), STACK_POINTER_INIT);

        file.set_sp(0xE0);
        assert_eq!(file.get(GeneralRegister::R7), 0xE0);

        file.set(GeneralRegister::R7, 0xD0);
        assert_eq!(file.sp(), 0xD0);
    }
}
