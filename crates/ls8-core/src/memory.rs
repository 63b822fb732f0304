use crate::Fault;

/// Size in bytes of the flat machine address space.
pub const MEMORY_SIZE: usize = 256;

/// Fixed 256-byte addressable store, zero-initialized at construction.
///
/// Addresses are carried as `u16` so that an access past the last cell is
/// representable and trapped, instead of silently wrapping into live state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    cells: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            cells: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }
}

impl Memory {
    /// Reads the byte stored at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBoundsAccess`] when `addr` is outside the
    /// 256-byte space.
    pub fn read(&self, addr: u16) -> Result<u8, Fault> {
        self.cells
            .get(usize::from(addr))
            .copied()
            .ok_or(Fault::OutOfBoundsAccess { addr })
    }

    /// Writes `value` at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::OutOfBoundsAccess`] when `addr` is outside the
    /// 256-byte space.
    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), Fault> {
        let cell = self
            .cells
            .get_mut(usize::from(addr))
            .ok_or(Fault::OutOfBoundsAccess { addr })?;
        *cell = value;
        Ok(())
    }
}
