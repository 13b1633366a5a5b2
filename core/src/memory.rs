use crate::constants::{FONT_START, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET};
use crate::error::{Fault, LoadError};

/// # Memory
/// 4096 bytes of flat addressable memory.
///
/// ```text
/// 0x000 - 0x1FF  interpreter
///   0x050 - 0x09F  sprite sheet
/// 0x200 - 0xFFF  program and variables
/// ```
///
/// The sprite sheet is installed on construction. Programs are free to
/// overwrite it; some do.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        bytes[font..font + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory { bytes }
    }

    pub fn read(&self, address: usize) -> Result<u8, Fault> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Fault::AddressFault { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Fault> {
        let byte = self
            .bytes
            .get_mut(address)
            .ok_or(Fault::AddressFault { address })?;
        *byte = value;
        Ok(())
    }

    /// Reads the big-endian word at `address`.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn read_word(&self, address: usize) -> Result<u16, Fault> {
        let word = self.read_slice(address, 2)?;
        Ok(u16::from(word[0]) << 8 | u16::from(word[1]))
    }

    /// Borrows `len` bytes starting at `address`; fails on the first address that is out of range
    pub fn read_slice(&self, address: usize, len: usize) -> Result<&[u8], Fault> {
        let end = Self::checked_end(address, len)?;
        Ok(&self.bytes[address..end])
    }

    /// Copies `data` into memory at `address`.
    /// Nothing is written unless every byte fits.
    pub fn write_slice(&mut self, address: usize, data: &[u8]) -> Result<(), Fault> {
        let end = Self::checked_end(address, data.len())?;
        self.bytes[address..end].copy_from_slice(data);
        Ok(())
    }

    /// Copies a ROM into the program region at 0x200
    pub fn load_program(&mut self, rom: &[u8]) -> Result<(), LoadError> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(LoadError::TooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + rom.len()].copy_from_slice(rom);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Rebuilds memory from a full 4096 byte image
    pub(crate) fn from_bytes(image: &[u8]) -> Option<Self> {
        if image.len() != MEMORY_SIZE {
            return None;
        }
        let mut bytes = [0; MEMORY_SIZE];
        bytes.copy_from_slice(image);
        Some(Memory { bytes })
    }

    fn checked_end(address: usize, len: usize) -> Result<usize, Fault> {
        match address.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(end),
            _ => Err(Fault::AddressFault {
                address: address.max(MEMORY_SIZE),
            }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
