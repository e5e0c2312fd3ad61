//! Memory model for the RV32I emulator.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::{EmulatorError, MemoryAccessKind};

/// Default capacity of the flat address space, in bytes.
pub const MEMORY_SPACE: u32 = 0x0010_0000;

/// A flat, zero-initialized, byte-addressable arena.
///
/// Multi-byte values are stored little-endian. Every access is
/// bounds-checked against the arena capacity; a failed store does not
/// modify any bytes.
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Create a zeroed arena of the given capacity in bytes.
    pub fn new(capacity: u32) -> Self {
        Self {
            bytes: vec![0; capacity as usize],
        }
    }

    /// Create a zeroed arena of `MEMORY_SPACE` bytes.
    pub fn with_default_capacity() -> Self {
        Self::new(MEMORY_SPACE)
    }

    /// Capacity of the arena in bytes.
    pub fn capacity(&self) -> u32 {
        self.bytes.len() as u32
    }

    /// Bounds-check an access of `size` bytes at `address`, returning the
    /// byte offset. The PC field of the error is filled in by the caller.
    fn check(&self, address: u32, size: u32, kind: MemoryAccessKind) -> Result<usize, EmulatorError> {
        let end = address as u64 + size as u64;
        if end > self.bytes.len() as u64 {
            return Err(EmulatorError::InvalidMemoryAccess {
                address,
                size,
                kind,
                pc: 0,
            });
        }
        Ok(address as usize)
    }

    /// Load a single byte.
    pub fn load_byte(&self, address: u32) -> Result<u8, EmulatorError> {
        let offset = self.check(address, 1, MemoryAccessKind::Read)?;
        Ok(self.bytes[offset])
    }

    /// Load a 16-bit little-endian halfword.
    pub fn load_half(&self, address: u32) -> Result<u16, EmulatorError> {
        let offset = self.check(address, 2, MemoryAccessKind::Read)?;
        Ok(u16::from_le_bytes([
            self.bytes[offset],
            self.bytes[offset + 1],
        ]))
    }

    /// Load a 32-bit little-endian word.
    pub fn load_word(&self, address: u32) -> Result<u32, EmulatorError> {
        let offset = self.check(address, 4, MemoryAccessKind::Read)?;
        Ok(u32::from_le_bytes([
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
            self.bytes[offset + 3],
        ]))
    }

    /// Store a single byte.
    pub fn store_byte(&mut self, address: u32, value: u8) -> Result<(), EmulatorError> {
        let offset = self.check(address, 1, MemoryAccessKind::Write)?;
        self.bytes[offset] = value;
        Ok(())
    }

    /// Store a 16-bit halfword little-endian.
    pub fn store_half(&mut self, address: u32, value: u16) -> Result<(), EmulatorError> {
        let offset = self.check(address, 2, MemoryAccessKind::Write)?;
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Store a 32-bit word little-endian.
    pub fn store_word(&mut self, address: u32, value: u32) -> Result<(), EmulatorError> {
        let offset = self.check(address, 4, MemoryAccessKind::Write)?;
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Read a 32-bit instruction word.
    pub fn fetch_instruction(&self, address: u32) -> Result<u32, EmulatorError> {
        let offset = self.check(address, 4, MemoryAccessKind::InstructionFetch)?;
        Ok(u32::from_le_bytes([
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
            self.bytes[offset + 3],
        ]))
    }

    /// Get a reference to the underlying bytes (for inspection).
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_initialized() {
        let mem = Memory::new(64);
        assert_eq!(mem.load_word(0).unwrap(), 0);
        assert_eq!(mem.load_byte(63).unwrap(), 0);
    }

    #[test]
    fn test_round_trip_all_widths() {
        let mut mem = Memory::new(64);
        mem.store_byte(0, 0xab).unwrap();
        assert_eq!(mem.load_byte(0).unwrap(), 0xab);
        mem.store_half(2, 0xbeef).unwrap();
        assert_eq!(mem.load_half(2).unwrap(), 0xbeef);
        mem.store_word(4, 0xdeadbeef).unwrap();
        assert_eq!(mem.load_word(4).unwrap(), 0xdeadbeef);
    }

    #[test]
    fn test_little_endian_layout() {
        let mut mem = Memory::new(8);
        mem.store_word(0, 0x12345678).unwrap();
        assert_eq!(mem.load_byte(0).unwrap(), 0x78);
        assert_eq!(mem.load_byte(1).unwrap(), 0x56);
        assert_eq!(mem.load_byte(2).unwrap(), 0x34);
        assert_eq!(mem.load_byte(3).unwrap(), 0x12);
        assert_eq!(mem.load_half(0).unwrap(), 0x5678);
    }

    #[test]
    fn test_out_of_bounds_read() {
        let mem = Memory::new(8);
        match mem.load_word(6) {
            Err(EmulatorError::InvalidMemoryAccess {
                address,
                size,
                kind,
                ..
            }) => {
                assert_eq!(address, 6);
                assert_eq!(size, 4);
                assert_eq!(kind, MemoryAccessKind::Read);
            }
            other => panic!("expected InvalidMemoryAccess, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_bounds_write_leaves_memory_untouched() {
        let mut mem = Memory::new(8);
        assert!(mem.store_word(6, 0xffffffff).is_err());
        assert_eq!(mem.load_word(4).unwrap(), 0);
    }

    #[test]
    fn test_access_at_exact_capacity_boundary() {
        let mut mem = Memory::new(8);
        assert!(mem.store_word(4, 1).is_ok());
        assert!(mem.store_word(5, 1).is_err());
        assert!(mem.load_byte(7).is_ok());
        assert!(mem.load_byte(8).is_err());
    }

    #[test]
    fn test_address_overflow_rejected() {
        let mem = Memory::new(64);
        assert!(mem.load_word(u32::MAX).is_err());
        assert!(mem.load_word(u32::MAX - 3).is_err());
    }

    #[test]
    fn test_fetch_instruction_kind() {
        let mem = Memory::new(4);
        match mem.fetch_instruction(4) {
            Err(EmulatorError::InvalidMemoryAccess { kind, .. }) => {
                assert_eq!(kind, MemoryAccessKind::InstructionFetch);
            }
            other => panic!("expected InvalidMemoryAccess, got {:?}", other),
        }
    }
}
