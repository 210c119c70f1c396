//! Flat 64 KiB memory bus.
//!
//! Every address is an ordinary byte; no device is mapped. The video RAM
//! window is only a named sub-range.

use std::ops::RangeInclusive;

use crate::error::MemoryError;
use crate::logging::{log, LogCategory, LogLevel};

/// Size of the addressable space.
pub const MEMORY_SIZE: usize = 0x10000;

/// Video RAM window (tile and map data).
pub const VRAM: RangeInclusive<u16> = 0x8000..=0x9FFF;

#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("len", &self.bytes.len()).finish()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Zero-filled 64 KiB.
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Take ownership of a caller-supplied buffer. It must cover the whole
    /// address space.
    pub fn from_buffer(buffer: Vec<u8>) -> Result<Self, MemoryError> {
        if buffer.len() != MEMORY_SIZE {
            return Err(MemoryError::InvalidSize {
                expected: MEMORY_SIZE,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            bytes: buffer.into_boxed_slice(),
        })
    }

    /// Copy an image into memory starting at `base`.
    pub fn load(&mut self, base: u16, image: &[u8]) -> Result<(), MemoryError> {
        if image.is_empty() {
            return Err(MemoryError::EmptyImage);
        }
        let start = base as usize;
        let available = MEMORY_SIZE - start;
        if image.len() > available {
            return Err(MemoryError::ImageTooLarge {
                base,
                len: image.len(),
                available,
            });
        }
        self.bytes[start..start + image.len()].copy_from_slice(image);
        log(LogCategory::Bus, LogLevel::Debug, || {
            format!("BUS: loaded {} bytes at {:04X}", image.len(), base)
        });
        Ok(())
    }

    #[inline]
    pub fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    pub fn write_byte(&mut self, addr: u16, val: u8) {
        self.bytes[addr as usize] = val;
    }

    /// Little-endian word: low byte at `addr`, high byte at `addr + 1`
    /// (wrapping at the top of the address space).
    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read_byte(addr) as u16;
        let hi = self.read_byte(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write_word(&mut self, addr: u16, val: u16) {
        self.write_byte(addr, val as u8);
        self.write_byte(addr.wrapping_add(1), (val >> 8) as u8);
    }

    pub fn vram(&self) -> &[u8] {
        &self.bytes[*VRAM.start() as usize..=*VRAM.end() as usize]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}
