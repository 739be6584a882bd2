#![allow(dead_code)]

use super::{read_u32_le, read_u64_le, write_u32_le, write_u64_le};
use crate::error::{PhdrError, Result};

/// One ELF64 program header entry.
///
/// Same logical fields as [`Phdr32`](crate::layout::phdr32::Phdr32), but
/// `p_flags` moves up to the second slot and the offset/address/size
/// fields widen to 64 bits. 56 bytes on disk.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Phdr64 {
    pub p_type: u32,
    pub p_flags: u32,
    pub p_offset: u64,
    pub p_vaddr: u64,
    pub p_paddr: u64,
    pub p_filesz: u64,
    pub p_memsz: u64,
    pub p_align: u64,
}

impl Phdr64 {
    /// On-disk record size in bytes.
    pub const SIZE: usize = 56;

    /// Parse one entry from raw little-endian bytes.
    pub fn parse(raw: &[u8]) -> Result<Phdr64> {
        if raw.len() < Self::SIZE {
            return Err(PhdrError::BufferTooShort {
                needed: Self::SIZE as u64,
                len: raw.len(),
            });
        }

        Ok(Phdr64 {
            p_type: read_u32_le(raw, 0x00),
            p_flags: read_u32_le(raw, 0x04),
            p_offset: read_u64_le(raw, 0x08),
            p_vaddr: read_u64_le(raw, 0x10),
            p_paddr: read_u64_le(raw, 0x18),
            p_filesz: read_u64_le(raw, 0x20),
            p_memsz: read_u64_le(raw, 0x28),
            p_align: read_u64_le(raw, 0x30),
        })
    }

    /// Write this entry into `out` as raw little-endian bytes.
    pub fn write_to(&self, out: &mut [u8]) -> Result<()> {
        if out.len() < Self::SIZE {
            return Err(PhdrError::BufferTooShort {
                needed: Self::SIZE as u64,
                len: out.len(),
            });
        }

        write_u32_le(out, 0x00, self.p_type);
        write_u32_le(out, 0x04, self.p_flags);
        write_u64_le(out, 0x08, self.p_offset);
        write_u64_le(out, 0x10, self.p_vaddr);
        write_u64_le(out, 0x18, self.p_paddr);
        write_u64_le(out, 0x20, self.p_filesz);
        write_u64_le(out, 0x28, self.p_memsz);
        write_u64_le(out, 0x30, self.p_align);
        Ok(())
    }
}
