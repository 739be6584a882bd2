#![allow(dead_code)]

use super::{read_u32_le, write_u32_le};
use crate::error::{PhdrError, Result};

/// One ELF32 program header entry.
///
/// Field order and widths follow the ELF32 on-disk record exactly:
/// every field is 32 bits and `p_flags` sits near the end, after the
/// size fields. 32 bytes on disk.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Phdr32 {
    pub p_type: u32,
    pub p_offset: u32,
    pub p_vaddr: u32,
    pub p_paddr: u32,
    pub p_filesz: u32,
    pub p_memsz: u32,
    pub p_flags: u32,
    pub p_align: u32,
}

impl Phdr32 {
    /// On-disk record size in bytes.
    pub const SIZE: usize = 32;

    /// Parse one entry from raw little-endian bytes.
    pub fn parse(raw: &[u8]) -> Result<Phdr32> {
        if raw.len() < Self::SIZE {
            return Err(PhdrError::BufferTooShort {
                needed: Self::SIZE as u64,
                len: raw.len(),
            });
        }

        Ok(Phdr32 {
            p_type: read_u32_le(raw, 0x00),
            p_offset: read_u32_le(raw, 0x04),
            p_vaddr: read_u32_le(raw, 0x08),
            p_paddr: read_u32_le(raw, 0x0C),
            p_filesz: read_u32_le(raw, 0x10),
            p_memsz: read_u32_le(raw, 0x14),
            p_flags: read_u32_le(raw, 0x18),
            p_align: read_u32_le(raw, 0x1C),
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
        write_u32_le(out, 0x04, self.p_offset);
        write_u32_le(out, 0x08, self.p_vaddr);
        write_u32_le(out, 0x0C, self.p_paddr);
        write_u32_le(out, 0x10, self.p_filesz);
        write_u32_le(out, 0x14, self.p_memsz);
        write_u32_le(out, 0x18, self.p_flags);
        write_u32_le(out, 0x1C, self.p_align);
        Ok(())
    }
}
