pub mod phdr32;
pub mod phdr64;

use crate::error::{PhdrError, Result};

// ─── Identification bytes ───────────────────────────────────────────────────

/// `EI_CLASS` value for 32-bit objects.
pub const ELFCLASS32: u8 = 1;

/// `EI_CLASS` value for 64-bit objects.
pub const ELFCLASS64: u8 = 2;

// ─── Segment type constants (p_type) ────────────────────────────────────────

pub const PT_NULL: u32 = 0;
pub const PT_LOAD: u32 = 1;
pub const PT_DYNAMIC: u32 = 2;
pub const PT_INTERP: u32 = 3;
pub const PT_NOTE: u32 = 4;
pub const PT_SHLIB: u32 = 5;
pub const PT_PHDR: u32 = 6;
pub const PT_TLS: u32 = 7;

// ─── Segment permission flags (p_flags) ─────────────────────────────────────

pub const PF_X: u32 = 0x1;
pub const PF_W: u32 = 0x2;
pub const PF_R: u32 = 0x4;

// Class enum

/// Word-size class of an ELF object.
///
/// Selects which program header layout is active; fixed at table
/// construction and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Elf32,
    Elf64,
}

impl Class {
    /// Map the `EI_CLASS` identification byte to a class.
    pub fn from_ident(byte: u8) -> Result<Class> {
        match byte {
            ELFCLASS32 => Ok(Class::Elf32),
            ELFCLASS64 => Ok(Class::Elf64),
            other => Err(PhdrError::UnsupportedClass(other)),
        }
    }

    /// On-disk size of one program header entry for this class.
    pub fn phdr_size(self) -> usize {
        match self {
            Class::Elf32 => phdr32::Phdr32::SIZE,
            Class::Elf64 => phdr64::Phdr64::SIZE,
        }
    }
}

// Shared little-endian reading/writing helpers for all layout modules
#[inline]
pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[inline]
pub(crate) fn read_u64_le(data: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&data[offset..offset + 8]);
    u64::from_le_bytes(bytes)
}

#[inline]
pub(crate) fn write_u32_le(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[inline]
pub(crate) fn write_u64_le(data: &mut [u8], offset: usize, value: u64) {
    data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}
