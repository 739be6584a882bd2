use alloc::format;
use alloc::string::String;

use crate::error::{PhdrError, Result};
use crate::layout::Class;
use crate::layout::phdr32::Phdr32;
use crate::layout::phdr64::Phdr64;

/// The two on-disk layouts the table can sit over. One variant per class;
/// the active variant is fixed at construction.
enum Entries<'a> {
    Elf32(&'a mut [Phdr32]),
    Elf64(&'a mut [Phdr64]),
}

/// Logical program header fields, shared by both classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Type,
    Offset,
    Vaddr,
    Paddr,
    Filesz,
    Memsz,
    Flags,
    Align,
}

/// Word-size-agnostic, bounds-checked view over a program header array.
///
/// The table borrows the caller's entry array and never owns, frees, or
/// reallocates it. The entry count is explicit and checked on every
/// access; reads and writes only ever touch `entries[..count]`.
///
/// Values surface at the widest native width across classes: `u64` for
/// offset/address/size/align, `u32` for type and flags (32-bit in both
/// layouts). Writing a value that does not fit the active class's field
/// fails with [`PhdrError::ValueOverflow`] instead of truncating.
pub struct PhdrTable<'a> {
    entries: Entries<'a>,
    count: usize,
}

impl<'a> PhdrTable<'a> {
    /// Build a 32-bit class table over `entries`, exposing the first
    /// `count` of them.
    pub fn new32(entries: &'a mut [Phdr32], count: usize) -> Result<PhdrTable<'a>> {
        Self::check_backing(entries.len(), count)?;
        Ok(PhdrTable {
            entries: Entries::Elf32(entries),
            count,
        })
    }

    /// Build a 64-bit class table over `entries`, exposing the first
    /// `count` of them.
    pub fn new64(entries: &'a mut [Phdr64], count: usize) -> Result<PhdrTable<'a>> {
        Self::check_backing(entries.len(), count)?;
        Ok(PhdrTable {
            entries: Entries::Elf64(entries),
            count,
        })
    }

    /// The caller-supplied count must never authorize reads past the
    /// borrowed memory.
    fn check_backing(len: usize, count: usize) -> Result<()> {
        if len == 0 || count == 0 {
            return Err(PhdrError::NullTable);
        }
        if count > len {
            return Err(PhdrError::OutOfBounds { index: count, count: len });
        }
        Ok(())
    }

    /// Active word-size class.
    pub fn class(&self) -> Class {
        match self.entries {
            Entries::Elf32(_) => Class::Elf32,
            Entries::Elf64(_) => Class::Elf64,
        }
    }

    /// Number of addressable entries.
    pub fn count(&self) -> usize {
        self.count
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.count {
            return Err(PhdrError::OutOfBounds {
                index,
                count: self.count,
            });
        }
        Ok(())
    }

    /// Single read dispatch point: every getter funnels through here so
    /// bounds checking and width handling live in one place.
    fn get(&self, index: usize, field: Field) -> Result<u64> {
        self.check_index(index)?;

        let value = match &self.entries {
            Entries::Elf32(entries) => {
                let phdr = &entries[index];
                let v = match field {
                    Field::Type => phdr.p_type,
                    Field::Offset => phdr.p_offset,
                    Field::Vaddr => phdr.p_vaddr,
                    Field::Paddr => phdr.p_paddr,
                    Field::Filesz => phdr.p_filesz,
                    Field::Memsz => phdr.p_memsz,
                    Field::Flags => phdr.p_flags,
                    Field::Align => phdr.p_align,
                };
                v as u64
            }
            Entries::Elf64(entries) => {
                let phdr = &entries[index];
                match field {
                    Field::Type => phdr.p_type as u64,
                    Field::Offset => phdr.p_offset,
                    Field::Vaddr => phdr.p_vaddr,
                    Field::Paddr => phdr.p_paddr,
                    Field::Filesz => phdr.p_filesz,
                    Field::Memsz => phdr.p_memsz,
                    Field::Flags => phdr.p_flags as u64,
                    Field::Align => phdr.p_align,
                }
            }
        };

        Ok(value)
    }

    /// Single write dispatch point, mirroring [`PhdrTable::get`]. Narrows
    /// to the native field width and refuses lossy stores.
    fn set(&mut self, index: usize, field: Field, value: u64) -> Result<()> {
        self.check_index(index)?;

        let overflow = PhdrError::ValueOverflow { index, value };

        match &mut self.entries {
            Entries::Elf32(entries) => {
                // Every ELF32 field is 32 bits wide.
                let narrowed = u32::try_from(value).map_err(|_| overflow)?;
                let phdr = &mut entries[index];
                match field {
                    Field::Type => phdr.p_type = narrowed,
                    Field::Offset => phdr.p_offset = narrowed,
                    Field::Vaddr => phdr.p_vaddr = narrowed,
                    Field::Paddr => phdr.p_paddr = narrowed,
                    Field::Filesz => phdr.p_filesz = narrowed,
                    Field::Memsz => phdr.p_memsz = narrowed,
                    Field::Flags => phdr.p_flags = narrowed,
                    Field::Align => phdr.p_align = narrowed,
                }
            }
            Entries::Elf64(entries) => {
                let phdr = &mut entries[index];
                match field {
                    // type and flags stay 32-bit even in ELF64
                    Field::Type => phdr.p_type = u32::try_from(value).map_err(|_| overflow)?,
                    Field::Flags => phdr.p_flags = u32::try_from(value).map_err(|_| overflow)?,
                    Field::Offset => phdr.p_offset = value,
                    Field::Vaddr => phdr.p_vaddr = value,
                    Field::Paddr => phdr.p_paddr = value,
                    Field::Filesz => phdr.p_filesz = value,
                    Field::Memsz => phdr.p_memsz = value,
                    Field::Align => phdr.p_align = value,
                }
            }
        }

        log::trace!("phdr[{index}] {field:?} = {value:#x}");
        Ok(())
    }

    // Per-field getters

    /// Segment type (`p_type`) of entry `index`.
    pub fn p_type(&self, index: usize) -> Result<u32> {
        Ok(self.get(index, Field::Type)? as u32)
    }

    /// File offset (`p_offset`) of entry `index`.
    pub fn p_offset(&self, index: usize) -> Result<u64> {
        self.get(index, Field::Offset)
    }

    /// Virtual load address (`p_vaddr`) of entry `index`.
    pub fn p_vaddr(&self, index: usize) -> Result<u64> {
        self.get(index, Field::Vaddr)
    }

    /// Physical load address (`p_paddr`) of entry `index`.
    pub fn p_paddr(&self, index: usize) -> Result<u64> {
        self.get(index, Field::Paddr)
    }

    /// On-file size (`p_filesz`) of entry `index`.
    pub fn p_filesz(&self, index: usize) -> Result<u64> {
        self.get(index, Field::Filesz)
    }

    /// In-memory size (`p_memsz`) of entry `index`.
    pub fn p_memsz(&self, index: usize) -> Result<u64> {
        self.get(index, Field::Memsz)
    }

    /// Permission flags (`p_flags`) of entry `index`.
    pub fn p_flags(&self, index: usize) -> Result<u32> {
        Ok(self.get(index, Field::Flags)? as u32)
    }

    /// Alignment constraint (`p_align`) of entry `index`.
    pub fn p_align(&self, index: usize) -> Result<u64> {
        self.get(index, Field::Align)
    }

    // Per-field setters

    /// Store a new segment type into entry `index`.
    pub fn set_p_type(&mut self, index: usize, value: u32) -> Result<()> {
        self.set(index, Field::Type, value as u64)
    }

    /// Store a new file offset into entry `index`.
    pub fn set_p_offset(&mut self, index: usize, value: u64) -> Result<()> {
        self.set(index, Field::Offset, value)
    }

    /// Store a new virtual address into entry `index`.
    pub fn set_p_vaddr(&mut self, index: usize, value: u64) -> Result<()> {
        self.set(index, Field::Vaddr, value)
    }

    /// Store a new physical address into entry `index`.
    pub fn set_p_paddr(&mut self, index: usize, value: u64) -> Result<()> {
        self.set(index, Field::Paddr, value)
    }

    /// Store a new on-file size into entry `index`.
    pub fn set_p_filesz(&mut self, index: usize, value: u64) -> Result<()> {
        self.set(index, Field::Filesz, value)
    }

    /// Store a new in-memory size into entry `index`.
    pub fn set_p_memsz(&mut self, index: usize, value: u64) -> Result<()> {
        self.set(index, Field::Memsz, value)
    }

    /// Store new permission flags into entry `index`.
    pub fn set_p_flags(&mut self, index: usize, value: u32) -> Result<()> {
        self.set(index, Field::Flags, value as u64)
    }

    /// Store a new alignment constraint into entry `index`.
    pub fn set_p_align(&mut self, index: usize, value: u64) -> Result<()> {
        self.set(index, Field::Align, value)
    }

    /// Render one entry's fields for inspection.
    ///
    /// The class always comes from the table's own tag, so the bytes are
    /// never interpreted under a guessed layout.
    pub fn dump(&self, index: usize) -> Result<String> {
        Ok(format!(
            "{:?} phdr[{}]: type={:#x} flags={:#x} offset={:#x} vaddr={:#x} \
             paddr={:#x} filesz={:#x} memsz={:#x} align={:#x}",
            self.class(),
            index,
            self.p_type(index)?,
            self.p_flags(index)?,
            self.p_offset(index)?,
            self.p_vaddr(index)?,
            self.p_paddr(index)?,
            self.p_filesz(index)?,
            self.p_memsz(index)?,
            self.p_align(index)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::PhdrTable;
    use crate::error::PhdrError;
    use crate::layout::phdr32::Phdr32;
    use crate::layout::phdr64::Phdr64;
    use crate::layout::{Class, PF_R, PF_X, PT_LOAD};

    fn entries32() -> [Phdr32; 3] {
        [Phdr32::default(); 3]
    }

    fn entries64() -> [Phdr64; 3] {
        [Phdr64::default(); 3]
    }

    #[test]
    fn test_construction_rejects_empty_backing() {
        let mut none: [Phdr32; 0] = [];
        assert_eq!(
            PhdrTable::new32(&mut none, 0).err(),
            Some(PhdrError::NullTable)
        );

        let mut some = entries32();
        assert_eq!(
            PhdrTable::new32(&mut some, 0).err(),
            Some(PhdrError::NullTable)
        );
    }

    #[test]
    fn test_construction_rejects_count_past_backing() {
        let mut entries = entries64();
        assert_eq!(
            PhdrTable::new64(&mut entries, 4).err(),
            Some(PhdrError::OutOfBounds { index: 4, count: 3 })
        );
    }

    #[test]
    fn test_class_and_count() {
        let mut entries = entries64();
        let table = PhdrTable::new64(&mut entries, 2).unwrap();
        assert_eq!(table.class(), Class::Elf64);
        assert_eq!(table.count(), 2);
    }

    #[test]
    fn test_round_trip_all_fields_elf64() {
        let mut entries = entries64();
        let mut table = PhdrTable::new64(&mut entries, 3).unwrap();

        table.set_p_type(1, PT_LOAD).unwrap();
        table.set_p_offset(1, 0x1_0000_1000).unwrap();
        table.set_p_vaddr(1, 0xFFFF_8000_0000_0000).unwrap();
        table.set_p_paddr(1, 0x4000_0000).unwrap();
        table.set_p_filesz(1, 0x2_0000_0000).unwrap();
        table.set_p_memsz(1, 0x2_0000_1000).unwrap();
        table.set_p_flags(1, PF_R | PF_X).unwrap();
        table.set_p_align(1, 0x20_0000).unwrap();

        assert_eq!(table.p_type(1).unwrap(), PT_LOAD);
        assert_eq!(table.p_offset(1).unwrap(), 0x1_0000_1000);
        assert_eq!(table.p_vaddr(1).unwrap(), 0xFFFF_8000_0000_0000);
        assert_eq!(table.p_paddr(1).unwrap(), 0x4000_0000);
        assert_eq!(table.p_filesz(1).unwrap(), 0x2_0000_0000);
        assert_eq!(table.p_memsz(1).unwrap(), 0x2_0000_1000);
        assert_eq!(table.p_flags(1).unwrap(), PF_R | PF_X);
        assert_eq!(table.p_align(1).unwrap(), 0x20_0000);
    }

    #[test]
    fn test_round_trip_all_fields_elf32() {
        let mut entries = entries32();
        let mut table = PhdrTable::new32(&mut entries, 3).unwrap();

        table.set_p_type(0, PT_LOAD).unwrap();
        table.set_p_offset(0, 0x1000).unwrap();
        table.set_p_vaddr(0, 0x0804_8000).unwrap();
        table.set_p_paddr(0, 0x0804_8000).unwrap();
        table.set_p_filesz(0, 0x200).unwrap();
        table.set_p_memsz(0, 0x300).unwrap();
        table.set_p_flags(0, PF_R).unwrap();
        table.set_p_align(0, 0x1000).unwrap();

        assert_eq!(table.p_type(0).unwrap(), PT_LOAD);
        assert_eq!(table.p_offset(0).unwrap(), 0x1000);
        assert_eq!(table.p_vaddr(0).unwrap(), 0x0804_8000);
        assert_eq!(table.p_paddr(0).unwrap(), 0x0804_8000);
        assert_eq!(table.p_filesz(0).unwrap(), 0x200);
        assert_eq!(table.p_memsz(0).unwrap(), 0x300);
        assert_eq!(table.p_flags(0).unwrap(), PF_R);
        assert_eq!(table.p_align(0).unwrap(), 0x1000);
    }

    #[test]
    fn test_out_of_bounds_getters_and_setters() {
        let mut entries = entries32();
        let mut table = PhdrTable::new32(&mut entries, 2).unwrap();
        let oob = PhdrError::OutOfBounds { index: 2, count: 2 };

        assert_eq!(table.p_type(2), Err(oob));
        assert_eq!(table.p_offset(2), Err(oob));
        assert_eq!(table.p_vaddr(2), Err(oob));
        assert_eq!(table.p_paddr(2), Err(oob));
        assert_eq!(table.p_filesz(2), Err(oob));
        assert_eq!(table.p_memsz(2), Err(oob));
        assert_eq!(table.p_flags(2), Err(oob));
        assert_eq!(table.p_align(2), Err(oob));

        assert_eq!(table.set_p_type(2, 1), Err(oob));
        assert_eq!(table.set_p_offset(2, 1), Err(oob));
        assert_eq!(table.set_p_vaddr(2, 1), Err(oob));
        assert_eq!(table.set_p_paddr(2, 1), Err(oob));
        assert_eq!(table.set_p_filesz(2, 1), Err(oob));
        assert_eq!(table.set_p_memsz(2, 1), Err(oob));
        assert_eq!(table.set_p_flags(2, 1), Err(oob));
        assert_eq!(table.set_p_align(2, 1), Err(oob));

        // Entry 2 exists in the backing array but sits past the count;
        // the failed setters must not have touched it.
        drop(table);
        assert_eq!(entries[2], Phdr32::default());
    }

    #[test]
    fn test_value_overflow_on_elf32_leaves_field_unchanged() {
        let mut entries = entries32();
        let mut table = PhdrTable::new32(&mut entries, 3).unwrap();

        table.set_p_offset(0, 0xAAAA_BBBB).unwrap();
        assert_eq!(
            table.set_p_offset(0, 0x1_0000_0000),
            Err(PhdrError::ValueOverflow {
                index: 0,
                value: 0x1_0000_0000,
            })
        );
        assert_eq!(table.p_offset(0).unwrap(), 0xAAAA_BBBB);

        assert_eq!(
            table.set_p_filesz(0, u64::MAX),
            Err(PhdrError::ValueOverflow {
                index: 0,
                value: u64::MAX,
            })
        );
        assert_eq!(table.p_filesz(0).unwrap(), 0);
    }

    #[test]
    fn test_mutation_is_isolated_per_entry() {
        let mut entries = entries64();
        entries[0].p_offset = 0x100;
        entries[2].p_offset = 0x300;

        let mut table = PhdrTable::new64(&mut entries, 3).unwrap();
        table.set_p_offset(1, 0xDEAD_0000).unwrap();
        table.set_p_memsz(1, 0x42).unwrap();

        assert_eq!(table.p_offset(0).unwrap(), 0x100);
        assert_eq!(table.p_memsz(0).unwrap(), 0);
        assert_eq!(table.p_offset(2).unwrap(), 0x300);
        assert_eq!(table.p_memsz(2).unwrap(), 0);
        assert_eq!(table.p_offset(1).unwrap(), 0xDEAD_0000);
    }

    #[test]
    fn test_reads_follow_declared_class_layout() {
        // A 64-bit read must never mix in 32-bit field positions: flags
        // comes from the second slot, offset from the 64-bit field after
        // it, with no overlap between the two.
        let mut entries = [Phdr64 {
            p_type: PT_LOAD,
            p_flags: PF_R | PF_X,
            p_offset: 0x1_0000_0000,
            ..Phdr64::default()
        }];
        let table = PhdrTable::new64(&mut entries, 1).unwrap();

        assert_eq!(table.p_type(0).unwrap(), PT_LOAD);
        assert_eq!(table.p_flags(0).unwrap(), PF_R | PF_X);
        assert_eq!(table.p_offset(0).unwrap(), 0x1_0000_0000);
        assert_eq!(table.p_align(0).unwrap(), 0);
    }

    #[test]
    fn test_dump_names_class_and_fields() {
        let mut entries = entries64();
        let mut table = PhdrTable::new64(&mut entries, 1).unwrap();
        table.set_p_type(0, PT_LOAD).unwrap();
        table.set_p_offset(0, 0x1000).unwrap();

        let text = table.dump(0).unwrap();
        assert!(text.contains("Elf64"));
        assert!(text.contains("type=0x1"));
        assert!(text.contains("offset=0x1000"));

        assert_eq!(
            table.dump(1),
            Err(PhdrError::OutOfBounds { index: 1, count: 1 })
        );
    }
}
