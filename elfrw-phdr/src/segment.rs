use crate::error::{PhdrError, Result};
use crate::layout::Class;
use crate::table::PhdrTable;

/// Immutable snapshot of one segment: a program header entry paired with
/// its raw on-file bytes.
///
/// The byte range borrows from the caller's file buffer; the segment
/// never owns it. The snapshot is taken at materialization time and is
/// not invalidated when the underlying table is mutated afterwards —
/// callers that change an entry's offset or size must re-materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    seg_type: u32,
    class: Class,
    index: usize,
    data: &'a [u8],
    offset: u64,
    size: u64,
}

impl<'a> Segment<'a> {
    /// Snapshot entry `index` of `table`, slicing its content out of
    /// `file_buffer`.
    ///
    /// Reads type/offset/filesz through the table's getters (their
    /// errors propagate unchanged), then takes
    /// `file_buffer[offset .. offset + filesz]`. Fails with
    /// [`PhdrError::BufferTooShort`] when that range runs past the
    /// buffer; no partial segment is produced.
    pub fn materialize(
        table: &PhdrTable<'_>,
        index: usize,
        file_buffer: &'a [u8],
    ) -> Result<Segment<'a>> {
        let seg_type = table.p_type(index)?;
        let offset = table.p_offset(index)?;
        let size = table.p_filesz(index)?;

        let end = offset
            .checked_add(size)
            .filter(|&end| end <= file_buffer.len() as u64)
            .ok_or(PhdrError::BufferTooShort {
                needed: offset.saturating_add(size),
                len: file_buffer.len(),
            })?;

        // end <= len, so both bounds fit usize
        let data = &file_buffer[offset as usize..end as usize];
        log::trace!("segment[{index}] materialized: {size:#x} bytes at {offset:#x}");

        Ok(Segment {
            seg_type,
            class: table.class(),
            index,
            data,
            offset,
            size,
        })
    }

    /// The segment's raw on-file content.
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }

    /// `p_type` value at materialization time.
    pub fn seg_type(&self) -> u32 {
        self.seg_type
    }

    /// Word-size class of the owning table.
    pub fn class(&self) -> Class {
        self.class
    }

    /// Index of the owning program header entry.
    pub fn index(&self) -> usize {
        self.index
    }

    /// File offset at materialization time.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// On-file size at materialization time; always equals
    /// `self.bytes().len()`.
    pub fn size(&self) -> u64 {
        self.size
    }
}
