/// Unified error type for elfrw-phdr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhdrError {
    /// Table has no backing entries (empty array or zero entry count)
    NullTable,
    /// Entry index at or past the table's entry count
    OutOfBounds { index: usize, count: usize },
    /// Identification byte is neither ELFCLASS32 nor ELFCLASS64
    UnsupportedClass(u8),
    /// Value does not fit the field's native width for the table's class
    ValueOverflow { index: usize, value: u64 },
    /// Requested byte range runs past the end of the buffer
    BufferTooShort { needed: u64, len: usize },
}

/// Convenience Result type alias.
pub type Result<T> = ::core::result::Result<T, PhdrError>;
