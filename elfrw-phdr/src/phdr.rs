#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod layout;
pub mod segment;
pub mod table;

// Re-exports
pub use error::PhdrError;
pub use layout::phdr32::Phdr32;
pub use layout::phdr64::Phdr64;
pub use layout::{Class, PF_R, PF_W, PF_X, PT_DYNAMIC, PT_INTERP, PT_LOAD, PT_NOTE, PT_PHDR};
pub use segment::Segment;
pub use table::PhdrTable;
