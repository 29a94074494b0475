//! File entry table records.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Location of one file's data within the archive.
///
/// The same record shape doubles as the metadata locator stored right after
/// the per-file entries of archives written with metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AfsFileEntry {
    /// Absolute offset of the data from the start of the archive.
    pub offset: U32,
    /// Length of the data in bytes.
    pub length: U32,
}

impl AfsFileEntry {
    /// Encoded size of an entry.
    pub const SIZE: usize = 8;

    /// Create an entry.
    pub fn new(offset: u32, length: u32) -> Self {
        Self {
            offset: U32::new(offset),
            length: U32::new(length),
        }
    }

    /// Offset of the data in bytes.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    /// Length of the data in bytes.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// Byte range covered by this entry, if it does not overflow `usize`.
    #[inline]
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        let start = usize::try_from(self.offset()).ok()?;
        let end = start.checked_add(usize::try_from(self.length()).ok()?)?;
        Some(start..end)
    }
}
