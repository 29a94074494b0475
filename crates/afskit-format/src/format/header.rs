//! Archive header.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// AFS archive header.
///
/// The tag is compared case-insensitively on read and always written as
/// uppercase `AFS` followed by a zero reserved byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AfsHeader {
    /// Archive tag, `AFS` in any case.
    pub tag: [u8; 3],
    /// Reserved, zero when written.
    pub reserved: u8,
    /// Number of files in the archive.
    pub file_count: U32,
}

impl AfsHeader {
    /// The canonical archive tag.
    pub const TAG: &'static [u8; 3] = b"AFS";

    /// Encoded size of the header.
    pub const SIZE: usize = 8;

    /// Create a header for an archive holding `file_count` files.
    pub fn new(file_count: u32) -> Self {
        Self {
            tag: *Self::TAG,
            reserved: 0,
            file_count: U32::new(file_count),
        }
    }

    /// Check whether the tag identifies an AFS archive.
    #[inline]
    pub fn is_afs(&self) -> bool {
        self.tag.eq_ignore_ascii_case(Self::TAG)
    }

    /// Number of files declared by the header.
    #[inline]
    pub fn file_count(&self) -> u32 {
        self.file_count.get()
    }
}
