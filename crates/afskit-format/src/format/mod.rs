//! AFS on-disk structures.
//!
//! Every record is little-endian and byte-aligned, so each one can be viewed
//! in place at any offset of a borrowed buffer and written back with
//! [`IntoBytes::as_bytes`](zerocopy::IntoBytes::as_bytes).
//!
//! ```text
//! Header (8)          "AFS" 0x00 file_count
//! Entry[file_count]   offset length
//! MetaLocator         offset length          (with-metadata archives only)
//! <pad>
//! FileData[0] <pad> ... FileData[n-1] <pad>
//! Metadata[file_count] (48 bytes each)       (with-metadata archives only)
//! <pad>
//! ```

mod entry;
mod header;
mod metadata;

pub use entry::AfsFileEntry;
pub use header::AfsHeader;
pub use metadata::{AfsFileMetadata, NAME_CAPACITY};
