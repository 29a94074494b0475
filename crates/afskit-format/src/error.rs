//! Error types for the AFS format crate.

use thiserror::Error;

/// Errors that can occur when working with AFS archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] afskit_common::Error),

    /// Buffer too short to hold the archive header.
    #[error("buffer too short for an AFS header: needed {needed} bytes, got {available}")]
    TooShort { needed: usize, available: usize },

    /// The first three bytes are not `AFS`.
    #[error("not an AFS archive: tag is {0:02x?}")]
    InvalidTag([u8; 3]),

    /// The entry table extends past the end of the buffer.
    #[error("entry table for {file_count} files does not fit in {available} bytes")]
    EntryTableTruncated { file_count: u32, available: usize },

    /// A file's data range extends past the end of the buffer.
    #[error("file {index} at offset {offset} with length {length} exceeds buffer of {available} bytes")]
    FileOutOfBounds {
        index: usize,
        offset: u32,
        length: u32,
        available: usize,
    },

    /// Requested index is not below the archive's file count.
    #[error("file index {index} out of range for archive with {file_count} files")]
    IndexOutOfRange { index: usize, file_count: usize },

    /// File name does not fit in the 32-byte name field.
    #[error("file name {name:?} is {length} bytes when stored; the limit is 32")]
    NameTooLong { name: String, length: usize },

    /// Archive time whose year cannot be stored in the 16-bit year field.
    #[error("archive time {0} is outside the years 0 to 65535 a metadata record can hold")]
    ArchiveTimeOutOfRange(chrono::NaiveDateTime),
}

impl Error {
    /// Whether this error means the input is not a well-formed archive.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::TooShort { .. }
                | Self::InvalidTag(_)
                | Self::EntryTableTruncated { .. }
                | Self::FileOutOfBounds { .. }
        )
    }
}

/// Result type for AFS operations.
pub type Result<T> = std::result::Result<T, Error>;
