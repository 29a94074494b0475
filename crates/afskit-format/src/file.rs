//! A file held in an in-memory archive.

use afskit_common::fixed;
use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::format::{AfsFileMetadata, NAME_CAPACITY};
use crate::{Error, Result};

/// A named file with its data and optional archive time.
///
/// The name is stored as ASCII, one byte per character with non-ASCII
/// characters written as `?`, and is limited to 32 of those bytes. The limit
/// is enforced here, when the name is set, so serializing an archive can never
/// fail on a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfsFile {
    name: String,
    data: Vec<u8>,
    archive_time: Option<NaiveDateTime>,
}

impl AfsFile {
    /// Create a file without an archive time.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self::new_unchecked(name, data))
    }

    /// Create a file whose name is already known to fit.
    pub(crate) fn new_unchecked(name: String, data: Vec<u8>) -> Self {
        debug_assert!(fixed::encoded_len(&name) <= NAME_CAPACITY);
        Self {
            name,
            data,
            archive_time: None,
        }
    }

    /// Set the archive time, dropping any sub-second part.
    ///
    /// Fails like [`AfsFile::set_archive_time`].
    pub fn with_archive_time(mut self, time: NaiveDateTime) -> Result<Self> {
        self.set_archive_time(Some(time))?;
        Ok(self)
    }

    /// Stamp the file with the current local time.
    pub fn stamp_now(&mut self) -> Result<()> {
        self.set_archive_time(Some(Local::now().naive_local()))
    }

    /// Get the file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the file name.
    ///
    /// Fails with [`Error::NameTooLong`] and leaves the name untouched if the
    /// new name is longer than 32 characters.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Get the file data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable access to the data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    /// Consume the file, returning its data.
    #[inline]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Length of the data in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the file has no data.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the archive time, if any.
    #[inline]
    pub fn archive_time(&self) -> Option<NaiveDateTime> {
        self.archive_time
    }

    /// Set or clear the archive time. Sub-second precision is dropped.
    ///
    /// Fails with [`Error::ArchiveTimeOutOfRange`] and keeps the old time if
    /// the year is outside `0..=65535`.
    pub fn set_archive_time(&mut self, time: Option<NaiveDateTime>) -> Result<()> {
        if let Some(time) = time {
            if u16::try_from(time.year()).is_err() {
                return Err(Error::ArchiveTimeOutOfRange(time));
            }
        }

        self.archive_time = time.map(|t| t.with_nanosecond(0).unwrap_or(t));
        Ok(())
    }

    /// The metadata record describing this file.
    pub fn to_metadata(&self) -> AfsFileMetadata {
        AfsFileMetadata::new(&self.name, self.data.len() as u32, self.archive_time)
    }
}

fn validate_name(name: &str) -> Result<()> {
    let length = fixed::encoded_len(name);
    if length > NAME_CAPACITY {
        return Err(Error::NameTooLong {
            name: name.to_string(),
            length,
        });
    }
    Ok(())
}
