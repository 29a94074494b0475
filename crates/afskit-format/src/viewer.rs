//! Zero-copy archive viewer.
//!
//! [`AfsViewer`] interprets a borrowed buffer in place: the header, the entry
//! table and the metadata table are references into the caller's bytes, and
//! nothing is copied until [`AfsViewer::materialize`] is called. The viewer's
//! lifetime is tied to the buffer, so it cannot be used once the buffer is
//! gone.

use std::borrow::Cow;

use afskit_common::BinaryReader;
use chrono::NaiveDateTime;
use tracing::debug;

use crate::archive::AfsArchive;
use crate::file::AfsFile;
use crate::format::{AfsFileEntry, AfsFileMetadata, AfsHeader};
use crate::{Error, Result};

/// The metadata table of an archive.
///
/// Presence is decided by the locator entry, not by inspecting the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metadata<'a> {
    /// No usable locator: names default to the file index.
    Absent,
    /// One record per file, in file order.
    Present(&'a [AfsFileMetadata]),
}

impl<'a> Metadata<'a> {
    /// The records, if present.
    #[inline]
    pub fn records(&self) -> Option<&'a [AfsFileMetadata]> {
        match *self {
            Self::Absent => None,
            Self::Present(records) => Some(records),
        }
    }

    /// Check whether a metadata table was found.
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// Summary of one file, as listed by tools.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FileInfo {
    /// Position in the archive.
    pub index: usize,
    /// Stored name, or the index when the archive has no metadata.
    pub name: String,
    /// Offset of the data.
    pub offset: u32,
    /// Length of the data.
    pub length: u32,
    /// Archive time, if recorded.
    pub archive_time: Option<NaiveDateTime>,
}

/// Read-only view of an AFS archive held in a borrowed buffer.
#[derive(Debug, Clone, Copy)]
pub struct AfsViewer<'a> {
    data: &'a [u8],
    header: &'a AfsHeader,
    entries: &'a [AfsFileEntry],
    metadata: Metadata<'a>,
}

impl<'a> AfsViewer<'a> {
    /// Parse the archive structure of `data`.
    ///
    /// Fails with [`Error::TooShort`] if the buffer cannot hold a header and
    /// with [`Error::InvalidTag`] if it does not start with `AFS`.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < AfsHeader::SIZE {
            return Err(Error::TooShort {
                needed: AfsHeader::SIZE,
                available: data.len(),
            });
        }

        let mut reader = BinaryReader::new(data);
        let header: &AfsHeader = reader.read_ref()?;
        if !header.is_afs() {
            return Err(Error::InvalidTag(header.tag));
        }

        let file_count = header.file_count();
        let entries = reader
            .read_slice::<AfsFileEntry>(file_count as usize)
            .map_err(|_| Error::EntryTableTruncated {
                file_count,
                available: data.len(),
            })?;

        let metadata = Self::locate_metadata(data, &mut reader, file_count as usize);
        debug!(
            file_count,
            metadata = metadata.is_present(),
            "parsed AFS archive"
        );

        Ok(Self {
            data,
            header,
            entries,
            metadata,
        })
    }

    /// Parse `data`, run `f` on the viewer, and drop the viewer.
    ///
    /// The closure's result cannot borrow from the viewer, so nothing parsed
    /// out of the buffer escapes the call.
    pub fn scoped<R, F>(data: &[u8], f: F) -> Result<R>
    where
        F: for<'v> FnOnce(&AfsViewer<'v>) -> R,
    {
        let viewer = AfsViewer::parse(data)?;
        Ok(f(&viewer))
    }

    /// Check whether `data` starts with an AFS header.
    pub fn is_afs(data: &[u8]) -> bool {
        data.len() >= AfsHeader::SIZE && data[..3].eq_ignore_ascii_case(AfsHeader::TAG)
    }

    fn locate_metadata(
        data: &'a [u8],
        reader: &mut BinaryReader<'a>,
        file_count: usize,
    ) -> Metadata<'a> {
        let Ok(locator) = reader.read_ref::<AfsFileEntry>() else {
            debug!("no room for a metadata locator");
            return Metadata::Absent;
        };

        if locator.length() == 0 || locator.offset() == 0 {
            return Metadata::Absent;
        }

        let mut table = BinaryReader::new_at(data, locator.offset() as usize);
        match table.read_slice::<AfsFileMetadata>(file_count) {
            Ok(records) => Metadata::Present(records),
            Err(e) => {
                debug!(offset = locator.offset(), error = %e, "metadata table out of bounds");
                Metadata::Absent
            }
        }
    }

    /// The archive header.
    #[inline]
    pub fn header(&self) -> &'a AfsHeader {
        self.header
    }

    /// Number of files.
    #[inline]
    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    /// The entry table.
    #[inline]
    pub fn entries(&self) -> &'a [AfsFileEntry] {
        self.entries
    }

    /// Entry by index.
    #[inline]
    pub fn entry(&self, index: usize) -> Option<&'a AfsFileEntry> {
        self.entries.get(index)
    }

    /// The metadata table.
    #[inline]
    pub fn metadata(&self) -> Metadata<'a> {
        self.metadata
    }

    /// The buffer being viewed.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Borrow one file's data without copying.
    pub fn file_data(&self, index: usize) -> Result<&'a [u8]> {
        let entry = self.entry(index).ok_or(Error::IndexOutOfRange {
            index,
            file_count: self.file_count(),
        })?;

        match entry.range() {
            Some(range) if range.end <= self.data.len() => Ok(&self.data[range]),
            _ => Err(Error::FileOutOfBounds {
                index,
                offset: entry.offset(),
                length: entry.length(),
                available: self.data.len(),
            }),
        }
    }

    /// Name of a file: the stored name, or its index if there is no metadata.
    pub fn file_name(&self, index: usize) -> Cow<'a, str> {
        match self.metadata.records().and_then(|records| records.get(index)) {
            Some(record) => record.file_name(),
            None => Cow::Owned(index.to_string()),
        }
    }

    /// Archive time of a file, if recorded.
    pub fn archive_time(&self, index: usize) -> Option<NaiveDateTime> {
        self.metadata
            .records()
            .and_then(|records| records.get(index))
            .and_then(AfsFileMetadata::timestamp)
    }

    /// Summaries of all files, in archive order.
    pub fn file_infos(&self) -> impl Iterator<Item = FileInfo> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| FileInfo {
                index,
                name: self.file_name(index).into_owned(),
                offset: entry.offset(),
                length: entry.length(),
                archive_time: self.archive_time(index),
            })
    }

    /// Copy every file out of the buffer into an owned archive.
    pub fn materialize(&self) -> Result<AfsArchive> {
        let files = (0..self.file_count())
            .map(|index| {
                let data = self.file_data(index)?.to_vec();
                let mut file = AfsFile::new_unchecked(self.file_name(index).into_owned(), data);
                file.set_archive_time(self.archive_time(index))?;
                Ok(file)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(AfsArchive::from_files(files))
    }

    /// End the view, handing back the buffer.
    #[inline]
    pub fn release(self) -> &'a [u8] {
        self.data
    }
}
