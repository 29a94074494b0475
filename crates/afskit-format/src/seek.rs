//! Random access to single files through `Read + Seek`.
//!
//! Reading one file costs two seek+read pairs: one for its entry, one for its
//! data. Nothing else in the archive is touched, which keeps access into very
//! large archives cheap.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use zerocopy::FromBytes;

use crate::format::{AfsFileEntry, AfsHeader};
use crate::{Error, Result};

/// Read file `index` from an archive without validating its header.
///
/// The caller is expected to know the source is an archive with more than
/// `index` files; a source that is too short fails with an I/O error.
pub fn seek_read<R: Read + Seek>(source: &mut R, index: usize) -> Result<Vec<u8>> {
    let entry = read_entry(source, index)?;
    read_data(source, &entry)
}

fn read_entry<R: Read + Seek>(source: &mut R, index: usize) -> Result<AfsFileEntry> {
    let position = (index as u64)
        .checked_mul(AfsFileEntry::SIZE as u64)
        .and_then(|offset| offset.checked_add(AfsHeader::SIZE as u64))
        .ok_or(Error::IndexOutOfRange {
            index,
            file_count: 0,
        })?;

    source.seek(SeekFrom::Start(position))?;
    let offset = source.read_u32::<LittleEndian>()?;
    let length = source.read_u32::<LittleEndian>()?;
    Ok(AfsFileEntry::new(offset, length))
}

fn read_data<R: Read + Seek>(source: &mut R, entry: &AfsFileEntry) -> Result<Vec<u8>> {
    source.seek(SeekFrom::Start(u64::from(entry.offset())))?;

    // Bounded read: a forged length cannot force a huge allocation up front.
    let length = entry.length() as usize;
    let mut data = Vec::new();
    source
        .by_ref()
        .take(u64::from(entry.length()))
        .read_to_end(&mut data)?;

    if data.len() != length {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!(
                "file data at offset {} truncated: expected {} bytes, got {}",
                entry.offset(),
                length,
                data.len()
            ),
        )));
    }

    Ok(data)
}

/// Reads individual files from a seekable archive.
///
/// The header is read and validated once, on construction; every later read
/// is range-checked against the cached file count.
#[derive(Debug)]
pub struct SeekReader<R> {
    source: R,
    file_count: u32,
}

impl<R: Read + Seek> SeekReader<R> {
    /// Read the header of `source` and check its tag.
    pub fn new(mut source: R) -> Result<Self> {
        source.seek(SeekFrom::Start(0))?;

        let mut bytes = Vec::with_capacity(AfsHeader::SIZE);
        source
            .by_ref()
            .take(AfsHeader::SIZE as u64)
            .read_to_end(&mut bytes)?;
        let header = AfsHeader::read_from_bytes(&bytes).map_err(|_| Error::TooShort {
            needed: AfsHeader::SIZE,
            available: bytes.len(),
        })?;

        if !header.is_afs() {
            return Err(Error::InvalidTag(header.tag));
        }

        let file_count = header.file_count();
        Ok(Self { source, file_count })
    }

    /// Number of files declared by the header.
    #[inline]
    pub fn file_count(&self) -> usize {
        self.file_count as usize
    }

    /// Read the entry for file `index`.
    pub fn entry(&mut self, index: usize) -> Result<AfsFileEntry> {
        self.check_index(index)?;
        read_entry(&mut self.source, index)
    }

    /// Read the data of file `index`.
    pub fn read(&mut self, index: usize) -> Result<Vec<u8>> {
        let entry = self.entry(index)?;
        read_data(&mut self.source, &entry)
    }

    /// Get the underlying source back.
    pub fn into_inner(self) -> R {
        self.source
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.file_count() {
            return Err(Error::IndexOutOfRange {
                index,
                file_count: self.file_count(),
            });
        }
        Ok(())
    }
}
