//! Owned, editable archive and its serializer.

use std::io::{self, Read, Write};

use afskit_common::align::{padding_for, round_up};
use tracing::warn;
use zerocopy::IntoBytes;

use crate::file::AfsFile;
use crate::format::AfsHeader;
use crate::layout::{CreationMode, Layout};
use crate::viewer::AfsViewer;
use crate::Result;

/// An AFS archive held entirely in memory.
///
/// Files keep the order they were added in; that order is the on-disk entry
/// order and, for archives without metadata, the source of each file's name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AfsArchive {
    files: Vec<AfsFile>,
}

impl AfsArchive {
    /// Create an empty archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an archive from files, keeping their order.
    pub fn from_files(files: Vec<AfsFile>) -> Self {
        Self { files }
    }

    /// Parse and copy an archive out of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        AfsViewer::parse(data)?.materialize()
    }

    /// Copy an archive out of an existing viewer.
    pub fn from_viewer(viewer: &AfsViewer<'_>) -> Result<Self> {
        viewer.materialize()
    }

    /// The files, in archive order.
    #[inline]
    pub fn files(&self) -> &[AfsFile] {
        &self.files
    }

    /// Mutable access to the file list.
    #[inline]
    pub fn files_mut(&mut self) -> &mut Vec<AfsFile> {
        &mut self.files
    }

    /// Append a file.
    pub fn push(&mut self, file: AfsFile) {
        self.files.push(file);
    }

    /// Number of files.
    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the archive has no files.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consume the archive, returning its files.
    pub fn into_files(self) -> Vec<AfsFile> {
        self.files
    }

    /// Layout this archive would be written with.
    pub fn layout(&self, alignment: u64, mode: CreationMode) -> Layout {
        Layout::compute(
            self.files.iter().map(|file| file.len() as u64),
            alignment,
            mode,
        )
    }

    /// Serialize the archive.
    ///
    /// The result is exactly [`Layout::total_size`] bytes long.
    pub fn serialize(&self, alignment: u64, mode: CreationMode) -> Vec<u8> {
        let layout = self.checked_layout(alignment, mode);

        let mut out = Vec::with_capacity(layout.total_size() as usize);
        out.extend_from_slice(&self.header_section(&layout));
        if mode == CreationMode::HeaderOnly {
            return out;
        }

        for file in &self.files {
            out.extend_from_slice(file.data());
            pad(&mut out, alignment);
        }

        if mode.has_metadata() {
            out.extend_from_slice(&self.metadata_section(&layout));
        }

        out
    }

    /// Serialize the archive into a writer without building it in memory.
    ///
    /// Only the header and metadata sections are buffered; file data is
    /// written straight from each file. Returns the number of bytes written.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
        alignment: u64,
        mode: CreationMode,
    ) -> Result<u64> {
        let layout = self.checked_layout(alignment, mode);

        writer.write_all(&self.header_section(&layout))?;
        if mode != CreationMode::HeaderOnly {
            for file in &self.files {
                writer.write_all(file.data())?;
                let padding = padding_for(file.len() as u64, alignment);
                io::copy(&mut io::repeat(0).take(padding), writer)?;
            }

            if mode.has_metadata() {
                writer.write_all(&self.metadata_section(&layout))?;
            }
        }

        Ok(layout.total_size())
    }

    fn checked_layout(&self, alignment: u64, mode: CreationMode) -> Layout {
        let layout = self.layout(alignment, mode);
        if !layout.fits_u32() {
            warn!(
                total_size = layout.total_size(),
                "archive exceeds the 4 GiB addressable by AFS offsets; offsets will wrap"
            );
        }
        layout
    }

    fn header_section(&self, layout: &Layout) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout.header_section_size() as usize);

        out.extend_from_slice(AfsHeader::new(self.files.len() as u32).as_bytes());
        for entry in layout.entries() {
            out.extend_from_slice(entry.as_bytes());
        }
        if let Some(locator) = layout.metadata_locator() {
            out.extend_from_slice(locator.as_bytes());
        }

        pad(&mut out, layout.alignment());
        out
    }

    fn metadata_section(&self, layout: &Layout) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout.metadata_section_size() as usize);

        for file in &self.files {
            out.extend_from_slice(file.to_metadata().as_bytes());
        }

        pad(&mut out, layout.alignment());
        out
    }
}

impl FromIterator<AfsFile> for AfsArchive {
    fn from_iter<I: IntoIterator<Item = AfsFile>>(iter: I) -> Self {
        Self::from_files(iter.into_iter().collect())
    }
}

/// Zero-fill `buf` up to the next multiple of `alignment`.
///
/// Every section starts on a boundary, so padding the whole buffer is the
/// same as padding the section just written.
fn pad(buf: &mut Vec<u8>, alignment: u64) {
    let target = round_up(buf.len() as u64, alignment) as usize;
    buf.resize(target, 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::AfsFileEntry;
    use crate::viewer::Metadata;
    use chrono::NaiveDate;
    use zerocopy::FromBytes;

    fn stamped(name: &str, data: Vec<u8>) -> AfsFile {
        let time = NaiveDate::from_ymd_opt(2019, 8, 26)
            .unwrap()
            .and_hms_opt(15, 12, 56)
            .unwrap();
        AfsFile::new(name, data)
            .unwrap()
            .with_archive_time(time)
            .unwrap()
    }

    fn scenario() -> AfsArchive {
        AfsArchive::from_files(vec![
            stamped("GottaGoFast.png", vec![0x11; 478200]),
            stamped("Documentation.png", vec![0x22; 1414255]),
            stamped("ChaoDeletThis.png", vec![0x33; 514993]),
        ])
    }

    #[test]
    fn test_scenario_header_only() {
        let archive = scenario();
        let data = archive.serialize(2048, CreationMode::HeaderOnly);
        assert_eq!(data.len(), 2048);

        let viewer = AfsViewer::parse(&data).unwrap();
        let entries: Vec<_> = viewer
            .entries()
            .iter()
            .map(|e| (e.offset(), e.length()))
            .collect();
        assert_eq!(
            entries,
            [(2048, 478200), (481280, 1414255), (1896448, 514993)]
        );
        assert_eq!(viewer.metadata(), Metadata::Absent);
    }

    #[test]
    fn test_scenario_round_trip() {
        let archive = scenario();
        let data = archive.serialize(2048, CreationMode::WithMetadata);
        assert_eq!(
            data.len() as u64,
            archive.layout(2048, CreationMode::WithMetadata).total_size()
        );

        let parsed = AfsArchive::parse(&data).unwrap();
        assert_eq!(parsed, archive);
        assert_eq!(parsed.files()[2].name(), "ChaoDeletThis.png");
    }

    #[test]
    fn test_locator_points_at_metadata() {
        let archive = AfsArchive::from_files(vec![
            AfsFile::new("a", vec![1; 5]).unwrap(),
            AfsFile::new("b", vec![2; 3]).unwrap(),
        ]);
        let data = archive.serialize(16, CreationMode::WithMetadata);

        let locator = AfsFileEntry::read_from_bytes(&data[24..32]).unwrap();
        assert_eq!(locator.offset(), 64);
        assert_eq!(locator.length(), 96);
        assert_eq!(&data[64..65], b"a");
        assert_eq!(&data[112..113], b"b");
        assert_eq!(data.len(), 160);
    }

    #[test]
    fn test_padding_is_zero() {
        let archive = AfsArchive::from_files(vec![AfsFile::new("a", vec![0xFF; 3]).unwrap()]);
        let data = archive.serialize(32, CreationMode::NoMetadata);

        assert_eq!(data.len(), 64);
        assert_eq!(&data[32..35], &[0xFF; 3]);
        assert!(data[35..].iter().all(|&b| b == 0));
        assert!(data[16..32].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_empty_archive() {
        let archive = AfsArchive::new();

        let data = archive.serialize(2048, CreationMode::WithMetadata);
        assert_eq!(data.len(), 2048);
        assert_eq!(&data[..8], b"AFS\0\0\0\0\0");

        let data = archive.serialize(0, CreationMode::NoMetadata);
        assert_eq!(data, b"AFS\0\0\0\0\0");

        let parsed = AfsArchive::parse(&archive.serialize(0, CreationMode::WithMetadata)).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_write_to_matches_serialize() {
        let archive = AfsArchive::from_files(vec![
            stamped("one.bin", vec![1; 100]),
            AfsFile::new("two.bin", Vec::new()).unwrap(),
            stamped("three.bin", vec![3; 4097]),
        ]);

        for mode in [
            CreationMode::WithMetadata,
            CreationMode::NoMetadata,
            CreationMode::HeaderOnly,
        ] {
            let mut streamed = Vec::new();
            let written = archive.write_to(&mut streamed, 2048, mode).unwrap();

            assert_eq!(streamed, archive.serialize(2048, mode));
            assert_eq!(written, streamed.len() as u64);
        }
    }

    #[test]
    fn test_order_is_preserved() {
        let archive: AfsArchive = ["z", "a", "m"]
            .into_iter()
            .map(|name| AfsFile::new(name, name.as_bytes().to_vec()).unwrap())
            .collect();

        let parsed = AfsArchive::parse(&archive.serialize(4, CreationMode::WithMetadata)).unwrap();
        let names: Vec<_> = parsed.files().iter().map(AfsFile::name).collect();
        assert_eq!(names, ["z", "a", "m"]);
    }
}
