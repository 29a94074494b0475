//! Section sizes and offsets of a serialized archive.
//!
//! Layout is a pure function of the file lengths, the alignment and the
//! creation mode. The serializer and the tests both go through [`Layout`], so
//! the offsets written into the entry table and the bytes actually emitted can
//! never disagree.

use afskit_common::align::round_up;

use crate::format::{AfsFileEntry, AfsFileMetadata, AfsHeader};

/// Which sections to produce when serializing an archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CreationMode {
    /// Header, entries, metadata locator, file data and the metadata table.
    #[default]
    WithMetadata,
    /// Header, entries and file data.
    NoMetadata,
    /// Header and entries only, padded to the alignment.
    ///
    /// The entries still describe where each file will live, so the result
    /// can be used as a shell that a streaming writer fills by offset.
    HeaderOnly,
}

impl CreationMode {
    /// Whether the metadata locator and table are written.
    #[inline]
    pub fn has_metadata(self) -> bool {
        self == Self::WithMetadata
    }
}

/// Computed layout of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layout {
    alignment: u64,
    mode: CreationMode,
    header_section_size: u64,
    file_section_size: u64,
    metadata_section_size: u64,
    file_offsets: Vec<u64>,
    file_lengths: Vec<u64>,
    metadata_offset: u64,
}

impl Layout {
    /// Alignment used by the original tools.
    pub const DEFAULT_ALIGNMENT: u64 = 2048;

    /// Compute the layout for files of the given lengths, in archive order.
    pub fn compute<I>(lengths: I, alignment: u64, mode: CreationMode) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let file_lengths: Vec<u64> = lengths.into_iter().collect();
        let file_count = file_lengths.len() as u64;
        let entry_count = file_count + u64::from(mode.has_metadata());

        let header_section_size = round_up(
            AfsHeader::SIZE as u64 + AfsFileEntry::SIZE as u64 * entry_count,
            alignment,
        );
        let metadata_section_size =
            round_up(AfsFileMetadata::SIZE as u64 * file_count, alignment);

        let mut file_offsets = Vec::with_capacity(file_lengths.len());
        let mut file_section_size = 0;
        let mut cursor = header_section_size;
        for &length in &file_lengths {
            file_offsets.push(cursor);
            cursor = round_up(cursor + length, alignment);
            file_section_size += round_up(length, alignment);
        }

        Self {
            alignment,
            mode,
            header_section_size,
            file_section_size,
            metadata_section_size,
            file_offsets,
            file_lengths,
            metadata_offset: cursor,
        }
    }

    /// Alignment the layout was computed for.
    #[inline]
    pub fn alignment(&self) -> u64 {
        self.alignment
    }

    /// Creation mode the layout was computed for.
    #[inline]
    pub fn mode(&self) -> CreationMode {
        self.mode
    }

    /// Number of files.
    #[inline]
    pub fn file_count(&self) -> usize {
        self.file_offsets.len()
    }

    /// Header, entry table and (optional) locator, padded.
    #[inline]
    pub fn header_section_size(&self) -> u64 {
        self.header_section_size
    }

    /// All file data, each file padded.
    #[inline]
    pub fn file_section_size(&self) -> u64 {
        self.file_section_size
    }

    /// Metadata table, padded.
    ///
    /// This is also the length recorded in the metadata locator.
    #[inline]
    pub fn metadata_section_size(&self) -> u64 {
        self.metadata_section_size
    }

    /// Offset of the metadata table: the aligned end of the last file.
    #[inline]
    pub fn metadata_offset(&self) -> u64 {
        self.metadata_offset
    }

    /// Offset of each file's data, in archive order.
    #[inline]
    pub fn file_offsets(&self) -> &[u64] {
        &self.file_offsets
    }

    /// Size of the serialized archive for this layout's mode.
    pub fn total_size(&self) -> u64 {
        match self.mode {
            CreationMode::HeaderOnly => self.header_section_size,
            CreationMode::NoMetadata => self.header_section_size + self.file_section_size,
            CreationMode::WithMetadata => {
                self.header_section_size + self.file_section_size + self.metadata_section_size
            }
        }
    }

    /// Whether every offset fits the format's 32-bit fields.
    pub fn fits_u32(&self) -> bool {
        let end = self.metadata_offset + self.metadata_section_size;
        end <= u64::from(u32::MAX)
    }

    /// Entry table records, in archive order.
    ///
    /// Values beyond the 32-bit range are truncated; check [`fits_u32`](Self::fits_u32).
    pub fn entries(&self) -> impl Iterator<Item = AfsFileEntry> + '_ {
        self.file_offsets
            .iter()
            .zip(&self.file_lengths)
            .map(|(&offset, &length)| AfsFileEntry::new(offset as u32, length as u32))
    }

    /// The metadata locator entry, present only in [`CreationMode::WithMetadata`].
    pub fn metadata_locator(&self) -> Option<AfsFileEntry> {
        self.mode.has_metadata().then(|| {
            AfsFileEntry::new(
                self.metadata_offset as u32,
                self.metadata_section_size as u32,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: [u64; 3] = [478200, 1414255, 514993];

    #[test]
    fn test_scenario_offsets() {
        let layout = Layout::compute(SCENARIO, 2048, CreationMode::WithMetadata);

        assert_eq!(layout.header_section_size(), 2048);
        assert_eq!(layout.file_offsets(), &[2048, 481280, 1896448]);
        assert_eq!(layout.metadata_offset(), 2412544);
        assert_eq!(layout.metadata_section_size(), 2048);
        assert_eq!(layout.total_size(), 2048 + 2410496 + 2048);
        assert_eq!(layout.total_size(), layout.metadata_offset() + 2048);
    }

    #[test]
    fn test_mode_totals() {
        let header_only = Layout::compute(SCENARIO, 2048, CreationMode::HeaderOnly);
        let no_meta = Layout::compute(SCENARIO, 2048, CreationMode::NoMetadata);

        assert_eq!(header_only.total_size(), 2048);
        assert_eq!(no_meta.total_size(), 2048 + no_meta.file_section_size());
        assert!(header_only.metadata_locator().is_none());
    }

    #[test]
    fn test_zero_alignment_packs_tightly() {
        let layout = Layout::compute([3, 5], 0, CreationMode::WithMetadata);

        // header + 2 entries + locator
        assert_eq!(layout.header_section_size(), 8 + 24);
        assert_eq!(layout.file_offsets(), &[32, 35]);
        assert_eq!(layout.metadata_offset(), 40);
        assert_eq!(layout.metadata_section_size(), 96);
        assert_eq!(layout.total_size(), 136);
    }

    #[test]
    fn test_locator_entry_only_counts_with_metadata() {
        let with = Layout::compute([1; 31], 0, CreationMode::WithMetadata);
        let without = Layout::compute([1; 31], 0, CreationMode::NoMetadata);

        assert_eq!(with.header_section_size(), 8 + 8 * 32);
        assert_eq!(without.header_section_size(), 8 + 8 * 31);
    }

    #[test]
    fn test_empty_archive() {
        let layout = Layout::compute([], 2048, CreationMode::WithMetadata);

        assert_eq!(layout.file_count(), 0);
        assert_eq!(layout.header_section_size(), 2048);
        assert_eq!(layout.metadata_offset(), 2048);
        assert_eq!(layout.metadata_section_size(), 0);
        assert_eq!(layout.total_size(), 2048);
        assert_eq!(
            layout.metadata_locator(),
            Some(AfsFileEntry::new(2048, 0))
        );
    }

    #[test]
    fn test_empty_files_share_offsets() {
        let layout = Layout::compute([0, 0, 4], 16, CreationMode::NoMetadata);

        assert_eq!(layout.file_offsets(), &[32, 32, 32]);
        assert_eq!(layout.total_size(), 48);
    }

    #[test]
    fn test_fits_u32() {
        let small = Layout::compute(SCENARIO, 2048, CreationMode::WithMetadata);
        let huge = Layout::compute([u64::from(u32::MAX)], 2048, CreationMode::NoMetadata);

        assert!(small.fits_u32());
        assert!(!huge.fits_u32());
    }
}
