use afskit_format::{AfsArchive, AfsFile, AfsViewer, CreationMode, Error, Layout};
use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

/// Timestamps with every component nonzero, so they survive the
/// "all fields set" presence check.
fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
    (1i32..=9999, 1u32..=12, 1u32..=28, 1u32..=23, 1u32..=59, 1u32..=59, 0u32..1000).prop_map(
        |(y, mo, d, h, mi, s, ms)| {
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_milli_opt(h, mi, s, ms)
                .unwrap()
        },
    )
}

fn file() -> impl Strategy<Value = AfsFile> {
    (
        "[A-Za-z0-9_.]{1,32}",
        prop::collection::vec(any::<u8>(), 0..1500),
        prop::option::of(timestamp()),
    )
        .prop_map(|(name, data, time)| {
            let mut file = AfsFile::new(name, data).unwrap();
            file.set_archive_time(time).unwrap();
            file
        })
}

fn archive() -> impl Strategy<Value = AfsArchive> {
    prop::collection::vec(file(), 0..8).prop_map(AfsArchive::from_files)
}

fn alignment() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), Just(1), Just(4), Just(16), Just(512), Just(2048), 1u64..100]
}

fn mode() -> impl Strategy<Value = CreationMode> {
    prop_oneof![
        Just(CreationMode::WithMetadata),
        Just(CreationMode::NoMetadata),
        Just(CreationMode::HeaderOnly),
    ]
}

proptest! {
    #[test]
    fn round_trip_with_metadata(archive in archive(), alignment in alignment()) {
        let bytes = archive.serialize(alignment, CreationMode::WithMetadata);
        let parsed = AfsArchive::parse(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(parsed.len(), archive.len());
        for (original, parsed) in archive.files().iter().zip(parsed.files()) {
            prop_assert_eq!(parsed.name(), original.name());
            prop_assert_eq!(parsed.data(), original.data());
            prop_assert_eq!(parsed.archive_time(), original.archive_time());
        }
    }

    #[test]
    fn serialized_length_matches_layout(archive in archive(), alignment in alignment(), mode in mode()) {
        let bytes = archive.serialize(alignment, mode);
        let layout = archive.layout(alignment, mode);

        prop_assert_eq!(bytes.len() as u64, layout.total_size());
        if mode == CreationMode::HeaderOnly {
            prop_assert_eq!(bytes.len() as u64, layout.header_section_size());
        }
    }

    #[test]
    fn sections_are_aligned(archive in archive(), alignment in 1u64..4096) {
        let bytes = archive.serialize(alignment, CreationMode::WithMetadata);
        let viewer = AfsViewer::parse(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;

        for entry in viewer.entries() {
            prop_assert_eq!(u64::from(entry.offset()) % alignment, 0);
        }
        let layout = archive.layout(alignment, CreationMode::WithMetadata);
        prop_assert_eq!(layout.metadata_offset() % alignment, 0);
        prop_assert_eq!(bytes.len() as u64 % alignment, 0);
    }

    #[test]
    fn entries_match_layout(archive in archive(), alignment in alignment()) {
        let bytes = archive.serialize(alignment, CreationMode::NoMetadata);
        let viewer = AfsViewer::parse(&bytes).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let layout = Layout::compute(
            archive.files().iter().map(|f| f.len() as u64),
            alignment,
            CreationMode::NoMetadata,
        );

        let offsets: Vec<u64> = viewer.entries().iter().map(|e| u64::from(e.offset())).collect();
        prop_assert_eq!(offsets.as_slice(), layout.file_offsets());
    }

    #[test]
    fn foreign_tags_are_rejected(
        tag in prop::array::uniform3(any::<u8>()).prop_filter("not AFS", |t| !t.eq_ignore_ascii_case(b"AFS")),
        rest in prop::collection::vec(any::<u8>(), 5..64),
    ) {
        let mut data = tag.to_vec();
        data.extend_from_slice(&rest);

        let err = AfsArchive::parse(&data).unwrap_err();
        prop_assert!(matches!(err, Error::InvalidTag(_)));
        prop_assert!(err.is_format_error());
    }

    #[test]
    fn short_buffers_are_rejected(data in prop::collection::vec(any::<u8>(), 0..8)) {
        prop_assert!(
            matches!(AfsArchive::parse(&data), Err(Error::TooShort { .. })),
            "expected Error::TooShort"
        );
    }

    #[test]
    fn garbage_after_tag_never_panics(rest in prop::collection::vec(any::<u8>(), 5..512)) {
        let mut data = b"AFS".to_vec();
        data.extend_from_slice(&rest);

        if let Ok(viewer) = AfsViewer::parse(&data) {
            let _ = viewer.materialize();
            let _ = viewer.file_infos().count();
        }
    }
}
