//! AFS archive reader and writer.
//!
//! AFS is a flat container used by a number of console and PC game titles to
//! bundle many assets into one file. An archive has a fixed file count, an
//! offset/length table, and optionally a table of names and archive times.
//! Every section is padded to a common alignment (2048 bytes by convention).
//!
//! - [`AfsViewer`] interprets a borrowed buffer in place, copying nothing
//! - [`AfsArchive`] owns its files and serializes them byte-for-byte
//! - [`Layout`] computes where every section of a serialized archive lives
//! - [`SeekReader`] / [`seek_read`] fetch one file from any `Read + Seek`
//! - [`MappedArchive`] memory-maps an archive file for viewing
//!
//! # Example
//!
//! ```
//! use afskit_format::{AfsArchive, AfsFile, CreationMode};
//!
//! let mut archive = AfsArchive::new();
//! archive.push(AfsFile::new("bgm_title.adx", vec![0u8; 4000])?);
//! archive.push(AfsFile::new("se_select.adx", vec![1u8; 100])?);
//!
//! let bytes = archive.serialize(2048, CreationMode::WithMetadata);
//! let parsed = AfsArchive::parse(&bytes)?;
//!
//! assert_eq!(parsed.files()[1].name(), "se_select.adx");
//! # Ok::<(), afskit_format::Error>(())
//! ```

mod archive;
mod error;
mod file;
mod layout;
mod mapped;
mod seek;
mod viewer;
pub mod format;

pub use archive::AfsArchive;
pub use error::{Error, Result};
pub use file::AfsFile;
pub use layout::{CreationMode, Layout};
pub use mapped::MappedArchive;
pub use seek::{seek_read, SeekReader};
pub use viewer::{AfsViewer, FileInfo, Metadata};
