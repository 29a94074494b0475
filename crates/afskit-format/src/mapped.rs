//! Memory-mapped archives.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::archive::AfsArchive;
use crate::viewer::AfsViewer;
use crate::Result;

/// An archive file mapped read-only into memory.
///
/// Viewers borrow the mapping, so the file cannot be unmapped while one is
/// alive.
pub struct MappedArchive {
    /// Memory-mapped file data
    mmap: Mmap,
    /// Archive file name
    name: String,
}

impl MappedArchive {
    /// Map an archive file.
    ///
    /// The tag is checked here so that a non-archive fails fast.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        AfsViewer::parse(&mmap)?;

        Ok(Self { mmap, name })
    }

    /// Get the archive file name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The mapped bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.mmap
    }

    /// View the mapped archive.
    pub fn viewer(&self) -> Result<AfsViewer<'_>> {
        AfsViewer::parse(&self.mmap)
    }

    /// Copy the whole archive into memory.
    pub fn to_archive(&self) -> Result<AfsArchive> {
        self.viewer()?.materialize()
    }
}

impl std::fmt::Debug for MappedArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedArchive")
            .field("name", &self.name)
            .field("len", &self.mmap.len())
            .finish()
    }
}
