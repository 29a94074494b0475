//! afskit - AFS game archive library.
//!
//! This crate provides a unified interface to the afskit crates.
//!
//! # Crates
//!
//! - [`afskit_common`] - Common utilities (binary reading, alignment, fixed fields)
//! - [`afskit_format`] - AFS archive parsing, layout and serialization
//!
//! # Example
//!
//! ```no_run
//! use afskit::prelude::*;
//!
//! // Map an archive and pull one file out without copying the rest
//! let mapped = MappedArchive::open("voice.afs")?;
//! let viewer = mapped.viewer()?;
//! let data = viewer.file_data(0)?;
//! println!("{}: {} bytes", viewer.file_name(0), data.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use afskit_common as common;
pub use afskit_format as format;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use afskit_common::{align, BinaryReader};
    pub use afskit_format::{
        seek_read, AfsArchive, AfsFile, AfsViewer, CreationMode, FileInfo, Layout,
        MappedArchive, Metadata, SeekReader,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
