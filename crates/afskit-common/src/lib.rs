//! Common utilities for afskit.
//!
//! This crate provides the foundational pieces the AFS format crate is built on:
//!
//! - [`BinaryReader`] - Bounds-checked zero-copy reading from byte slices
//! - [`align`] - Alignment arithmetic shared by the layout calculator and serializer
//! - [`fixed`] - Fixed-capacity, zero-padded string fields

mod error;
mod reader;

pub mod align;
pub mod fixed;

pub use error::{Error, Result};
pub use reader::BinaryReader;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Re-export memchr for SIMD-accelerated byte searching
pub use memchr;
