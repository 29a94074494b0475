//! File names used when unpacking and repacking archives.
//!
//! Unpacked files are named `{index}_{name}` so that a directory listing
//! carries both the archive order and the stored name. Repacking reverses
//! this: the index decides the order and the prefix is stripped.

use std::num::ParseIntError;

use regex::Regex;

/// Name for an unpacked file; `{index}_` alone when the stored name is empty.
pub fn unpacked_name(index: usize, name: &str) -> String {
    // Stored names are flat; never let one escape the output directory.
    let safe: String = name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{index}_{safe}")
}

/// Parses the `{index}_` prefix of unpacked file names.
#[derive(Debug, Clone)]
pub struct IndexPattern {
    re: Regex,
}

impl IndexPattern {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            re: Regex::new(r"(?s)^(\d+)_(.*)$")?,
        })
    }

    /// Split a file name into its index and the stored name.
    ///
    /// `None` means the name has no `{index}_` prefix. A prefix whose digits
    /// do not fit a `u64` is reported as an error.
    pub fn parse<'a>(
        &self,
        file_name: &'a str,
    ) -> Option<Result<(u64, &'a str), ParseIntError>> {
        let captures = self.re.captures(file_name)?;
        let digits = captures.get(1)?.as_str();
        let name = captures.get(2)?.as_str();
        Some(digits.parse().map(|index| (index, name)))
    }
}
