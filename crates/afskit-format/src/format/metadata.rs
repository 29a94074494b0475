//! Per-file metadata records.

use std::borrow::Cow;

use afskit_common::fixed;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Capacity of the name field in bytes.
pub const NAME_CAPACITY: usize = 32;

/// Name and archive time of one file.
///
/// Records are stored in file order at the offset named by the metadata
/// locator entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
#[repr(C)]
pub struct AfsFileMetadata {
    /// Zero-padded file name.
    pub name: [u8; NAME_CAPACITY],
    pub year: U16,
    pub month: U16,
    pub day: U16,
    pub hour: U16,
    pub minute: U16,
    pub second: U16,
    /// Length of the file in bytes.
    pub length: U32,
}

impl AfsFileMetadata {
    /// Encoded size of a metadata record.
    pub const SIZE: usize = 48;

    /// Build a record.
    ///
    /// The name is stored as ASCII and truncated to the field. A timestamp
    /// whose year does not fit the 16-bit year field is left out, as if none
    /// had been given.
    pub fn new(name: &str, length: u32, timestamp: Option<NaiveDateTime>) -> Self {
        let mut record = Self {
            name: fixed::encode_fixed(name),
            year: U16::new(0),
            month: U16::new(0),
            day: U16::new(0),
            hour: U16::new(0),
            minute: U16::new(0),
            second: U16::new(0),
            length: U32::new(length),
        };

        let stamp = timestamp.and_then(|time| Some((u16::try_from(time.year()).ok()?, time)));
        if let Some((year, time)) = stamp {
            record.year = U16::new(year);
            record.month = U16::new(time.month() as u16);
            record.day = U16::new(time.day() as u16);
            record.hour = U16::new(time.hour() as u16);
            record.minute = U16::new(time.minute() as u16);
            record.second = U16::new(time.second() as u16);
        }

        record
    }

    /// The stored file name, up to the first zero byte.
    pub fn file_name(&self) -> Cow<'_, str> {
        fixed::decode_fixed(&self.name)
    }

    /// Length of the file as recorded in the metadata.
    #[inline]
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// Whether the record carries a timestamp.
    ///
    /// Only true when all six fields are nonzero, so a time such as
    /// `12:30:00` reads back as "no timestamp".
    pub fn has_timestamp(&self) -> bool {
        [
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        ]
        .iter()
        .all(|field| field.get() != 0)
    }

    /// The archive timestamp, if present and a valid calendar time.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        if !self.has_timestamp() {
            return None;
        }

        NaiveDate::from_ymd_opt(
            i32::from(self.year.get()),
            u32::from(self.month.get()),
            u32::from(self.day.get()),
        )?
        .and_hms_opt(
            u32::from(self.hour.get()),
            u32::from(self.minute.get()),
            u32::from(self.second.get()),
        )
    }
}
