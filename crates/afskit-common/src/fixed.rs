//! Fixed-capacity string fields.
//!
//! Archive records store names in fixed-size byte arrays: the text is
//! left-justified and the rest of the field is zero-filled. There is no
//! length prefix and no terminator when the text fills the whole field.
//! Text is written as ASCII, one byte per character.

use std::borrow::Cow;

/// Encode `text` into an `N`-byte field, zero-padding the remainder.
///
/// Each character takes one byte: ASCII is stored as-is and anything else is
/// stored as `?`. Input longer than the field is truncated to `N` characters.
pub fn encode_fixed<const N: usize>(text: &str) -> [u8; N] {
    let mut field = [0u8; N];
    for (slot, c) in field.iter_mut().zip(text.chars()) {
        *slot = if c.is_ascii() { c as u8 } else { b'?' };
    }
    field
}

/// Number of bytes `text` occupies once encoded with [`encode_fixed`].
#[inline]
pub fn encoded_len(text: &str) -> usize {
    text.chars().count()
}

/// The meaningful prefix of a fixed field: everything before the first zero byte.
#[inline]
pub fn trim_fixed(field: &[u8]) -> &[u8] {
    let end = memchr::memchr(0, field).unwrap_or(field.len());
    &field[..end]
}

/// Decode a fixed field into text.
///
/// Valid UTF-8 (which includes plain ASCII) is borrowed as-is. Any other
/// content is decoded byte-for-byte with non-ASCII bytes replaced by `?`, so
/// the decoded text never occupies more bytes than the field did.
pub fn decode_fixed(field: &[u8]) -> Cow<'_, str> {
    let bytes = trim_fixed(field);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(
            bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
        ),
    }
}
