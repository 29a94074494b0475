//! Alignment arithmetic.
//!
//! An alignment of zero means "no alignment": values are returned unchanged
//! and no padding is ever required.

/// Round `value` up to the next multiple of `alignment`.
///
/// Returns `value` unchanged when `alignment` is zero or `value` is already
/// a multiple of it.
#[inline]
pub const fn round_up(value: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return value;
    }

    let remainder = value % alignment;
    if remainder == 0 {
        value
    } else {
        value + alignment - remainder
    }
}

/// Number of zero bytes needed after `length` bytes to reach the next boundary.
#[inline]
pub const fn padding_for(length: u64, alignment: u64) -> u64 {
    round_up(length, alignment) - length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_alignment_is_identity() {
        assert_eq!(round_up(0, 0), 0);
        assert_eq!(round_up(12345, 0), 12345);
        assert_eq!(padding_for(12345, 0), 0);
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(0, 2048), 0);
        assert_eq!(round_up(1, 2048), 2048);
        assert_eq!(round_up(2048, 2048), 2048);
        assert_eq!(round_up(2049, 2048), 4096);
        assert_eq!(round_up(480248, 2048), 481280);
    }

    #[test]
    fn test_padding_for() {
        assert_eq!(padding_for(40, 2048), 2008);
        assert_eq!(padding_for(4096, 2048), 0);
        assert_eq!(padding_for(7, 4), 1);
    }
}
