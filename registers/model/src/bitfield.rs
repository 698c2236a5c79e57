// Licensed under the Apache-2.0 license

//! Bit-field arithmetic shared by generated code and the runtime.
//!
//! Every function here is pure. The register write path built on top of
//! them is, in order:
//!
//! 1. mask the incoming value to the register width,
//! 2. read the current value if [`requires_read_before_write`] says so,
//! 3. [`combine`] incoming and existing according to the access mode,
//! 4. issue the transport write with the [`byte_enable`] strobe.

use crate::access::AccessMode;

/// Mask of `width` ones starting at bit `lsb`.
///
/// Widths that reach past bit 63 are truncated at the top of the word.
pub const fn mask(lsb: u32, width: u32) -> u64 {
    if width == 0 || lsb >= 64 {
        return 0;
    }
    let ones = if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    };
    ones << lsb
}

pub const fn extract(value: u64, lsb: u32, width: u32) -> u64 {
    if lsb >= 64 {
        return 0;
    }
    (value >> lsb) & mask(0, width)
}

/// Replaces the `[lsb, lsb + width)` span of `existing` with `value`,
/// leaving every other bit untouched.
pub const fn insert(existing: u64, lsb: u32, width: u32, value: u64) -> u64 {
    let m = mask(lsb, width);
    if m == 0 {
        return existing;
    }
    (existing & !m) | ((value << lsb) & m)
}

/// Value that ends up on the bus for a write in the given mode.
///
/// Clear-on-write modes pass the incoming value through unchanged; the
/// hardware applies the clear semantics.
pub const fn combine(mode: AccessMode, incoming: u64, existing: u64) -> u64 {
    match mode {
        AccessMode::RW => incoming,
        AccessMode::RO | AccessMode::RC => existing,
        AccessMode::WO | AccessMode::W1C | AccessMode::W0C => incoming,
    }
}

pub const fn requires_read_before_write(mode: AccessMode) -> bool {
    matches!(mode, AccessMode::RW)
}

/// Number of bytes needed to hold `width_bits`.
pub const fn byte_width(width_bits: u32) -> usize {
    width_bits.div_ceil(8) as usize
}

/// Transport access width for a register: the byte width rounded up to
/// 1, 2, 4 or 8.
pub const fn access_bytes(width_bits: u32) -> usize {
    match byte_width(width_bits) {
        0 | 1 => 1,
        2 => 2,
        3 | 4 => 4,
        _ => 8,
    }
}

/// Byte-enable strobe, one bit per byte, saturating at `0xF`.
pub const fn byte_enable(width_bits: u32) -> u8 {
    let bytes = byte_width(width_bits);
    if bytes >= 4 {
        0xF
    } else {
        ((1u32 << bytes) - 1) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_bits() {
        for lsb in 0..64u32 {
            for width in 1..=(64 - lsb) {
                let m = mask(lsb, width);
                assert_eq!(m.count_ones(), width, "lsb={lsb} width={width}");
                assert_eq!(m.trailing_zeros(), lsb, "lsb={lsb} width={width}");
                assert_eq!(64 - m.leading_zeros(), lsb + width, "lsb={lsb} width={width}");
            }
        }
    }

    #[test]
    fn test_mask_edges() {
        assert_eq!(mask(0, 64), u64::MAX);
        assert_eq!(mask(7, 1), 0x80);
        assert_eq!(mask(4, 4), 0xf0);
        assert_eq!(mask(0, 0), 0);
    }

    #[test]
    fn test_extract_insert() {
        assert_eq!(extract(0x81, 7, 1), 1);
        assert_eq!(extract(0x81, 0, 1), 1);
        assert_eq!(extract(0xdead_beef, 16, 16), 0xdead);
        assert_eq!(insert(0xffff_ffff, 8, 8, 0x12), 0xffff_12ff);
        assert_eq!(insert(0, 0, 4, 0xff), 0xf);
    }

    #[test]
    fn test_combine() {
        assert_eq!(combine(AccessMode::RW, 0x12, 0x34), 0x12);
        assert_eq!(combine(AccessMode::RO, 0x12, 0x34), 0x34);
        assert_eq!(combine(AccessMode::RC, 0x12, 0x34), 0x34);
        assert_eq!(combine(AccessMode::WO, 0x12, 0x34), 0x12);
        assert_eq!(combine(AccessMode::W1C, 0x12, 0x34), 0x12);
        assert_eq!(combine(AccessMode::W0C, 0x12, 0x34), 0x12);
    }

    #[test]
    fn test_read_before_write() {
        for mode in AccessMode::ALL {
            assert_eq!(requires_read_before_write(mode), mode == AccessMode::RW);
        }
    }

    #[test]
    fn test_widths_and_strobe() {
        assert_eq!(access_bytes(8), 1);
        assert_eq!(access_bytes(12), 2);
        assert_eq!(access_bytes(24), 4);
        assert_eq!(access_bytes(32), 4);
        assert_eq!(access_bytes(48), 8);
        assert_eq!(byte_enable(8), 0x1);
        assert_eq!(byte_enable(16), 0x3);
        assert_eq!(byte_enable(24), 0x7);
        assert_eq!(byte_enable(32), 0xf);
        assert_eq!(byte_enable(64), 0xf);
    }
}
