//! Bit-field extract and insert over fixed-width words.
//!
//! Bit numbering is big-endian: bit 0 is the MSB, bit `width - 1` is the
//! LSB. A field `(s, e)` with `s <= e` is the inclusive MSB-to-LSB range;
//! its width is `e - s + 1`. These two functions are the single authority
//! for field access: every register tap, microword view, and loader goes
//! through them so the bit arithmetic agrees everywhere.

/// Mask of `width` low bits.
#[must_use]
pub const fn mask(width: u32) -> u64 {
    if width >= 64 { u64::MAX } else { (1 << width) - 1 }
}

/// Extract field `(s, e)` from a word of `width` bits.
#[must_use]
pub const fn extract(word: u64, s: u32, e: u32, width: u32) -> u64 {
    debug_assert!(s <= e && e < width);
    (word >> (width - 1 - e)) & mask(e - s + 1)
}

/// Insert `value` into field `(s, e)` of a word of `width` bits.
///
/// Bits of `value` above the field width are discarded.
#[must_use]
pub const fn insert(word: u64, value: u64, s: u32, e: u32, width: u32) -> u64 {
    debug_assert!(s <= e && e < width);
    let shift = width - 1 - e;
    let m = mask(e - s + 1);
    (word & !(m << shift)) | ((value & m) << shift)
}

/// Mask of `width` low bits, 128-bit.
#[must_use]
pub const fn mask128(width: u32) -> u128 {
    if width >= 128 { u128::MAX } else { (1 << width) - 1 }
}

/// Extract field `(s, e)` from a word of `width` bits, 128-bit.
#[must_use]
pub const fn extract128(word: u128, s: u32, e: u32, width: u32) -> u128 {
    debug_assert!(s <= e && e < width);
    (word >> (width - 1 - e)) & mask128(e - s + 1)
}

/// Insert `value` into field `(s, e)` of a word of `width` bits, 128-bit.
#[must_use]
pub const fn insert128(word: u128, value: u128, s: u32, e: u32, width: u32) -> u128 {
    debug_assert!(s <= e && e < width);
    let shift = width - 1 - e;
    let m = mask128(e - s + 1);
    (word & !(m << shift)) | ((value & m) << shift)
}
