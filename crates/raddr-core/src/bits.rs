//! Bit-field helpers over fixed byte arrays
//!
//! Bit indices count from the most significant bit of the first byte, so
//! bit 0 is the leftmost bit of the binary rendering and a prefix of length
//! `n` covers bits `0..n`.

use crate::BITS_PER_BYTE;

/// Mask with the `n` most significant bits of a byte set
///
/// `n` is clamped to 8.
pub fn high_mask(n: usize) -> u8 {
    if n == 0 {
        0
    } else if n >= BITS_PER_BYTE {
        0xff
    } else {
        0xff << (BITS_PER_BYTE - n)
    }
}

/// Mask selecting the bits of byte `index` that fall into `[start, end)`
fn byte_mask(index: usize, start: usize, end: usize) -> u8 {
    let first = index * BITS_PER_BYTE;
    let lo = start.clamp(first, first + BITS_PER_BYTE) - first;
    let hi = end.clamp(first, first + BITS_PER_BYTE) - first;
    if lo >= hi {
        return 0;
    }
    high_mask(hi) & !high_mask(lo)
}

/// Copy of `bytes` with only the bits in `[start, end)` kept
pub fn field<const N: usize>(bytes: &[u8; N], start: usize, end: usize) -> [u8; N] {
    let mut out = [0u8; N];
    for (i, (o, b)) in out.iter_mut().zip(bytes).enumerate() {
        *o = b & byte_mask(i, start, end);
    }
    out
}

/// Whether every bit in `[start, end)` is set
///
/// An empty range is vacuously all ones.
pub fn all_ones(bytes: &[u8], start: usize, end: usize) -> bool {
    bytes.iter().enumerate().all(|(i, b)| {
        let mask = byte_mask(i, start, end);
        b & mask == mask
    })
}

/// Overwrite the first `prefix_len` bits of `dst` with those of `src`
///
/// Full bytes are copied, the boundary byte keeps its low bits from `dst`.
pub fn overwrite_prefix(dst: &mut [u8], src: &[u8], prefix_len: usize) {
    let mut bits = prefix_len;
    for (d, s) in dst.iter_mut().zip(src) {
        if bits < BITS_PER_BYTE {
            let mask = high_mask(bits);
            *d = (*d & !mask) | (s & mask);
            break;
        }

        *d = *s;
        bits -= BITS_PER_BYTE;
    }
}

/// Position of a bit range relative to a prefix boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Entirely inside the prefix
    Prefix,
    /// Entirely after the prefix
    Suffix,
    /// Crosses the prefix boundary
    Both,
}

/// Where the bit range `[start, end)` lies relative to `prefix_len`
pub fn side(start: usize, end: usize, prefix_len: usize) -> Side {
    if end <= prefix_len {
        Side::Prefix
    } else if start >= prefix_len {
        Side::Suffix
    } else {
        Side::Both
    }
}

/// Render bytes as `%08b` groups of `per_group` bytes joined by `separator`
pub fn binary(bytes: &[u8], per_group: usize, separator: char) -> String {
    let per_group = per_group.max(1);
    let mut out = String::with_capacity(bytes.len() * (BITS_PER_BYTE + 1));
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && i % per_group == 0 {
            out.push(separator);
        }
        out.push_str(&format!("{:08b}", b));
    }
    out
}
