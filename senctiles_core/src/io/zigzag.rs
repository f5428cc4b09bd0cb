//! 32-bit zigzag mapping used by vector tile geometry parameters.
//!
//! Signed integers are mapped onto unsigned ones so that values of small magnitude stay
//! small: `0 → 0`, `-1 → 1`, `1 → 2`, `-2 → 3`, ...

/// Maps a signed 32-bit integer onto its zigzag representation.
#[must_use]
pub fn zigzag_encode(value: i32) -> u32 {
	((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode`].
#[must_use]
pub fn zigzag_decode(value: u32) -> i32 {
	((value >> 1) as i32) ^ -((value & 1) as i32)
}
