/// 16.16 signed fixed-point conversion helpers
///
/// The benchmark feeds one scene with floating-point samples and its sibling
/// with the same samples encoded as 16.16 integers, so both conversions must
/// round-trip within the encoding's precision.

/// Number of fractional bits in the encoding
pub const FRACTIONAL_BITS: u32 = 16;

/// The value 1.0 in 16.16 fixed-point
pub const ONE: i32 = 1 << FRACTIONAL_BITS;

const SCALE: f32 = ONE as f32;

/// Encode a float as 16.16 fixed-point, rounding half away from zero
pub fn to_fixed(value: f32) -> i32 {
    (value * SCALE).round() as i32
}

/// Decode a 16.16 fixed-point value back to a float
pub fn from_fixed(value: i32) -> f32 {
    value as f32 / SCALE
}
