/// Rec.709 luma weights.
pub const REC709_R: f64 = 0.2126;
pub const REC709_G: f64 = 0.7152;
pub const REC709_B: f64 = 0.0722;

/// Perceptual brightness of an 8-bit RGB triple, in [0, 255].
#[inline]
pub fn rec709_luma(r: u8, g: u8, b: u8) -> f64 {
    REC709_R * r as f64 + REC709_G * g as f64 + REC709_B * b as f64
}

/// Luma truncated toward zero into a LUT index.
///
/// Truncation, not rounding: it is part of the look's quantisation.
#[inline]
pub fn luma_index(r: u8, g: u8, b: u8) -> u8 {
    rec709_luma(r, g, b).clamp(0.0, 255.0) as u8
}
