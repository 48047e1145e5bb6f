use image::RgbaImage;
use rand::Rng;

use crate::color::luminance;
use crate::error::{MonoError, Result};
use crate::grain::{self, GrainField};
use crate::tone::{ToneCurve, ToneCurveLut};

const MID_GRAY: f64 = 128.0;

/// Per-frame look parameters, read fresh from the UI every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineParams {
    /// Multiplier around mid-gray applied after the tone curve. Must be > 0.
    pub contrast: f64,
    /// Grain strength; 1.0 means +-25 levels at the extremes. Must be >= 0.
    pub grain_amount: f64,
}

impl PipelineParams {
    pub const CONTRAST_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.5;
    pub const GRAIN_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;

    pub fn validate(&self) -> Result<()> {
        if !self.contrast.is_finite() || self.contrast <= 0.0 {
            return Err(MonoError::InvalidParameter(format!(
                "contrast must be a positive number, got {}",
                self.contrast
            )));
        }
        if !self.grain_amount.is_finite() || self.grain_amount < 0.0 {
            return Err(MonoError::InvalidParameter(format!(
                "grain amount must be non-negative, got {}",
                self.grain_amount
            )));
        }
        Ok(())
    }
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            contrast: 1.35,
            grain_amount: 0.18,
        }
    }
}

/// Monochrome look: owns the baked tone curve and the grain scratch buffer
/// so neither is rebuilt per frame.
#[derive(Debug, Default)]
pub struct MonoFilter {
    lut: ToneCurveLut,
    grain: GrainField,
}

impl MonoFilter {
    pub fn new(curve: &ToneCurve) -> Self {
        Self {
            lut: ToneCurveLut::build(curve),
            grain: GrainField::new(),
        }
    }

    pub fn lut(&self) -> &ToneCurveLut {
        &self.lut
    }

    /// Stylize `buffer` in place using the thread-local RNG for grain.
    pub fn process(&mut self, buffer: &mut RgbaImage, params: &PipelineParams) -> Result<()> {
        self.process_with_rng(buffer, params, &mut rand::rng())
    }

    /// Same as [`MonoFilter::process`] with a caller-supplied RNG, for
    /// reproducible output.
    pub fn process_with_rng(
        &mut self,
        buffer: &mut RgbaImage,
        params: &PipelineParams,
        rng: &mut impl Rng,
    ) -> Result<()> {
        process(buffer, &self.lut, params, &mut self.grain, rng)
    }
}

/// Run the full monochrome pipeline on an RGBA buffer, in place.
///
/// Alpha is left untouched; R, G and B all receive the same value.
pub fn process(
    buffer: &mut RgbaImage,
    lut: &ToneCurveLut,
    params: &PipelineParams,
    grain: &mut GrainField,
    rng: &mut impl Rng,
) -> Result<()> {
    params.validate()?;

    let pixel_count = buffer.width() as usize * buffer.height() as usize;
    let samples = grain.fill(pixel_count, rng);
    let contrast = params.contrast;
    let grain_amount = params.grain_amount;
    let data: &mut [u8] = &mut **buffer;

    #[cfg(not(target_arch = "wasm32"))]
    {
        use rayon::prelude::*;
        data.par_chunks_exact_mut(4)
            .zip(samples.par_iter())
            .for_each(|(px, &g)| shade_pixel(px, g, lut, contrast, grain_amount));
    }

    #[cfg(target_arch = "wasm32")]
    for (px, &g) in data.chunks_exact_mut(4).zip(samples.iter()) {
        shade_pixel(px, g, lut, contrast, grain_amount);
    }

    Ok(())
}

/// Per-pixel kernel: luma -> tone curve -> contrast -> clamp -> grain -> clamp.
#[inline]
pub fn shade_pixel(
    px: &mut [u8],
    grain_value: u8,
    lut: &ToneCurveLut,
    contrast: f64,
    grain_amount: f64,
) {
    let level = luminance::luma_index(px[0], px[1], px[2]);

    let mut y = lut.get(level) as f64;
    y = (y - MID_GRAY) * contrast + MID_GRAY;
    y = y.clamp(0.0, 255.0);

    y += grain::grain_offset(grain_amount, grain_value);
    y = y.clamp(0.0, 255.0);

    // Clamped byte store rounds half to even.
    let v = y.round_ties_even() as u8;
    px[0] = v;
    px[1] = v;
    px[2] = v;
}
