//! Synthetic film grain.
//!
//! One byte per pixel, regenerated every frame. Each sample is the mean of
//! four uniform draws (Irwin-Hall), which gives a bell-shaped spread around
//! mid-gray without a proper Gaussian sampler.

use rand::Rng;

/// Mid-point of the grain byte range.
pub const GRAIN_CENTER: f64 = 127.5;

/// Peak luminance offset at `grain_amount = 1.0`.
pub const GRAIN_STRENGTH: f64 = 25.0;

const DRAWS: u32 = 4;

/// Draw a single grain value in [0, 255].
#[inline]
pub fn sample(rng: &mut impl Rng) -> u8 {
    let mut sum = 0.0;
    for _ in 0..DRAWS {
        sum += rng.random::<f64>();
    }
    let n = sum / DRAWS as f64;
    (n * 255.0) as u8
}

/// Map a grain byte onto [-1, 1].
#[inline]
pub fn centered(value: u8) -> f64 {
    (value as f64 - GRAIN_CENTER) / GRAIN_CENTER
}

/// Luminance offset contributed by a grain byte at the given amount.
#[inline]
pub fn grain_offset(grain_amount: f64, value: u8) -> f64 {
    grain_amount * GRAIN_STRENGTH * centered(value)
}

/// Per-frame grain scratch buffer. Contents never outlive one `fill`.
#[derive(Debug, Default)]
pub struct GrainField {
    samples: Vec<u8>,
}

impl GrainField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Regenerate `len` fresh samples, discarding the previous frame's.
    pub fn fill(&mut self, len: usize, rng: &mut impl Rng) -> &[u8] {
        self.samples.clear();
        self.samples.reserve(len);
        for _ in 0..len {
            self.samples.push(sample(&mut *rng));
        }
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
