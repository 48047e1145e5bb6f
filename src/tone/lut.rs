use super::bezier::{ControlPoint, cubic_bezier};
use crate::error::{MonoError, Result};

pub const LUT_SIZE: usize = 256;

const ORIGIN: ControlPoint = ControlPoint::new(0.0, 0.0);
const WHITE: ControlPoint = ControlPoint::new(1.0, 1.0);

/// Cubic Bezier tone curve anchored at (0,0) and (1,1).
///
/// Only the two inner control points are tunable. The curve is sampled as
/// `y(t)` with `t = level / 255`; `x(t)` is never inverted, so the inner
/// x-coordinates bend the shape only through the Bernstein weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneCurve {
    p1: ControlPoint,
    p2: ControlPoint,
}

impl ToneCurve {
    pub fn new(p1: ControlPoint, p2: ControlPoint) -> Result<Self> {
        for (name, p) in [("p1", p1), ("p2", p2)] {
            if !p.in_unit_square() {
                return Err(MonoError::InvalidCurve(format!(
                    "{name} = ({}, {}) lies outside [0,1]x[0,1]",
                    p.x, p.y
                )));
            }
        }
        Ok(Self { p1, p2 })
    }

    /// Crushed blacks, protected highlights.
    pub const fn leica_mono() -> Self {
        Self {
            p1: ControlPoint::new(0.20, 0.04),
            p2: ControlPoint::new(0.70, 0.90),
        }
    }

    /// Curve output in [0,1] for a normalized input level.
    pub fn eval(&self, t: f64) -> f64 {
        cubic_bezier(t, ORIGIN, self.p1, self.p2, WHITE).y
    }
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self::leica_mono()
    }
}

/// 256-entry brightness remap baked from a [`ToneCurve`]. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ToneCurveLut {
    table: [u8; LUT_SIZE],
}

impl ToneCurveLut {
    pub fn build(curve: &ToneCurve) -> Self {
        let mut table = [0u8; LUT_SIZE];
        for (level, entry) in table.iter_mut().enumerate() {
            let t = level as f64 / 255.0;
            let y = curve.eval(t);
            *entry = (y * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        Self { table }
    }

    #[inline]
    pub fn get(&self, level: u8) -> u8 {
        self.table[level as usize]
    }

    pub fn as_slice(&self) -> &[u8; LUT_SIZE] {
        &self.table
    }
}

impl Default for ToneCurveLut {
    fn default() -> Self {
        Self::build(&ToneCurve::leica_mono())
    }
}

impl std::fmt::Debug for ToneCurveLut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToneCurveLut")
            .field("lo", &&self.table[..4])
            .field("mid", &self.table[128])
            .field("hi", &&self.table[LUT_SIZE - 4..])
            .finish()
    }
}
