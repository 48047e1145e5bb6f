//! Tone curve: a cubic Bezier S-curve baked into a 256-entry lookup table.

pub mod bezier;
pub mod lut;

pub use bezier::ControlPoint;
pub use lut::{ToneCurve, ToneCurveLut};
