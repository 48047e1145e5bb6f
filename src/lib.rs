//! Mono Cam - live monochrome camera look.
//!
//! Tone curve, grain and cover-fit sampling for the viewer and the
//! headless still tool.

pub mod camera;
pub mod color;
pub mod error;
pub mod export;
pub mod grain;
pub mod image_io;
pub mod pipeline;
pub mod render_loop;
pub mod sampler;
pub mod tone;

pub use error::{MonoError, Result};
pub use pipeline::{MonoFilter, PipelineParams};
