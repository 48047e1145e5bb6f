//! Error taxonomy for acquisition, tuning inputs and export.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonoError {
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    #[error(
        "invalid dimensions: source {source_width}x{source_height}, destination {dest_width}x{dest_height}"
    )]
    InvalidDimensions {
        source_width: u32,
        source_height: u32,
        dest_width: u32,
        dest_height: u32,
    },
    #[error("invalid tone curve: {0}")]
    InvalidCurve(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("export failed: {0}")]
    Export(String),
}

pub type Result<T> = std::result::Result<T, MonoError>;
