use image::RgbaImage;
use std::path::PathBuf;

use super::{FrameSource, StreamConstraints, StreamProvider};
use crate::error::{MonoError, Result};
use crate::image_io;

/// Serves a single decoded image as a never-changing stream, whatever the facing.
#[derive(Debug, Clone)]
pub struct StillProvider {
    path: PathBuf,
}

impl StillProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StreamProvider for StillProvider {
    fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Still image")
    }

    fn acquire(&mut self, _constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>> {
        let img = image_io::load_image(&self.path)
            .map_err(|e| MonoError::DeviceUnavailable(format!("{}: {e}", self.path.display())))?;
        Ok(Box::new(StillSource::new(img.to_rgba8())))
    }
}

pub struct StillSource {
    frame: Option<RgbaImage>,
}

impl StillSource {
    pub fn new(frame: RgbaImage) -> Self {
        Self { frame: Some(frame) }
    }
}

impl FrameSource for StillSource {
    fn dimensions(&self) -> (u32, u32) {
        self.frame.as_ref().map_or((0, 0), |f| f.dimensions())
    }

    fn grab(&mut self) -> Option<&RgbaImage> {
        self.frame.as_ref()
    }

    fn release(&mut self) {
        self.frame = None;
    }
}
