//! Synthetic camera: an animated scene that stands in for a real device.

use image::{Rgba, RgbaImage};

use super::{Facing, FrameSource, StreamConstraints, StreamProvider};
use crate::error::{MonoError, Result};

/// Hands out [`PatternSource`]s. Each facing can be switched off to
/// simulate a missing camera.
#[derive(Debug, Clone)]
pub struct PatternProvider {
    pub warmup_frames: u32,
    pub has_front: bool,
    pub has_rear: bool,
}

impl Default for PatternProvider {
    fn default() -> Self {
        Self {
            warmup_frames: 2,
            has_front: true,
            has_rear: true,
        }
    }
}

impl StreamProvider for PatternProvider {
    fn name(&self) -> &str {
        "Test pattern"
    }

    fn mirrors_preview(&self) -> bool {
        true
    }

    fn acquire(&mut self, constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>> {
        let available = match constraints.facing {
            Facing::User => self.has_front,
            Facing::Environment => self.has_rear,
        };
        if !available {
            return Err(MonoError::DeviceUnavailable(format!(
                "no {} camera",
                constraints.facing.label().to_lowercase()
            )));
        }
        Ok(Box::new(PatternSource::new(
            constraints.ideal_width,
            constraints.ideal_height,
            constraints.facing,
            self.warmup_frames,
        )))
    }
}

/// Diagonal gradient with a gray-step wedge and a disc orbiting the center.
pub struct PatternSource {
    width: u32,
    height: u32,
    facing: Facing,
    warmup_left: u32,
    frame_index: u64,
    frame: RgbaImage,
    released: bool,
}

impl PatternSource {
    pub fn new(width: u32, height: u32, facing: Facing, warmup_frames: u32) -> Self {
        Self {
            width,
            height,
            facing,
            warmup_left: warmup_frames,
            frame_index: 0,
            frame: RgbaImage::new(0, 0),
            released: false,
        }
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    fn render(&mut self) {
        let (w, h) = (self.width, self.height);
        if self.frame.dimensions() != (w, h) {
            self.frame = RgbaImage::new(w, h);
        }

        let phase = self.frame_index as f64 * 0.05;
        let cx = w as f64 * (0.5 + 0.3 * phase.cos());
        let cy = h as f64 * (0.5 + 0.3 * phase.sin());
        let radius = w.min(h) as f64 * 0.12;
        let wedge_top = h - h / 8;
        // Warm tint for the front camera, cool for the rear.
        let tint = match self.facing {
            Facing::User => [1.0, 0.85, 0.7],
            Facing::Environment => [0.7, 0.85, 1.0],
        };

        for (x, y, px) in self.frame.enumerate_pixels_mut() {
            if y >= wedge_top {
                let step = (x * 11 / w.max(1)) as f64;
                let v = (step * 25.5).round() as u8;
                *px = Rgba([v, v, v, 255]);
                continue;
            }
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let base = if dx * dx + dy * dy < radius * radius {
                235.0
            } else {
                (x as f64 / w as f64 * 0.6 + y as f64 / h as f64 * 0.4) * 255.0
            };
            *px = Rgba([
                (base * tint[0]) as u8,
                (base * tint[1]) as u8,
                (base * tint[2]) as u8,
                255,
            ]);
        }
    }
}

impl FrameSource for PatternSource {
    fn dimensions(&self) -> (u32, u32) {
        if self.released || self.warmup_left > 0 {
            (0, 0)
        } else {
            (self.width, self.height)
        }
    }

    fn grab(&mut self) -> Option<&RgbaImage> {
        if self.released {
            return None;
        }
        if self.warmup_left > 0 {
            self.warmup_left -= 1;
            return None;
        }
        self.render();
        self.frame_index += 1;
        Some(&self.frame)
    }

    fn release(&mut self) {
        self.released = true;
        self.frame = RgbaImage::new(0, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warms_up_before_producing_frames() {
        let mut src = PatternSource::new(32, 18, Facing::User, 2);
        assert_eq!(src.dimensions(), (0, 0));
        assert!(src.grab().is_none());
        assert!(src.grab().is_none());
        assert_eq!(src.dimensions(), (32, 18));
        let frame = src.grab().unwrap();
        assert_eq!(frame.dimensions(), (32, 18));
        assert_eq!(src.frame_index(), 1);
    }

    #[test]
    fn frames_move_over_time() {
        let mut src = PatternSource::new(64, 64, Facing::Environment, 0);
        let first = src.grab().unwrap().clone();
        for _ in 0..10 {
            src.grab();
        }
        assert_ne!(&first, src.grab().unwrap());
    }

    #[test]
    fn released_source_goes_dark() {
        let mut src = PatternSource::new(8, 8, Facing::User, 0);
        assert!(src.grab().is_some());
        src.release();
        assert_eq!(src.dimensions(), (0, 0));
        assert!(src.grab().is_none());
    }

    #[test]
    fn missing_facing_is_unavailable() {
        let mut provider = PatternProvider {
            has_rear: false,
            ..Default::default()
        };
        let rear = StreamConstraints {
            facing: Facing::Environment,
            ..Default::default()
        };
        assert!(matches!(
            provider.acquire(&rear),
            Err(MonoError::DeviceUnavailable(_))
        ));
        assert!(provider.acquire(&StreamConstraints::default()).is_ok());
    }
}
