//! Frame sources and the session that owns them.
//!
//! The filter never talks to a device directly. A [`StreamProvider`] hands
//! out [`FrameSource`]s for a requested facing; [`session::CameraSession`]
//! makes sure only one of them is alive at a time.

pub mod pattern;
pub mod session;
pub mod still;

use image::RgbaImage;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    /// Front camera.
    #[default]
    User,
    /// Rear camera.
    Environment,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::User => Facing::Environment,
            Facing::Environment => Facing::User,
        }
    }

    /// Front camera preview reads like a mirror. Snapshots are never mirrored.
    pub fn mirrors_preview(self) -> bool {
        self == Facing::User
    }

    pub fn label(self) -> &'static str {
        match self {
            Facing::User => "Front",
            Facing::Environment => "Rear",
        }
    }
}

/// What to ask the provider for when acquiring a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            facing: Facing::User,
            ideal_width: 1920,
            ideal_height: 1080,
        }
    }
}

/// A live sequence of frames.
pub trait FrameSource {
    /// Current frame size. `(0, 0)` while the stream is still warming up.
    fn dimensions(&self) -> (u32, u32);

    /// Advance to the latest frame. `None` if nothing has arrived yet.
    fn grab(&mut self) -> Option<&RgbaImage>;

    /// Stop the underlying device. Further `grab`s return `None`.
    fn release(&mut self);
}

/// Acquires frame sources. Failures map to `MonoError::DeviceUnavailable`.
pub trait StreamProvider {
    fn name(&self) -> &str;

    /// Whether a front-facing stream from this provider should be shown
    /// mirrored. Only live cameras read like a mirror; files never do.
    fn mirrors_preview(&self) -> bool {
        false
    }

    fn acquire(&mut self, constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>>;
}
