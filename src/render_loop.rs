//! Per-tick render driver.
//!
//! One `tick` runs sample -> copy -> process against the display buffer.
//! The caller decides when ticks happen (a repaint callback, a timer, or a
//! plain iterator in tests) and can stop the loop between ticks through a
//! [`LoopHandle`].

use image::RgbaImage;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::camera::session::CameraSession;
use crate::error::{MonoError, Result};
use crate::image_io;
use crate::pipeline::{MonoFilter, PipelineParams};
use crate::tone::ToneCurve;

/// Supplies the look parameters, read fresh on every tick.
pub trait ParameterSource {
    fn current(&self) -> PipelineParams;
}

impl ParameterSource for PipelineParams {
    fn current(&self) -> PipelineParams {
        *self
    }
}

/// Shared stop flag, checked at the top of every tick.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle(Arc<AtomicBool>);

impl LoopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A processed frame is in the display buffer.
    Rendered,
    /// The stream or display has no pixels yet; try again next tick.
    Waiting,
    /// Stopped via the handle, or no stream is active.
    Stopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub ticks: u64,
    pub rendered: u64,
    pub waiting: u64,
}

pub struct RenderLoop {
    filter: MonoFilter,
    display: RgbaImage,
    handle: LoopHandle,
    frames_rendered: u64,
    last_frame_ms: f64,
}

impl RenderLoop {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_curve(width, height, &ToneCurve::leica_mono())
    }

    pub fn with_curve(width: u32, height: u32, curve: &ToneCurve) -> Self {
        Self {
            filter: MonoFilter::new(curve),
            display: RgbaImage::new(width, height),
            handle: LoopHandle::default(),
            frames_rendered: 0,
            last_frame_ms: 0.0,
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    /// Display surface. Holds the last rendered frame between ticks.
    pub fn display(&self) -> &RgbaImage {
        &self.display
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Wall time of the last sample+process pass, in milliseconds.
    pub fn last_frame_ms(&self) -> f64 {
        self.last_frame_ms
    }

    /// Match the display surface to a new viewport size. Reallocates only on change.
    pub fn resize_display(&mut self, width: u32, height: u32) {
        if self.display.dimensions() != (width, height) {
            log::debug!("display resized to {width}x{height}");
            self.display = RgbaImage::new(width, height);
        }
    }

    pub fn tick(
        &mut self,
        session: &mut CameraSession,
        params: &impl ParameterSource,
    ) -> Result<TickOutcome> {
        if self.handle.is_stopped() {
            return Ok(TickOutcome::Stopped);
        }
        let Some(stream) = session.stream_mut() else {
            return Ok(TickOutcome::Stopped);
        };
        let Some(frame) = stream.grab() else {
            log::debug!("stream has no frame yet");
            return Ok(TickOutcome::Waiting);
        };

        let params = params.current();
        params.validate()?;

        let start = web_time::Instant::now();
        match image_io::draw_cover(frame, &mut self.display) {
            Ok(_) => {}
            Err(MonoError::InvalidDimensions { .. }) => {
                log::debug!(
                    "skipping tick: source {:?}, display {:?}",
                    frame.dimensions(),
                    self.display.dimensions()
                );
                return Ok(TickOutcome::Waiting);
            }
            Err(e) => return Err(e),
        }
        self.filter.process(&mut self.display, &params)?;

        self.last_frame_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.frames_rendered += 1;
        Ok(TickOutcome::Rendered)
    }

    /// Drive the loop from a refresh signal: one tick per item, until the
    /// signal ends or the loop is stopped.
    pub fn run<I>(
        &mut self,
        session: &mut CameraSession,
        params: &impl ParameterSource,
        signal: I,
    ) -> Result<LoopStats>
    where
        I: IntoIterator,
    {
        let mut stats = LoopStats::default();
        for _ in signal {
            let outcome = self.tick(session, params)?;
            if outcome == TickOutcome::Stopped {
                break;
            }
            stats.ticks += 1;
            match outcome {
                TickOutcome::Rendered => stats.rendered += 1,
                TickOutcome::Waiting => stats.waiting += 1,
                TickOutcome::Stopped => {}
            }
        }
        Ok(stats)
    }
}
