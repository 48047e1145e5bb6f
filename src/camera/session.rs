use super::{Facing, FrameSource, StreamConstraints, StreamProvider};
use crate::error::Result;

/// Owns the active stream, the facing preference and the provider.
///
/// At most one stream is alive: every (re)acquisition releases the previous
/// stream first.
pub struct CameraSession {
    provider: Box<dyn StreamProvider>,
    stream: Option<Box<dyn FrameSource>>,
    constraints: StreamConstraints,
}

impl CameraSession {
    pub fn new(provider: Box<dyn StreamProvider>) -> Self {
        Self::with_constraints(provider, StreamConstraints::default())
    }

    pub fn with_constraints(
        provider: Box<dyn StreamProvider>,
        constraints: StreamConstraints,
    ) -> Self {
        Self {
            provider,
            stream: None,
            constraints,
        }
    }

    pub fn facing(&self) -> Facing {
        self.constraints.facing
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Mirror the preview only for a live front camera.
    pub fn mirrors_preview(&self) -> bool {
        self.provider.mirrors_preview() && self.constraints.facing.mirrors_preview()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream_mut(&mut self) -> Option<&mut (dyn FrameSource + 'static)> {
        self.stream.as_deref_mut()
    }

    /// Release any current stream, then acquire one for the current facing.
    /// On failure the session is left without a stream.
    pub fn start(&mut self) -> Result<()> {
        self.stop();
        match self.provider.acquire(&self.constraints) {
            Ok(stream) => {
                log::info!(
                    "{} stream started ({} camera)",
                    self.provider.name(),
                    self.constraints.facing.label()
                );
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                log::warn!("{} stream failed: {e}", self.provider.name());
                Err(e)
            }
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            log::info!("{} stream released", self.provider.name());
        }
    }

    /// Flip between front and rear camera and restart.
    pub fn switch_camera(&mut self) -> Result<()> {
        self.constraints.facing = self.constraints.facing.flipped();
        self.start()
    }

    /// Swap in a different provider and start streaming from it.
    pub fn replace_provider(&mut self, provider: Box<dyn StreamProvider>) -> Result<()> {
        self.stop();
        self.provider = provider;
        self.start()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonoError;
    use image::RgbaImage;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Acquire(Facing),
        Release(Facing),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct MockSource {
        facing: Facing,
        frame: RgbaImage,
        log: Log,
    }

    impl FrameSource for MockSource {
        fn dimensions(&self) -> (u32, u32) {
            self.frame.dimensions()
        }

        fn grab(&mut self) -> Option<&RgbaImage> {
            Some(&self.frame)
        }

        fn release(&mut self) {
            self.log.borrow_mut().push(Event::Release(self.facing));
        }
    }

    struct MockProvider {
        log: Log,
        fail_rear: bool,
    }

    impl StreamProvider for MockProvider {
        fn name(&self) -> &str {
            "mock"
        }

        fn acquire(&mut self, constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>> {
            if self.fail_rear && constraints.facing == Facing::Environment {
                return Err(MonoError::DeviceUnavailable("permission denied".into()));
            }
            self.log.borrow_mut().push(Event::Acquire(constraints.facing));
            Ok(Box::new(MockSource {
                facing: constraints.facing,
                frame: RgbaImage::new(4, 3),
                log: self.log.clone(),
            }))
        }
    }

    fn session(fail_rear: bool) -> (CameraSession, Log) {
        let log = Log::default();
        let provider = MockProvider {
            log: log.clone(),
            fail_rear,
        };
        (CameraSession::new(Box::new(provider)), log)
    }

    /// Replay the event log and check no two streams were ever alive together.
    fn assert_never_overlapping(log: &[Event]) {
        let mut live = 0i32;
        for event in log {
            match event {
                Event::Acquire(_) => live += 1,
                Event::Release(_) => live -= 1,
            }
            assert!((0..=1).contains(&live), "overlapping streams in {log:?}");
        }
    }

    #[test]
    fn start_acquires_front_camera() {
        let (mut s, log) = session(false);
        s.start().unwrap();
        assert!(s.is_active());
        assert_eq!(s.stream_mut().unwrap().dimensions(), (4, 3));
        assert_eq!(*log.borrow(), vec![Event::Acquire(Facing::User)]);
    }

    #[test]
    fn switch_releases_before_acquiring() {
        let (mut s, log) = session(false);
        s.start().unwrap();
        s.switch_camera().unwrap();
        s.switch_camera().unwrap();
        assert_eq!(s.facing(), Facing::User);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Acquire(Facing::User),
                Event::Release(Facing::User),
                Event::Acquire(Facing::Environment),
                Event::Release(Facing::Environment),
                Event::Acquire(Facing::User),
            ]
        );
        assert_never_overlapping(&log.borrow());
    }

    #[test]
    fn restart_never_overlaps() {
        let (mut s, log) = session(false);
        for _ in 0..5 {
            s.start().unwrap();
        }
        s.stop();
        assert_never_overlapping(&log.borrow());
        assert!(!s.is_active());
    }

    #[test]
    fn failed_acquire_leaves_session_idle() {
        let (mut s, log) = session(true);
        s.start().unwrap();
        let err = s.switch_camera();
        assert!(matches!(err, Err(MonoError::DeviceUnavailable(_))));
        assert!(!s.is_active());
        assert_eq!(s.facing(), Facing::Environment);
        // Old stream was still released.
        assert_eq!(log.borrow().last(), Some(&Event::Release(Facing::User)));
    }

    #[test]
    fn drop_releases_stream() {
        let (mut s, log) = session(false);
        s.start().unwrap();
        drop(s);
        assert_eq!(log.borrow().last(), Some(&Event::Release(Facing::User)));
    }

    #[test]
    fn replacing_provider_releases_old_stream() {
        let (mut s, log) = session(false);
        s.start().unwrap();
        let other_log = Log::default();
        s.replace_provider(Box::new(MockProvider {
            log: other_log.clone(),
            fail_rear: false,
        }))
        .unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Event::Acquire(Facing::User), Event::Release(Facing::User)]
        );
        assert_eq!(*other_log.borrow(), vec![Event::Acquire(Facing::User)]);
    }

    #[test]
    fn only_live_front_camera_mirrors_preview() {
        use crate::camera::pattern::PatternProvider;
        use crate::camera::still::StillProvider;

        let mut live = CameraSession::new(Box::new(PatternProvider::default()));
        assert!(live.mirrors_preview());
        live.switch_camera().unwrap();
        assert!(!live.mirrors_preview());

        // A still image keeps the front-facing preference but is never mirrored.
        let still = CameraSession::new(Box::new(StillProvider::new("frame.png")));
        assert_eq!(still.facing(), Facing::User);
        assert!(!still.mirrors_preview());
    }
}
