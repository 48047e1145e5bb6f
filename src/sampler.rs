//! Cover-fit geometry: which part of a source frame to show so that it fills
//! the destination completely, cropping instead of letterboxing.

use crate::error::{MonoError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Source crop region paired with the destination region it is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingRect {
    pub source: Rect,
    pub dest: Rect,
}

/// Compute the centered crop of a `source_width x source_height` frame whose
/// aspect ratio matches the destination surface.
///
/// The destination rect always covers the full surface. Zero-area inputs are
/// rejected with [`MonoError::InvalidDimensions`].
pub fn compute_cover_fit(
    source_width: u32,
    source_height: u32,
    dest_width: u32,
    dest_height: u32,
) -> Result<SamplingRect> {
    if source_width == 0 || source_height == 0 || dest_width == 0 || dest_height == 0 {
        return Err(MonoError::InvalidDimensions {
            source_width,
            source_height,
            dest_width,
            dest_height,
        });
    }

    let vw = source_width as f64;
    let vh = source_height as f64;
    let vid_aspect = vw / vh;
    let can_aspect = dest_width as f64 / dest_height as f64;

    let source = if vid_aspect > can_aspect {
        // Source is wider: crop width.
        let sw = (vh * can_aspect).min(vw);
        Rect {
            x: (vw - sw) / 2.0,
            y: 0.0,
            width: sw,
            height: vh,
        }
    } else {
        // Source is taller: crop height.
        let sh = (vw / can_aspect).min(vh);
        Rect {
            x: 0.0,
            y: (vh - sh) / 2.0,
            width: vw,
            height: sh,
        }
    };

    Ok(SamplingRect {
        source,
        dest: Rect {
            x: 0.0,
            y: 0.0,
            width: dest_width as f64,
            height: dest_height as f64,
        },
    })
}

/// Snap a fractional crop to whole pixels that stay inside the source.
/// Returns (x, y, width, height), never zero-sized.
pub fn pixel_crop(rect: &Rect, source_width: u32, source_height: u32) -> (u32, u32, u32, u32) {
    let x = (rect.x.round().max(0.0) as u32).min(source_width.saturating_sub(1));
    let y = (rect.y.round().max(0.0) as u32).min(source_height.saturating_sub(1));
    let w = (rect.width.round().max(1.0) as u32).min(source_width - x);
    let h = (rect.height.round().max(1.0) as u32).min(source_height - y);
    (x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn landscape_source_into_portrait_crops_width() {
        let fit = compute_cover_fit(1920, 1080, 100, 200).unwrap();
        assert_eq!(fit.source.width, 540.0);
        assert_eq!(fit.source.height, 1080.0);
        assert_eq!(fit.source.x, 690.0);
        assert_eq!(fit.source.y, 0.0);
        assert_eq!(
            fit.dest,
            Rect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 200.0
            }
        );
    }

    #[test]
    fn portrait_source_into_landscape_crops_height() {
        let fit = compute_cover_fit(1080, 1920, 1920, 1080).unwrap();
        assert_eq!(fit.source.x, 0.0);
        assert_eq!(fit.source.width, 1080.0);
        assert!(approx(fit.source.height, 607.5), "{}", fit.source.height);
        assert!(approx(fit.source.y, 656.25), "{}", fit.source.y);
    }

    #[test]
    fn equal_aspect_uses_whole_source() {
        let fit = compute_cover_fit(1280, 720, 640, 360).unwrap();
        assert!(approx(fit.source.x, 0.0));
        assert!(approx(fit.source.y, 0.0));
        assert!(approx(fit.source.width, 1280.0));
        assert!(approx(fit.source.height, 720.0));
    }

    #[test]
    fn crop_matches_destination_aspect_and_stays_inside() {
        for &(sw, sh, dw, dh) in &[
            (1920, 1080, 100, 200),
            (640, 480, 1000, 10),
            (3, 7, 1920, 1080),
            (4000, 3000, 3, 3),
            (1, 1, 1, 1000),
        ] {
            let fit = compute_cover_fit(sw, sh, dw, dh).unwrap();
            let s = fit.source;
            assert!(s.x >= 0.0 && s.y >= 0.0);
            assert!(s.x + s.width <= sw as f64 + 1e-9);
            assert!(s.y + s.height <= sh as f64 + 1e-9);
            let dest_aspect = dw as f64 / dh as f64;
            assert!((s.aspect() / dest_aspect - 1.0).abs() < 1e-9, "{sw}x{sh} -> {dw}x{dh}");
            assert_eq!(fit.dest.width, dw as f64);
            assert_eq!(fit.dest.height, dh as f64);
        }
    }

    #[test]
    fn zero_area_is_rejected() {
        for &(sw, sh, dw, dh) in &[
            (0, 1080, 10, 10),
            (1920, 0, 10, 10),
            (1920, 1080, 0, 10),
            (1920, 1080, 10, 0),
        ] {
            assert!(matches!(
                compute_cover_fit(sw, sh, dw, dh),
                Err(MonoError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn pixel_crop_stays_in_bounds() {
        let fit = compute_cover_fit(1080, 1920, 1920, 1080).unwrap();
        let (x, y, w, h) = pixel_crop(&fit.source, 1080, 1920);
        assert_eq!((x, w), (0, 1080));
        assert_eq!(y, 656);
        assert!(y + h <= 1920);

        let tiny = Rect {
            x: 0.4,
            y: 0.4,
            width: 0.1,
            height: 0.1,
        };
        assert_eq!(pixel_crop(&tiny, 1, 1), (0, 0, 1, 1));
    }
}
