use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::path::Path;

use crate::error::{MonoError, Result};
use crate::sampler::{self, SamplingRect};

/// JPEG quality used for snapshots.
pub const SNAPSHOT_QUALITY: u8 = 95;

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    Ok(image::open(path)?)
}

/// Copy `source` into `dest` with cover-fit semantics: the centered crop of
/// the source is scaled to fill every destination pixel.
pub fn draw_cover(source: &RgbaImage, dest: &mut RgbaImage) -> Result<SamplingRect> {
    let (sw, sh) = source.dimensions();
    let (dw, dh) = dest.dimensions();
    let fit = sampler::compute_cover_fit(sw, sh, dw, dh)?;
    let (x, y, w, h) = sampler::pixel_crop(&fit.source, sw, sh);

    let cropped = imageops::crop_imm(source, x, y, w, h).to_image();
    if (w, h) == (dw, dh) {
        dest.copy_from_slice(cropped.as_raw());
    } else {
        let scaled = imageops::resize(&cropped, dw, dh, FilterType::Triangle);
        dest.copy_from_slice(scaled.as_raw());
    }
    Ok(fit)
}

/// Encode an RGBA buffer as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(buffer: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(MonoError::InvalidParameter(format!(
            "JPEG quality must be 1-100, got {quality}"
        )));
    }
    let rgb = DynamicImage::ImageRgba8(buffer.clone()).to_rgb8();
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
    Ok(bytes)
}

pub fn save_image(buffer: &RgbaImage, path: &Path) -> Result<()> {
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    if is_jpeg {
        let bytes = encode_jpeg(buffer, SNAPSHOT_QUALITY)?;
        std::fs::write(path, bytes)
            .map_err(|e| MonoError::Export(format!("{}: {e}", path.display())))
    } else {
        Ok(buffer.save(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn draw_cover_fills_destination_from_center() {
        // Left and right thirds red, center green: a square crop sees only green.
        let source = RgbaImage::from_fn(300, 100, |x, _| {
            if (100..200).contains(&x) {
                Rgba([0, 255, 0, 255])
            } else {
                Rgba([255, 0, 0, 255])
            }
        });
        let mut dest = RgbaImage::new(50, 50);
        let fit = draw_cover(&source, &mut dest).unwrap();
        assert_eq!(fit.source.x, 100.0);
        assert_eq!(fit.source.width, 100.0);
        for px in dest.pixels() {
            assert_eq!(*px, Rgba([0, 255, 0, 255]));
        }
    }

    #[test]
    fn draw_cover_same_size_is_a_copy() {
        let source = RgbaImage::from_fn(8, 4, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let mut dest = RgbaImage::new(8, 4);
        draw_cover(&source, &mut dest).unwrap();
        assert_eq!(dest, source);
    }

    #[test]
    fn draw_cover_rejects_empty_source() {
        let source = RgbaImage::new(0, 0);
        let mut dest = RgbaImage::new(4, 4);
        assert!(matches!(
            draw_cover(&source, &mut dest),
            Err(MonoError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn jpeg_snapshot_has_magic_bytes() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([90, 90, 90, 128]));
        let bytes = encode_jpeg(&img, SNAPSHOT_QUALITY).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert!(encode_jpeg(&img, 0).is_err());
    }
}
