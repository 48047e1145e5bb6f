//! Snapshot export: JPEG-encode the display buffer and hand it to the platform.
//!
//! Native builds write a file (the path usually comes from a save dialog);
//! the web build triggers a browser download.

use image::RgbaImage;

use crate::error::{MonoError, Result};
use crate::image_io::{self, SNAPSHOT_QUALITY};

/// How long the browser keeps the snapshot object URL alive.
#[cfg(target_arch = "wasm32")]
const OBJECT_URL_LIFETIME_MS: i32 = 30_000;

/// Default file name for a snapshot, stamped with seconds since the epoch.
pub fn snapshot_file_name() -> String {
    let secs = web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("mono-{secs}.jpg")
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_snapshot(buffer: &RgbaImage, path: &std::path::Path) -> Result<()> {
    let bytes = image_io::encode_jpeg(buffer, SNAPSHOT_QUALITY)?;
    std::fs::write(path, &bytes)
        .map_err(|e| MonoError::Export(format!("{}: {e}", path.display())))?;
    log::info!("snapshot saved to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn download_snapshot(buffer: &RgbaImage) -> Result<()> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let js_err = |e: wasm_bindgen::JsValue| MonoError::Export(format!("{e:?}"));

    let bytes = image_io::encode_jpeg(buffer, SNAPSHOT_QUALITY)?;
    let array = js_sys::Uint8Array::from(bytes.as_slice());
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/jpeg");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let window = web_sys::window().ok_or_else(|| MonoError::Export("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| MonoError::Export("no document".into()))?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| MonoError::Export("anchor element cast failed".into()))?;
    anchor.set_href(&url);
    anchor.set_download(&snapshot_file_name());
    anchor.click();

    let revoke = Closure::once_into_js(move || {
        let _ = web_sys::Url::revoke_object_url(&url);
    });
    window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.unchecked_ref(),
            OBJECT_URL_LIFETIME_MS,
        )
        .map_err(js_err)?;

    log::info!("snapshot download started ({} bytes)", bytes.len());
    Ok(())
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn file_name_is_a_jpeg() {
        let name = snapshot_file_name();
        assert!(name.starts_with("mono-"));
        assert!(name.ends_with(".jpg"));
    }

    #[test]
    fn snapshot_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("mono_cam_test_{}.jpg", std::process::id()));
        let img = RgbaImage::from_pixel(24, 12, Rgba([77, 77, 77, 255]));
        save_snapshot(&img, &path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (24, 12));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn unwritable_path_is_an_export_error() {
        let img = RgbaImage::new(2, 2);
        let err = save_snapshot(&img, std::path::Path::new("/nonexistent/dir/shot.jpg"));
        assert!(matches!(err, Err(MonoError::Export(_))));
    }
}
