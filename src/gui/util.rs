// gui/util.rs
// Utility helpers for GUI

use crate::media::Raster;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// PNG data URL for a raster; `None` if encoding fails.
pub fn raster_data_url(raster: &Raster) -> Option<String> {
    match raster.encode_png() {
        Ok(png) => Some(data_url("image/png", &png)),
        Err(e) => {
            log::warn!("⚠️ Could not encode image for display: {}", e);
            None
        }
    }
}

/// Seconds since the epoch, for file names.
pub fn timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_data_url() {
        assert_eq!(data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
        assert_eq!(data_url("image/jpeg", b"ab"), "data:image/jpeg;base64,YWI=");
    }

    #[test]
    fn test_raster_data_url_is_png() {
        let raster = Raster::new(RgbaImage::new(3, 2));
        let url = raster_data_url(&raster).unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
