// Raster types shared by the camera, upload and rendering paths
use crate::error::{AnalyzerError, AnalyzerResult};
use image::{GrayImage, ImageEncoder, RgbaImage};
use serde::Serialize;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, OnceLock};

/// Immutable RGBA raster. Clones share the pixel buffer; equality is identity.
#[derive(Clone)]
pub struct Raster {
    inner: Arc<RasterInner>,
}

struct RasterInner {
    pixels: RgbaImage,
    png: OnceLock<Arc<Vec<u8>>>,
}

impl Raster {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            inner: Arc::new(RasterInner {
                pixels,
                png: OnceLock::new(),
            }),
        }
    }

    /// Decode an uploaded or captured file. A declared MIME type other than
    /// `image/*` is rejected before any decoding is attempted.
    pub fn decode(bytes: &[u8], mime: Option<&str>) -> AnalyzerResult<Self> {
        if let Some(mime) = mime
            && !mime.starts_with("image/")
        {
            return Err(AnalyzerError::UnsupportedMediaType {
                mime: mime.to_string(),
            });
        }
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.inner.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.inner.pixels.height()
    }

    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.inner.pixels
    }

    /// Single-channel luminance copy used by the scoring functions.
    pub fn luma(&self) -> GrayImage {
        image::imageops::grayscale(&self.inner.pixels)
    }

    /// PNG encoding of the raster, computed once per raster.
    pub fn encode_png(&self) -> AnalyzerResult<Arc<Vec<u8>>> {
        if let Some(encoded) = self.inner.png.get() {
            return Ok(encoded.clone());
        }
        let mut buf = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                self.inner.pixels.as_raw(),
                self.width(),
                self.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| AnalyzerError::Encode {
                description: e.to_string(),
            })?;
        Ok(self.inner.png.get_or_init(|| Arc::new(buf)).clone())
    }

    pub fn same_as(&self, other: &Raster) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Raster({}x{})", self.width(), self.height())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Image the template is searched in, from a camera capture or an upload.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage(Raster);

impl SourceImage {
    pub fn from_upload(bytes: &[u8], mime: Option<&str>) -> AnalyzerResult<Self> {
        Raster::decode(bytes, mime).map(Self)
    }

    pub fn raster(&self) -> &Raster {
        &self.0
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(pixels: RgbaImage) -> Self {
        Self(Raster::new(pixels))
    }
}

impl Deref for SourceImage {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        &self.0
    }
}

/// Reference image to locate inside a [`SourceImage`].
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateImage(Raster);

impl TemplateImage {
    pub fn from_upload(bytes: &[u8], mime: Option<&str>) -> AnalyzerResult<Self> {
        Raster::decode(bytes, mime).map(Self)
    }

    pub fn raster(&self) -> &Raster {
        &self.0
    }
}

impl From<RgbaImage> for TemplateImage {
    fn from(pixels: RgbaImage) -> Self {
        Self(Raster::new(pixels))
    }
}

impl Deref for TemplateImage {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        &self.0
    }
}

/// Which camera to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FacingMode {
    #[default]
    Front,
    Rear,
}

impl FacingMode {
    /// Media-capture constraint name
    pub fn constraint(self) -> &'static str {
        match self {
            FacingMode::Front => "user",
            FacingMode::Rear => "environment",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Rear,
            FacingMode::Rear => FacingMode::Front,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FacingMode::Front => "front",
            FacingMode::Rear => "rear",
        }
    }
}
