// Media source provider: camera streams and uploaded files normalized into
// displayable rasters.

pub mod backend;
pub mod camera;
pub mod ffmpeg;
pub mod replay;
pub mod types;

pub use backend::{BackendStream, CameraBackend};
pub use camera::{CameraDevice, CameraStream, PreviewFrame};
pub use types::{FacingMode, ImageSize, Raster, SourceImage, TemplateImage};
