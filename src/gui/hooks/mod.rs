pub mod camera_preview;
pub mod engine_ready;
pub mod types;

pub use camera_preview::use_camera_preview;
pub use engine_ready::use_engine_ready;
pub use types::*;
