pub mod args;
pub mod cli;
pub mod config;
pub mod error;
pub mod gui;
pub mod media;
pub mod render;
pub mod session;
pub mod template_matching;
pub mod template_store;

pub use error::{AnalyzerError, AnalyzerResult};
