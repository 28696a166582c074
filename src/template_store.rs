//! Holds the single user-supplied template, independent of the source image.

use crate::error::AnalyzerResult;
use crate::media::TemplateImage;

#[derive(Debug, Default, Clone)]
pub struct TemplateStore {
    template: Option<TemplateImage>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and store a template; the previous one is kept if decoding fails.
    pub fn set_template(&mut self, bytes: &[u8], mime: Option<&str>) -> AnalyzerResult<&TemplateImage> {
        let template = TemplateImage::from_upload(bytes, mime)?;
        Ok(self.set(template))
    }

    pub fn set(&mut self, template: TemplateImage) -> &TemplateImage {
        log::info!("🧩 Template loaded ({}x{})", template.width(), template.height());
        self.template.insert(template)
    }

    pub fn clear(&mut self) {
        if self.template.take().is_some() {
            log::debug!("🧩 Template cleared");
        }
    }

    pub fn get(&self) -> Option<&TemplateImage> {
        self.template.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.template.is_some()
    }
}
