//! Matching engine readiness.
//!
//! The engine is considered loaded once a small self-test match has run on
//! the blocking pool. Until then analysis stays disabled.

use super::matcher::match_template;
use super::types::{MatchLocation, MatchMethod};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::media::{SourceImage, TemplateImage};
use image::{Rgba, RgbaImage};
use tokio::sync::watch;

/// One-shot readiness signal, cheap to clone into components.
#[derive(Clone, Debug)]
pub struct EngineReadiness {
    rx: watch::Receiver<bool>,
}

impl EngineReadiness {
    /// Start the self-test on the tokio blocking pool. Must be called from
    /// inside a tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::task::spawn_blocking(self_test).await {
                Ok(Ok(())) => {
                    log::info!("✅ Matching engine ready");
                    let _ = tx.send(true);
                }
                Ok(Err(e)) => log::error!("❌ Matching engine self-test failed: {}", e),
                Err(e) => log::error!("❌ Matching engine self-test panicked: {}", e),
            }
        });
        Self { rx }
    }

    /// Already-resolved signal, for the headless path.
    pub fn ready() -> Self {
        let (_tx, rx) = watch::channel(true);
        Self { rx }
    }

    /// Signal resolved by hand through the returned sender.
    #[cfg(test)]
    pub(crate) fn pending() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once ready; fails if the self-test failed.
    pub async fn wait_ready(&self) -> AnalyzerResult<()> {
        let mut rx = self.rx.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| AnalyzerError::EngineUnavailable)
    }
}

fn self_test() -> AnalyzerResult<()> {
    let pixels = RgbaImage::from_fn(48, 40, |x, y| {
        let v = ((x * 29 + y * 61 + (x ^ y) * 7) % 251) as u8;
        Rgba([v, v, v, 255])
    });
    let expected = MatchLocation { x: 17, y: 21 };
    let template = TemplateImage::from(
        image::imageops::crop_imm(&pixels, expected.x, expected.y, 12, 10).to_image(),
    );
    let source = SourceImage::from(pixels);

    for method in [MatchMethod::CoefficientNormalized, MatchMethod::SquaredDifference] {
        let found = match_template(&source, &template, method)?;
        if found.location != expected {
            log::warn!(
                "⚠️ Self-test {} located ({}, {}) instead of ({}, {})",
                method.label(),
                found.location.x,
                found.location.y,
                expected.x,
                expected.y
            );
            return Err(AnalyzerError::EngineUnavailable);
        }
    }
    Ok(())
}
