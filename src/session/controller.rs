use super::state::SessionPhase;
use crate::config::{MatchParams, Threshold};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::media::{CameraDevice, CameraStream, FacingMode, PreviewFrame, SourceImage, TemplateImage};
use crate::render::{AnnotatedImage, MatchSummary, render};
use crate::template_matching::{EngineReadiness, MatchMethod, RawMatch, match_template};
use crate::template_store::TemplateStore;

/// Annotated image plus the summary it was drawn from.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub annotated: AnnotatedImage,
    pub summary: MatchSummary,
    pub raw: RawMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Matched(Analysis),
    /// User-facing error text
    Failed(String),
}

impl AnalysisOutcome {
    pub fn from_result(result: &AnalyzerResult<Analysis>) -> Self {
        match result {
            Ok(analysis) => AnalysisOutcome::Matched(analysis.clone()),
            Err(e) => AnalysisOutcome::Failed(format!(
                "Error processing template matching: {}",
                e.user_message()
            )),
        }
    }
}

/// Everything one analysis needs, detached from the session so the session
/// lock is not held while matching runs.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub generation: u64,
    pub source: SourceImage,
    pub template: TemplateImage,
    pub params: MatchParams,
}

impl AnalysisRequest {
    /// Match and render on the blocking pool.
    pub async fn run(self) -> AnalyzerResult<Analysis> {
        tokio::task::spawn_blocking(move || self.run_blocking()).await?
    }

    pub fn run_blocking(&self) -> AnalyzerResult<Analysis> {
        let raw = match_template(&self.source, &self.template, self.params.method)?;
        let (annotated, summary) = render(&self.source, &raw, self.params.threshold);
        Ok(Analysis {
            annotated,
            summary,
            raw,
        })
    }
}

/// Read-only view of the session for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub facing: FacingMode,
    pub camera_name: String,
    pub source: Option<SourceImage>,
    pub template: Option<TemplateImage>,
    pub params: MatchParams,
    pub outcome: Option<AnalysisOutcome>,
    pub engine_ready: bool,
    pub can_analyze: bool,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            facing: FacingMode::default(),
            camera_name: String::new(),
            source: None,
            template: None,
            params: MatchParams::default(),
            outcome: None,
            engine_ready: false,
            can_analyze: false,
        }
    }
}

pub struct Session<C: CameraDevice> {
    camera: C,
    stream: Option<C::Stream>,
    facing: FacingMode,
    source: Option<SourceImage>,
    templates: TemplateStore,
    params: MatchParams,
    outcome: Option<AnalysisOutcome>,
    phase: SessionPhase,
    /// Bumped on every analysis start, retake and reset; results carrying an
    /// older value are dropped.
    generation: u64,
    engine: EngineReadiness,
}

impl<C: CameraDevice> Session<C> {
    pub fn new(camera: C, engine: EngineReadiness) -> Self {
        Self {
            camera,
            stream: None,
            facing: FacingMode::default(),
            source: None,
            templates: TemplateStore::new(),
            params: MatchParams::default(),
            outcome: None,
            phase: SessionPhase::Idle,
            generation: 0,
            engine,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn template(&self) -> Option<&TemplateImage> {
        self.templates.get()
    }

    pub fn params(&self) -> MatchParams {
        self.params
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    // ---- camera ----

    /// Open the camera with the current facing mode. Any open stream is
    /// shut down and released first so at most one stream is ever held.
    pub async fn start_camera(&mut self) -> AnalyzerResult<()> {
        if !matches!(self.phase, SessionPhase::Idle | SessionPhase::CameraActive) {
            return Err(AnalyzerError::InvalidTransition {
                action: "start the camera",
                phase: self.phase,
            });
        }
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await;
            log::debug!("⏹️ Camera stream released before reopening");
        }

        match self.camera.open(self.facing).await {
            Ok(stream) => {
                log::info!("📷 Camera started ({}, {})", self.camera.name(), self.facing.label());
                self.stream = Some(stream);
                self.phase = SessionPhase::CameraActive;
                Ok(())
            }
            Err(e) => {
                log::warn!("⚠️ Camera failed to start: {}", e);
                self.phase = SessionPhase::Idle;
                Err(e)
            }
        }
    }

    /// Toggle front/rear. An active camera is restarted with the new facing.
    pub async fn switch_facing(&mut self) -> AnalyzerResult<FacingMode> {
        self.facing = self.facing.toggled();
        log::debug!("🔄 Facing mode now {}", self.facing.label());
        if self.phase == SessionPhase::CameraActive {
            self.start_camera().await?;
        }
        Ok(self.facing)
    }

    /// Freeze the current frame as the source image and release the camera.
    pub async fn capture(&mut self) -> AnalyzerResult<()> {
        let stream = match (self.phase, self.stream.as_mut()) {
            (SessionPhase::CameraActive, Some(stream)) => stream,
            _ => {
                return Err(AnalyzerError::InvalidTransition {
                    action: "capture",
                    phase: self.phase,
                });
            }
        };
        let frame = stream.capture_frame().await?;
        log::info!("📸 Captured {}x{} frame", frame.width(), frame.height());
        self.stop_stream();
        self.set_source(frame);
        Ok(())
    }

    pub async fn preview_frame(&mut self) -> AnalyzerResult<Option<PreviewFrame>> {
        match (self.phase, self.stream.as_mut()) {
            (SessionPhase::CameraActive, Some(stream)) => stream.preview_frame().await,
            _ => Ok(None),
        }
    }

    fn stop_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            log::debug!("⏹️ Camera stream stopped");
        }
    }

    // ---- source and template ----

    /// Decode an uploaded file as the source image. Decoding failures leave
    /// the session untouched.
    pub fn upload_source(&mut self, bytes: &[u8], mime: Option<&str>) -> AnalyzerResult<()> {
        if self.phase == SessionPhase::Processing {
            return Err(AnalyzerError::Busy);
        }
        let image = SourceImage::from_upload(bytes, mime)?;
        self.accept_source(image)
    }

    pub fn accept_source(&mut self, image: SourceImage) -> AnalyzerResult<()> {
        if self.phase == SessionPhase::Processing {
            return Err(AnalyzerError::Busy);
        }
        log::info!("🖼️ Source image set ({}x{})", image.width(), image.height());
        self.stop_stream();
        self.set_source(image);
        Ok(())
    }

    fn set_source(&mut self, image: SourceImage) {
        self.source = Some(image);
        self.outcome = None;
        self.phase = SessionPhase::Captured;
    }

    pub fn load_template(&mut self, bytes: &[u8], mime: Option<&str>) -> AnalyzerResult<()> {
        self.templates.set_template(bytes, mime).map(|_| ())
    }

    pub fn accept_template(&mut self, template: TemplateImage) {
        self.templates.set(template);
    }

    pub fn clear_template(&mut self) {
        self.templates.clear();
    }

    // ---- parameters ----

    pub fn set_threshold(&mut self, threshold: Threshold) {
        self.params.threshold = threshold;
    }

    pub fn set_method(&mut self, method: MatchMethod) {
        self.params.method = method;
    }

    // ---- analysis ----

    /// First unmet precondition for analysis, if any.
    pub fn analysis_blocker(&self) -> Option<AnalyzerError> {
        if self.phase == SessionPhase::Processing {
            Some(AnalyzerError::Busy)
        } else if self.source.is_none() {
            Some(AnalyzerError::MissingSource)
        } else if !self.templates.is_loaded() {
            Some(AnalyzerError::MissingTemplate)
        } else if !self.engine.is_ready() {
            Some(AnalyzerError::EngineUnavailable)
        } else if !matches!(self.phase, SessionPhase::Captured | SessionPhase::Resulted) {
            Some(AnalyzerError::InvalidTransition {
                action: "analyze",
                phase: self.phase,
            })
        } else {
            None
        }
    }

    pub fn can_analyze(&self) -> bool {
        self.analysis_blocker().is_none()
    }

    /// Move to `Processing` and hand out the inputs for one analysis.
    /// Rejections leave the session untouched.
    pub fn begin_analysis(&mut self) -> AnalyzerResult<AnalysisRequest> {
        if let Some(blocker) = self.analysis_blocker() {
            return Err(blocker);
        }
        let (Some(source), Some(template)) = (self.source.clone(), self.templates.get().cloned())
        else {
            return Err(AnalyzerError::MissingSource);
        };

        self.generation += 1;
        self.outcome = None;
        self.phase = SessionPhase::Processing;
        log::info!(
            "🔍 Analysis #{} started ({}, threshold {}%)",
            self.generation,
            self.params.method.label(),
            self.params.threshold.percent_label()
        );
        Ok(AnalysisRequest {
            generation: self.generation,
            source,
            template,
            params: self.params,
        })
    }

    /// Apply the outcome of `generation`. Returns false when the result is
    /// stale (a reset, retake or newer analysis happened meanwhile).
    pub fn finish_analysis(&mut self, generation: u64, outcome: AnalysisOutcome) -> bool {
        if generation != self.generation || self.phase != SessionPhase::Processing {
            log::debug!(
                "🗑️ Dropping stale analysis #{} (current #{}, {:?})",
                generation,
                self.generation,
                self.phase
            );
            return false;
        }
        match &outcome {
            AnalysisOutcome::Matched(analysis) => log::info!("✅ {}", analysis.summary.message),
            AnalysisOutcome::Failed(message) => log::error!("❌ Analysis failed: {}", message),
        }
        self.outcome = Some(outcome);
        self.phase = SessionPhase::Resulted;
        true
    }

    /// Begin, run and finish one analysis while holding `&mut self`.
    pub async fn analyze(&mut self) -> AnalyzerResult<Analysis> {
        let request = self.begin_analysis()?;
        let generation = request.generation;
        let result = request.run().await;
        self.finish_analysis(generation, AnalysisOutcome::from_result(&result));
        result
    }

    // ---- retake / reset ----

    /// Discard the source and result, keep the template, reopen the camera.
    pub async fn retake(&mut self) -> AnalyzerResult<()> {
        if !self.phase.has_source() {
            return Err(AnalyzerError::InvalidTransition {
                action: "retake",
                phase: self.phase,
            });
        }
        log::info!("↩️ Retake");
        self.source = None;
        self.outcome = None;
        self.generation += 1;
        self.phase = SessionPhase::Idle;
        self.start_camera().await
    }

    /// Back to a fresh session. Parameters and facing mode are kept.
    pub fn reset(&mut self) {
        log::info!("🔄 Session reset");
        self.stop_stream();
        self.source = None;
        self.templates.clear();
        self.outcome = None;
        self.generation += 1;
        self.phase = SessionPhase::Idle;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            facing: self.facing,
            camera_name: self.camera.name().to_string(),
            source: self.source.clone(),
            template: self.templates.get().cloned(),
            params: self.params,
            outcome: self.outcome.clone(),
            engine_ready: self.engine.is_ready(),
            can_analyze: self.can_analyze(),
        }
    }
}
