// Tests for the session state machine
// Focus: camera lifecycle, analysis gating, stale results, retake/reset

#[cfg(test)]
mod session_tests {
    use super::super::*;
    use crate::config::Threshold;
    use crate::error::{AnalyzerError, AnalyzerResult};
    use crate::media::{CameraDevice, CameraStream, FacingMode, PreviewFrame, SourceImage, TemplateImage};
    use crate::template_matching::{EngineReadiness, MatchLocation, MatchMethod};
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    // ============================================================
    // MOCK CAMERA
    // ============================================================

    #[derive(Default)]
    struct Counters {
        open: AtomicUsize,
        max_open: AtomicUsize,
        opened_total: AtomicUsize,
        /// Streams released through `shutdown` rather than a plain stop
        shutdowns: AtomicUsize,
        fail_open: AtomicBool,
    }

    struct MockCamera {
        counters: Arc<Counters>,
        frame: RgbaImage,
    }

    struct MockStream {
        counters: Arc<Counters>,
        frame: RgbaImage,
        stopped: bool,
    }

    impl CameraDevice for MockCamera {
        type Stream = MockStream;

        async fn open(&self, _facing: FacingMode) -> AnalyzerResult<MockStream> {
            if self.counters.fail_open.load(Ordering::SeqCst) {
                return Err(AnalyzerError::CameraAccess {
                    device: "mock".into(),
                    reason: "permission denied".into(),
                });
            }
            let now = self.counters.open.fetch_add(1, Ordering::SeqCst) + 1;
            self.counters.max_open.fetch_max(now, Ordering::SeqCst);
            self.counters.opened_total.fetch_add(1, Ordering::SeqCst);
            Ok(MockStream {
                counters: self.counters.clone(),
                frame: self.frame.clone(),
                stopped: false,
            })
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    impl CameraStream for MockStream {
        async fn capture_frame(&mut self) -> AnalyzerResult<SourceImage> {
            Ok(SourceImage::from(self.frame.clone()))
        }

        async fn preview_frame(&mut self) -> AnalyzerResult<Option<PreviewFrame>> {
            Ok(Some(PreviewFrame {
                bytes: vec![1, 2, 3],
                mime: "image/png",
            }))
        }

        fn stop(&mut self) {
            if !self.stopped {
                self.stopped = true;
                self.counters.open.fetch_sub(1, Ordering::SeqCst);
            }
        }

        async fn shutdown(&mut self) {
            if !self.stopped {
                self.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
            }
            self.stop();
        }
    }

    impl Drop for MockStream {
        fn drop(&mut self) {
            self.stop();
        }
    }

    fn scene() -> RgbaImage {
        RgbaImage::from_fn(80, 60, |x, y| {
            let v = ((x * 13 + y * 29 + (x * y) % 11) % 239) as u8;
            Rgba([v, 255 - v, v / 2, 255])
        })
    }

    fn template_at(x: u32, y: u32) -> TemplateImage {
        TemplateImage::from(image::imageops::crop_imm(&scene(), x, y, 16, 12).to_image())
    }

    fn session() -> (Session<MockCamera>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let camera = MockCamera {
            counters: counters.clone(),
            frame: scene(),
        };
        (Session::new(camera, EngineReadiness::ready()), counters)
    }

    fn open_streams(counters: &Counters) -> usize {
        counters.open.load(Ordering::SeqCst)
    }

    // ============================================================
    // CAMERA LIFECYCLE
    // ============================================================

    #[tokio::test]
    async fn test_start_capture_moves_to_captured() {
        let (mut session, counters) = session();
        assert_eq!(session.phase(), SessionPhase::Idle);

        session.start_camera().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::CameraActive);
        assert_eq!(open_streams(&counters), 1);

        session.capture().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Captured);
        assert_eq!(open_streams(&counters), 0, "Capture must release the camera");
        assert_eq!(session.source().map(|s| s.width()), Some(80));
    }

    #[tokio::test]
    async fn test_switch_facing_never_holds_two_streams() {
        let (mut session, counters) = session();
        session.start_camera().await.unwrap();

        for _ in 0..4 {
            session.switch_facing().await.unwrap();
        }
        assert_eq!(session.facing(), FacingMode::Front);
        assert_eq!(counters.max_open.load(Ordering::SeqCst), 1);
        assert_eq!(counters.opened_total.load(Ordering::SeqCst), 5);
        assert_eq!(
            counters.shutdowns.load(Ordering::SeqCst),
            4,
            "Each restart must wait for the previous stream to be released"
        );
        assert_eq!(open_streams(&counters), 1);
    }

    #[tokio::test]
    async fn test_switch_facing_while_idle_only_toggles() {
        let (mut session, counters) = session();
        let facing = session.switch_facing().await.unwrap();
        assert_eq!(facing, FacingMode::Rear);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(counters.opened_total.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_camera_failure_stays_idle() {
        let (mut session, counters) = session();
        counters.fail_open.store(true, Ordering::SeqCst);

        let err = session.start_camera().await.unwrap_err();
        assert!(err.is_camera_error());
        assert!(err.user_message().starts_with("Unable to access camera"));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_camera_failure_while_active_falls_back_to_idle() {
        let (mut session, counters) = session();
        session.start_camera().await.unwrap();
        counters.fail_open.store(true, Ordering::SeqCst);

        assert!(session.switch_facing().await.is_err());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(open_streams(&counters), 0);
    }

    #[tokio::test]
    async fn test_capture_requires_active_camera() {
        let (mut session, _) = session();
        assert!(matches!(
            session.capture().await,
            Err(AnalyzerError::InvalidTransition { .. })
        ));
        assert_eq!(session.preview_frame().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_preview_only_while_active() {
        let (mut session, _) = session();
        session.start_camera().await.unwrap();
        assert!(session.preview_frame().await.unwrap().is_some());
    }

    // ============================================================
    // UPLOADS
    // ============================================================

    #[tokio::test]
    async fn test_upload_stops_camera() {
        let (mut session, counters) = session();
        session.start_camera().await.unwrap();

        session.accept_source(SourceImage::from(scene())).unwrap();
        assert_eq!(session.phase(), SessionPhase::Captured);
        assert_eq!(open_streams(&counters), 0);
    }

    #[test]
    fn test_invalid_upload_leaves_state_unchanged() {
        let (mut session, _) = session();
        assert!(matches!(
            session.upload_source(b"%PDF-1.4", Some("application/pdf")),
            Err(AnalyzerError::UnsupportedMediaType { .. })
        ));
        assert!(session.upload_source(b"garbage", Some("image/png")).is_err());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.source().is_none());
    }

    // ============================================================
    // ANALYSIS GATING
    // ============================================================

    #[tokio::test]
    async fn test_missing_template_blocks_analysis() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();

        assert!(!session.can_analyze());
        assert!(matches!(session.begin_analysis(), Err(AnalyzerError::MissingTemplate)));
        assert_eq!(session.phase(), SessionPhase::Captured);
        assert!(session.outcome().is_none());
    }

    #[test]
    fn test_missing_source_blocks_analysis() {
        let (mut session, _) = session();
        session.accept_template(template_at(0, 0));
        assert!(matches!(session.begin_analysis(), Err(AnalyzerError::MissingSource)));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_engine_not_ready_blocks_analysis() {
        let counters = Arc::new(Counters::default());
        let (tx, engine) = EngineReadiness::pending();
        let mut session = Session::new(
            MockCamera {
                counters,
                frame: scene(),
            },
            engine,
        );
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(4, 4));

        assert!(matches!(session.begin_analysis(), Err(AnalyzerError::EngineUnavailable)));
        tx.send(true).unwrap();
        assert!(session.can_analyze());
    }

    #[tokio::test]
    async fn test_analysis_while_processing_is_busy() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(4, 4));

        let _request = session.begin_analysis().unwrap();
        assert_eq!(session.phase(), SessionPhase::Processing);
        assert!(matches!(session.begin_analysis(), Err(AnalyzerError::Busy)));
        assert!(matches!(
            session.accept_source(SourceImage::from(scene())),
            Err(AnalyzerError::Busy)
        ));
    }

    #[tokio::test]
    async fn test_analyze_locates_template() {
        let (mut session, _) = session();
        session.start_camera().await.unwrap();
        session.capture().await.unwrap();
        session.accept_template(template_at(40, 30));

        let analysis = session.analyze().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Resulted);
        assert!(analysis.summary.found);
        assert_eq!(analysis.summary.location, MatchLocation { x: 40, y: 30 });
        assert!(matches!(session.outcome(), Some(AnalysisOutcome::Matched(_))));
    }

    #[tokio::test]
    async fn test_parameters_apply_to_next_analysis() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(10, 20));

        let first = session.analyze().await.unwrap();
        assert_eq!(first.summary.method, MatchMethod::CoefficientNormalized);

        session.set_method(MatchMethod::SquaredDifferenceNormalized);
        session.set_threshold(Threshold::new(1.0).unwrap());
        let second = session.analyze().await.unwrap();
        assert_eq!(second.summary.method, MatchMethod::SquaredDifferenceNormalized);
        assert!(!second.summary.found, "Nothing beats a threshold of 100%");
    }

    #[tokio::test]
    async fn test_repeated_analysis_is_identical() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(25, 17));

        for method in MatchMethod::ALL {
            session.set_method(method);
            let first = session.analyze().await.unwrap();
            let second = session.analyze().await.unwrap();
            assert_eq!(first.summary.found, second.summary.found, "{method:?}");
            assert_eq!(first.summary.location, second.summary.location, "{method:?}");
            assert_eq!(first.summary.confidence, second.summary.confidence, "{method:?}");
            assert!(first.annotated.pixels() == second.annotated.pixels(), "{method:?}");
        }
    }

    #[tokio::test]
    async fn test_exact_crop_found_with_every_method() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(40, 30));

        for method in MatchMethod::ALL {
            session.set_method(method);
            let analysis = session.analyze().await.unwrap();
            assert!(
                analysis.summary.found,
                "{method:?} scored {} on an exact crop",
                analysis.summary.confidence
            );
        }
    }

    #[tokio::test]
    async fn test_oversized_template_reports_failure() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(RgbaImage::new(8, 8))).unwrap();
        session.accept_template(template_at(0, 0));

        assert!(matches!(
            session.analyze().await,
            Err(AnalyzerError::TemplateTooLarge { .. })
        ));
        assert_eq!(session.phase(), SessionPhase::Resulted);
        match session.outcome() {
            Some(AnalysisOutcome::Failed(message)) => {
                assert!(message.starts_with("Error processing template matching: "), "{message}");
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    // ============================================================
    // STALE RESULTS, RETAKE, RESET
    // ============================================================

    #[tokio::test]
    async fn test_result_after_reset_is_discarded() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(4, 4));

        let request = session.begin_analysis().unwrap();
        let generation = request.generation;
        session.reset();

        let analysis = request.run().await.unwrap();
        assert!(!session.finish_analysis(generation, AnalysisOutcome::Matched(analysis)));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.outcome().is_none());
    }

    #[tokio::test]
    async fn test_result_after_retake_is_discarded() {
        let (mut session, counters) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(4, 4));

        let request = session.begin_analysis().unwrap();
        session.retake().await.unwrap();
        assert_eq!(open_streams(&counters), 1);

        assert!(!session.finish_analysis(request.generation, AnalysisOutcome::Failed("late".into())));
        assert_eq!(session.phase(), SessionPhase::CameraActive);
        assert!(session.outcome().is_none());
    }

    #[tokio::test]
    async fn test_retake_keeps_template() {
        let (mut session, counters) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        let template = template_at(2, 2);
        session.accept_template(template.clone());
        session.analyze().await.unwrap();

        session.retake().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::CameraActive);
        assert!(session.source().is_none());
        assert!(session.outcome().is_none());
        assert_eq!(session.template(), Some(&template));
        assert_eq!(open_streams(&counters), 1);
    }

    #[tokio::test]
    async fn test_retake_without_source_is_rejected() {
        let (mut session, _) = session();
        assert!(session.retake().await.is_err());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let (mut session, counters) = session();
        session.set_method(MatchMethod::CrossCorrelationNormalized);
        session.start_camera().await.unwrap();
        session.accept_template(template_at(1, 1));

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.source().is_none());
        assert!(session.template().is_none());
        assert!(session.outcome().is_none());
        assert_eq!(open_streams(&counters), 0, "Reset must stop the camera");
        assert_eq!(session.params().method, MatchMethod::CrossCorrelationNormalized);
    }

    #[tokio::test]
    async fn test_reset_after_result_clears_source_template_and_annotation() {
        let (mut session, counters) = session();
        session.start_camera().await.unwrap();
        session.capture().await.unwrap();
        session.accept_template(template_at(40, 30));
        session.analyze().await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Resulted);
        assert!(matches!(session.outcome(), Some(AnalysisOutcome::Matched(_))));

        session.reset();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert!(snapshot.source.is_none());
        assert!(snapshot.template.is_none());
        assert!(snapshot.outcome.is_none(), "Annotated image must go with the result");
        assert!(!snapshot.can_analyze);
        assert_eq!(open_streams(&counters), 0);
    }

    #[tokio::test]
    async fn test_snapshot_mirrors_session() {
        let (mut session, _) = session();
        session.accept_source(SourceImage::from(scene())).unwrap();
        session.accept_template(template_at(3, 3));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Captured);
        assert!(snapshot.can_analyze);
        assert!(snapshot.engine_ready);
        assert_eq!(snapshot.camera_name, "mock");
        assert!(snapshot.outcome.is_none());
    }
}
