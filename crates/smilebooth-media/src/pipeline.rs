//! Face → smile detection pipeline.
//!
//! 1. Convert the frame to grayscale
//! 2. Find faces over the full frame (`DetectionParams::FACE`)
//! 3. Search each face for a smile (`DetectionParams::SMILE`), stopping at
//!    the first face that has one
//!
//! The pipeline is read-only: it holds the detectors built at startup and is
//! shared by every request.

use image::GrayImage;
use tracing::debug;

use smilebooth_models::{ClassifierHealth, DetectionParams, Region};

use crate::classifier::ClassifierSet;
use crate::detector::GrayView;
use crate::error::{MediaError, MediaResult};
use crate::frame::{decode_data_url, to_grayscale};

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionOutcome {
    pub smile_detected: bool,
    /// Faces reported by the face pass
    pub faces_found: usize,
    /// Faces searched for a smile before the run stopped
    pub faces_examined: usize,
    /// First smile found, in frame coordinates
    pub smile_region: Option<Region>,
}

impl DetectionOutcome {
    fn no_smile(faces_found: usize, faces_examined: usize) -> Self {
        Self {
            smile_detected: false,
            faces_found,
            faces_examined,
            smile_region: None,
        }
    }
}

/// Smile detector built once at startup.
#[derive(Debug, Clone)]
pub struct SmilePipeline {
    classifiers: ClassifierSet,
    face_params: DetectionParams,
    smile_params: DetectionParams,
}

impl SmilePipeline {
    pub fn new(classifiers: ClassifierSet) -> Self {
        Self {
            classifiers,
            face_params: DetectionParams::FACE,
            smile_params: DetectionParams::SMILE,
        }
    }

    pub fn health(&self) -> ClassifierHealth {
        self.classifiers.health()
    }

    fn ensure_ready(&self) -> MediaResult<()> {
        let health = self.health();
        if health.is_ready() {
            Ok(())
        } else {
            Err(MediaError::ClassifierUnavailable(health.missing()))
        }
    }

    /// Decode a data URL and run detection on it.
    ///
    /// Classifier health is checked before the payload is touched.
    pub fn detect_data_url(&self, data_url: &str) -> MediaResult<DetectionOutcome> {
        self.ensure_ready()?;
        let frame = decode_data_url(data_url)?;
        self.detect_gray(&to_grayscale(&frame))
    }

    /// Run detection on a grayscale frame.
    pub fn detect_gray(&self, gray: &GrayImage) -> MediaResult<DetectionOutcome> {
        self.ensure_ready()?;

        let frame_view = GrayView::full(gray);
        let faces = self
            .classifiers
            .face
            .detect_regions(&frame_view, self.face_params)?;

        let mut examined = 0;
        for face in &faces {
            let Some(face_view) = GrayView::crop(gray, *face) else {
                debug!(?face, "Skipping face region outside the frame");
                continue;
            };
            examined += 1;

            let smiles = self
                .classifiers
                .smile
                .detect_regions(&face_view, self.smile_params)?;

            if let Some(smile) = smiles.first() {
                let smile_region = face_view.region().offset_within(smile);
                debug!(
                    faces = faces.len(),
                    examined,
                    ?smile_region,
                    "Smile detected"
                );
                return Ok(DetectionOutcome {
                    smile_detected: true,
                    faces_found: faces.len(),
                    faces_examined: examined,
                    smile_region: Some(smile_region),
                });
            }
        }

        debug!(faces = faces.len(), examined, "No smile detected");
        Ok(DetectionOutcome::no_smile(faces.len(), examined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::CascadeDetector;
    use crate::detector::RegionDetector;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use smilebooth_models::ClassifierKind;
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Detector that replays scripted answers and records every call.
    struct ScriptedDetector {
        answers: Mutex<VecDeque<Vec<Region>>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<(Region, DetectionParams)>>,
        fail: bool,
    }

    impl ScriptedDetector {
        fn new(answers: Vec<Vec<Region>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn seen(&self) -> Vec<(Region, DetectionParams)> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl RegionDetector for ScriptedDetector {
        fn detect_regions(&self, view: &GrayView<'_>, params: DetectionParams) -> MediaResult<Vec<Region>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push((view.region(), params));
            if self.fail {
                return Err(MediaError::detection_failed("scripted failure"));
            }
            Ok(self.answers.lock().unwrap().pop_front().unwrap_or_default())
        }

        fn is_empty(&self) -> bool {
            false
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn pipeline(face: &Arc<ScriptedDetector>, smile: &Arc<ScriptedDetector>) -> SmilePipeline {
        SmilePipeline::new(ClassifierSet::new(face.clone(), smile.clone()))
    }

    fn gray(width: u32, height: u32) -> GrayImage {
        GrayImage::new(width, height)
    }

    #[test]
    fn test_no_faces_means_no_smile() {
        let face = ScriptedDetector::new(vec![vec![]]);
        let smile = ScriptedDetector::new(vec![]);

        let outcome = pipeline(&face, &smile).detect_gray(&gray(64, 64)).unwrap();

        assert_eq!(outcome, DetectionOutcome::no_smile(0, 0));
        assert_eq!(face.calls(), 1);
        assert_eq!(smile.calls(), 0);
    }

    #[test]
    fn test_stops_at_first_smiling_face() {
        let faces = vec![
            Region::new(0, 0, 20, 20),
            Region::new(30, 0, 20, 20),
            Region::new(0, 30, 20, 20),
        ];
        let face = ScriptedDetector::new(vec![faces]);
        let smile = ScriptedDetector::new(vec![vec![], vec![Region::new(4, 12, 10, 5)], vec![Region::new(1, 1, 2, 2)]]);

        let outcome = pipeline(&face, &smile).detect_gray(&gray(64, 64)).unwrap();

        assert!(outcome.smile_detected);
        assert_eq!(outcome.faces_found, 3);
        assert_eq!(outcome.faces_examined, 2);
        assert_eq!(outcome.smile_region, Some(Region::new(34, 12, 10, 5)));
        assert_eq!(smile.calls(), 2, "third face must not be searched");
    }

    #[test]
    fn test_faces_without_smiles_are_all_examined() {
        let face = ScriptedDetector::new(vec![vec![Region::new(0, 0, 10, 10), Region::new(10, 10, 10, 10)]]);
        let smile = ScriptedDetector::new(vec![vec![], vec![]]);

        let outcome = pipeline(&face, &smile).detect_gray(&gray(32, 32)).unwrap();

        assert!(!outcome.smile_detected);
        assert_eq!(outcome.faces_examined, 2);
        assert_eq!(smile.calls(), 2);
    }

    #[test]
    fn test_detectors_receive_expected_views_and_params() {
        let face_region = Region::new(8, 4, 16, 16);
        let face = ScriptedDetector::new(vec![vec![face_region]]);
        let smile = ScriptedDetector::new(vec![vec![]]);

        pipeline(&face, &smile).detect_gray(&gray(40, 30)).unwrap();

        assert_eq!(face.seen(), vec![(Region::full(40, 30), DetectionParams::FACE)]);
        assert_eq!(smile.seen(), vec![(face_region, DetectionParams::SMILE)]);
    }

    #[test]
    fn test_face_regions_are_clamped_and_degenerate_ones_skipped() {
        let face = ScriptedDetector::new(vec![vec![
            Region::new(50, 50, 10, 10),
            Region::new(25, 25, 10, 10),
        ]]);
        let smile = ScriptedDetector::new(vec![vec![]]);

        let outcome = pipeline(&face, &smile).detect_gray(&gray(30, 30)).unwrap();

        assert_eq!(outcome.faces_found, 2);
        assert_eq!(outcome.faces_examined, 1);
        assert_eq!(smile.seen()[0].0, Region::new(25, 25, 5, 5));
    }

    #[test]
    fn test_unhealthy_classifiers_short_circuit_before_decoding() {
        let smile = ScriptedDetector::new(vec![]);
        let set = ClassifierSet::new(Arc::new(CascadeDetector::empty(ClassifierKind::Face)), smile.clone());
        let pipeline = SmilePipeline::new(set);

        let err = pipeline.detect_data_url("definitely not a data url").unwrap_err();

        match err {
            MediaError::ClassifierUnavailable(missing) => assert_eq!(missing, vec![ClassifierKind::Face]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(smile.calls(), 0);
    }

    #[test]
    fn test_decode_failure_is_reported() {
        let face = ScriptedDetector::new(vec![]);
        let smile = ScriptedDetector::new(vec![]);

        let err = pipeline(&face, &smile)
            .detect_data_url("data:image/jpeg;base64,!!!")
            .unwrap_err();

        assert!(err.is_payload_error());
        assert_eq!(face.calls(), 0);
    }

    #[test]
    fn test_data_url_round_trip_reaches_detectors() {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(12, 9))
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        let url = format!("data:image/png;base64,{}", STANDARD.encode(buf));

        let face = ScriptedDetector::new(vec![vec![]]);
        let smile = ScriptedDetector::new(vec![]);
        let outcome = pipeline(&face, &smile).detect_data_url(&url).unwrap();

        assert!(!outcome.smile_detected);
        assert_eq!(face.seen()[0].0, Region::full(12, 9));
    }

    #[test]
    fn test_detector_errors_propagate() {
        let face = ScriptedDetector::failing();
        let smile = ScriptedDetector::new(vec![]);

        let err = pipeline(&face, &smile).detect_gray(&gray(8, 8)).unwrap_err();
        assert!(matches!(err, MediaError::DetectionFailed(_)));
    }
}
