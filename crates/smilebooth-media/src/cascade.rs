//! OpenCV Haar cascade backend.
//!
//! Wraps `opencv::objdetect::CascadeClassifier`. The binding needs `&mut`
//! access to run `detect_multi_scale`, so the classifier sits behind a
//! mutex; the loaded model itself is never modified after startup.
//!
//! # Requirements
//! - The `opencv` feature, on by default (OpenCV 4.x with objdetect)
//!
//! With `--no-default-features` every cascade loads empty and callers see the
//! classifier as unavailable.

use std::path::Path;

#[cfg(feature = "opencv")]
use std::sync::Mutex;

use tracing::{error, info};

use smilebooth_models::{ClassifierKind, DetectionParams, Region};

use crate::detector::{GrayView, RegionDetector};
use crate::error::{MediaError, MediaResult};

/// A Haar cascade loaded from an OpenCV XML definition.
pub struct CascadeDetector {
    kind: ClassifierKind,
    #[cfg(feature = "opencv")]
    classifier: Option<Mutex<opencv::objdetect::CascadeClassifier>>,
}

impl CascadeDetector {
    /// Load a cascade definition.
    ///
    /// Never fails: a missing, corrupt or unparseable file yields an empty
    /// detector, which callers observe through [`RegionDetector::is_empty`].
    pub fn load(kind: ClassifierKind, path: &Path) -> Self {
        match Self::try_load(kind, path) {
            Ok(detector) => {
                info!(classifier = %kind, path = %path.display(), "Cascade loaded successfully");
                detector
            }
            Err(e) => {
                error!(
                    classifier = %kind,
                    path = %path.display(),
                    "Cascade failed to load: {}", e
                );
                Self::empty(kind)
            }
        }
    }

    /// An unusable detector.
    pub fn empty(kind: ClassifierKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "opencv")]
            classifier: None,
        }
    }

    pub fn kind(&self) -> ClassifierKind {
        self.kind
    }

    #[cfg(feature = "opencv")]
    fn try_load(kind: ClassifierKind, path: &Path) -> MediaResult<Self> {
        use opencv::objdetect::CascadeClassifier;
        use opencv::prelude::CascadeClassifierTraitConst;

        if !path.is_file() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| MediaError::internal(format!("Non UTF-8 cascade path: {}", path.display())))?;

        let classifier = CascadeClassifier::new(path_str)?;
        if classifier.empty()? {
            return Err(MediaError::detection_failed("cascade definition is empty or unparseable"));
        }

        Ok(Self {
            kind,
            classifier: Some(Mutex::new(classifier)),
        })
    }

    #[cfg(not(feature = "opencv"))]
    fn try_load(_kind: ClassifierKind, path: &Path) -> MediaResult<Self> {
        if !path.is_file() {
            return Err(MediaError::FileNotFound(path.to_path_buf()));
        }
        Err(MediaError::internal(
            "built without the `opencv` feature; cascade classifiers are unavailable",
        ))
    }
}

impl RegionDetector for CascadeDetector {
    #[cfg(feature = "opencv")]
    fn detect_regions(&self, view: &GrayView<'_>, params: DetectionParams) -> MediaResult<Vec<Region>> {
        use opencv::core::{Mat, Rect, Size, Vector};
        use opencv::prelude::CascadeClassifierTrait;

        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| MediaError::ClassifierUnavailable(vec![self.kind]))?;

        let pixels = view.to_image();
        let mat = Mat::new_rows_cols_with_data(
            view.height() as i32,
            view.width() as i32,
            pixels.as_raw().as_slice(),
        )?;

        let mut found = Vector::<Rect>::new();
        {
            let mut classifier = classifier
                .lock()
                .map_err(|_| MediaError::internal(format!("{} cascade lock poisoned", self.kind)))?;
            classifier.detect_multi_scale(
                &*mat,
                &mut found,
                params.scale_factor,
                params.min_neighbors,
                0,
                Size::new(0, 0),
                Size::new(0, 0),
            )?;
        }

        Ok(found
            .iter()
            .filter(|r| r.width > 0 && r.height > 0)
            .map(|r| {
                Region::new(
                    r.x.max(0) as u32,
                    r.y.max(0) as u32,
                    r.width as u32,
                    r.height as u32,
                )
            })
            .collect())
    }

    #[cfg(not(feature = "opencv"))]
    fn detect_regions(&self, _view: &GrayView<'_>, _params: DetectionParams) -> MediaResult<Vec<Region>> {
        Err(MediaError::ClassifierUnavailable(vec![self.kind]))
    }

    fn is_empty(&self) -> bool {
        #[cfg(feature = "opencv")]
        {
            self.classifier.is_none()
        }
        #[cfg(not(feature = "opencv"))]
        {
            true
        }
    }

    fn name(&self) -> &'static str {
        "opencv-haar-cascade"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let detector = CascadeDetector::load(ClassifierKind::Face, &dir.path().join("nope.xml"));
        assert!(detector.is_empty());
        assert_eq!(detector.kind(), ClassifierKind::Face);
    }

    #[test]
    fn test_garbage_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ClassifierKind::Smile.file_name());
        std::fs::write(&path, b"<html>404: Not Found</html>").unwrap();
        assert!(CascadeDetector::load(ClassifierKind::Smile, &path).is_empty());
    }

    #[test]
    fn test_empty_detector_refuses_detection() {
        let detector = CascadeDetector::empty(ClassifierKind::Smile);
        let image = GrayImage::new(4, 4);
        let err = detector
            .detect_regions(&GrayView::full(&image), DetectionParams::SMILE)
            .unwrap_err();
        assert!(matches!(err, MediaError::ClassifierUnavailable(_)));
    }

    /// One-stage, one-feature Haar cascade in the traincascade format.
    #[cfg(feature = "opencv")]
    const TINY_CASCADE: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<cascade>
  <stageType>BOOST</stageType>
  <featureType>HAAR</featureType>
  <height>24</height>
  <width>24</width>
  <stageParams>
    <maxWeakCount>1</maxWeakCount></stageParams>
  <featureParams>
    <maxCatCount>0</maxCatCount></featureParams>
  <stageNum>1</stageNum>
  <stages>
    <_>
      <maxWeakCount>1</maxWeakCount>
      <stageThreshold>-1.</stageThreshold>
      <weakClassifiers>
        <_>
          <internalNodes>
            0 -1 0 1.0000000000000000e-02</internalNodes>
          <leafValues>
            -1. 1.</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>
          0 0 24 12 -1.</_>
        <_>
          0 12 24 12 2.</_></rects></_></features></cascade>
</opencv_storage>
"#;

    #[cfg(feature = "opencv")]
    #[test]
    fn test_valid_definition_loads_and_detects() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(ClassifierKind::Face.file_name());
        std::fs::write(&path, TINY_CASCADE).unwrap();

        let detector = CascadeDetector::load(ClassifierKind::Face, &path);
        assert!(!detector.is_empty());

        let image = GrayImage::new(48, 48);
        assert!(detector
            .detect_regions(&GrayView::full(&image), DetectionParams::FACE)
            .is_ok());
    }
}
