//! Loading the face and smile classifiers.

use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use smilebooth_models::{ClassifierHealth, ClassifierKind};

use crate::cascade::CascadeDetector;
use crate::detector::RegionDetector;

/// The two detectors the pipeline runs, fixed after startup.
#[derive(Clone)]
pub struct ClassifierSet {
    pub face: Arc<dyn RegionDetector>,
    pub smile: Arc<dyn RegionDetector>,
}

impl ClassifierSet {
    pub fn new(face: Arc<dyn RegionDetector>, smile: Arc<dyn RegionDetector>) -> Self {
        Self { face, smile }
    }

    /// Load both cascades from `cascade_dir`.
    ///
    /// Classifiers that fail to load are kept as empty detectors; the
    /// resulting [`ClassifierHealth`] says which.
    pub fn load_cascades(cascade_dir: &Path) -> Self {
        let load = |kind: ClassifierKind| -> Arc<dyn RegionDetector> {
            Arc::new(CascadeDetector::load(kind, &cascade_dir.join(kind.file_name())))
        };
        let set = Self::new(load(ClassifierKind::Face), load(ClassifierKind::Smile));

        let health = set.health();
        if !health.is_ready() {
            warn!(
                missing = ?health.missing(),
                "Running without all cascade classifiers; smile detection is disabled"
            );
        }
        set
    }

    /// Current load state of both detectors.
    pub fn health(&self) -> ClassifierHealth {
        ClassifierHealth::new(!self.face.is_empty(), !self.smile.is_empty())
    }
}

impl std::fmt::Debug for ClassifierSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierSet")
            .field("face", &self.face.name())
            .field("smile", &self.smile.name())
            .field("health", &self.health())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_cascades_report_unhealthy() {
        let dir = TempDir::new().unwrap();
        let set = ClassifierSet::load_cascades(dir.path());
        let health = set.health();
        assert!(!health.face_loaded);
        assert!(!health.smile_loaded);
        assert!(!health.is_ready());
    }

    #[test]
    fn test_health_tracks_each_detector_independently() {
        let set = ClassifierSet::new(
            Arc::new(CascadeDetector::empty(ClassifierKind::Face)),
            Arc::new(CascadeDetector::empty(ClassifierKind::Smile)),
        );
        assert_eq!(set.health(), ClassifierHealth::new(false, false));
    }
}
