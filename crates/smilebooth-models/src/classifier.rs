//! Cascade classifier definitions and their health state.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Upstream location of the OpenCV Haar cascade definitions.
pub const DEFAULT_CASCADE_BASE_URL: &str =
    "https://raw.githubusercontent.com/opencv/opencv/master/data/haarcascades";

/// The two classifiers the booth depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    Face,
    Smile,
}

impl ClassifierKind {
    /// All classifiers, in load order.
    pub const ALL: [ClassifierKind; 2] = [ClassifierKind::Face, ClassifierKind::Smile];

    /// File name of the cascade definition on disk and upstream.
    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Face => "haarcascade_frontalface_default.xml",
            Self::Smile => "haarcascade_smile.xml",
        }
    }

    /// Download URL of the definition under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.file_name())
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::Smile => "smile",
        }
    }
}

impl std::fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which classifiers loaded successfully at startup.
///
/// Set once when the process starts and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClassifierHealth {
    pub face_loaded: bool,
    pub smile_loaded: bool,
}

impl ClassifierHealth {
    pub fn new(face_loaded: bool, smile_loaded: bool) -> Self {
        Self {
            face_loaded,
            smile_loaded,
        }
    }

    /// Both classifiers are usable.
    pub fn is_ready(&self) -> bool {
        self.face_loaded && self.smile_loaded
    }

    /// Health flag of a single classifier.
    pub fn is_loaded(&self, kind: ClassifierKind) -> bool {
        match kind {
            ClassifierKind::Face => self.face_loaded,
            ClassifierKind::Smile => self.smile_loaded,
        }
    }

    /// Classifiers that failed to load.
    pub fn missing(&self) -> Vec<ClassifierKind> {
        ClassifierKind::ALL
            .into_iter()
            .filter(|kind| !self.is_loaded(*kind))
            .collect()
    }
}
