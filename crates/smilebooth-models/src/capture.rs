//! Stored capture records.

use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Filename prefix of every stored capture.
pub const CAPTURE_PREFIX: &str = "smile_";

/// Directory of captures relative to the static root.
pub const IMAGE_URL_DIR: &str = "images";

/// A capture written by the capture store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CaptureRecord {
    /// File name inside the image directory
    pub filename: String,
    /// Path relative to the static root (`images/<filename>`)
    pub path: String,
}

impl CaptureRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        let filename = filename.into();
        let path = format!("{}/{}", IMAGE_URL_DIR, filename);
        Self { filename, path }
    }

    /// Capture filename for a timestamp, at one-second resolution.
    pub fn filename_for(timestamp: &DateTime<Local>) -> String {
        format!("{}{}.jpg", CAPTURE_PREFIX, timestamp.format("%Y%m%d_%H%M%S"))
    }
}

/// A capture listed by the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GalleryEntry {
    pub filename: String,
    /// Path relative to the static root (`images/<filename>`)
    pub path: String,
    /// File creation time (modification time where creation is unavailable)
    pub created_at: DateTime<Local>,
}
