//! Timestamp-named capture files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, RgbImage};
use tokio::fs;
use tracing::{debug, info};

use smilebooth_models::CaptureRecord;

use crate::error::{StorageError, StorageResult};

/// JPEG quality of stored captures.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Writes captures into a flat image directory.
///
/// Filenames have one-second resolution and existing files are overwritten
/// without checks, so two saves within the same second keep only the later
/// frame.
#[derive(Debug, Clone)]
pub struct CaptureStore {
    dir: PathBuf,
}

impl CaptureStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the image directory if it does not exist.
    pub async fn ensure_dir(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Directory {
                path: self.dir.clone(),
                source,
            })
    }

    /// Store a frame named after the current local time.
    pub async fn save(&self, frame: &RgbImage) -> StorageResult<CaptureRecord> {
        self.save_at(frame, Local::now()).await
    }

    /// Store a frame named after `timestamp`.
    pub async fn save_at(&self, frame: &RgbImage, timestamp: DateTime<Local>) -> StorageResult<CaptureRecord> {
        let record = CaptureRecord::new(CaptureRecord::filename_for(&timestamp));
        let path = self.dir.join(&record.filename);

        let bytes = encode_jpeg(frame, DEFAULT_JPEG_QUALITY)?;
        debug!(path = %path.display(), bytes = bytes.len(), "Writing capture");
        fs::write(&path, &bytes)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        info!(filename = %record.filename, "Capture saved");
        Ok(record)
    }
}

/// Encode an RGB frame as baseline JPEG.
pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> StorageResult<Vec<u8>> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode(
        frame.as_raw(),
        frame.width(),
        frame.height(),
        ColorType::Rgb8,
    )?;
    Ok(buf)
}
