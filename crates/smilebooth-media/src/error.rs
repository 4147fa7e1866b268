//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use smilebooth_models::{ClassifierKind, PayloadError};

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while decoding frames or running detection.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid image payload: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("Invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Cascade classifiers not loaded properly: {}", list_kinds(.0))]
    ClassifierUnavailable(Vec<ClassifierKind>),

    #[error("Detection failed: {0}")]
    DetectionFailed(String),

    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn list_kinds(kinds: &[ClassifierKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl MediaError {
    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create a download failure error.
    pub fn download_failed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for failures caused by the request payload rather than the server.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPayload(_) | Self::Base64(_) | Self::Decode(_)
        )
    }
}

#[cfg(feature = "opencv")]
impl From<opencv::Error> for MediaError {
    fn from(e: opencv::Error) -> Self {
        Self::DetectionFailed(e.to_string())
    }
}
