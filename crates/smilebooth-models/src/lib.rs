//! Shared data models for the smile booth.
//!
//! This crate provides Serde-serializable types for:
//! - Detected regions and detector parameters
//! - Classifier definitions and health state
//! - Request/response bodies of the booth API
//! - Capture and gallery records

pub mod capture;
pub mod classifier;
pub mod detection;
pub mod payload;
pub mod rect;

// Re-export common types
pub use capture::{CaptureRecord, GalleryEntry, CAPTURE_PREFIX, IMAGE_URL_DIR};
pub use classifier::{ClassifierHealth, ClassifierKind, DEFAULT_CASCADE_BASE_URL};
pub use detection::{DetectResponse, DetectionParams, SaveResponse};
pub use payload::{split_data_url, ImagePayload, PayloadError};
pub use rect::Region;
