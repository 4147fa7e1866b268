//! Frame decoding, cascade provisioning and smile detection.
//!
//! This crate provides:
//! - Data URL decoding into RGB frames and BT.601 grayscale conversion
//! - The `RegionDetector` capability and its OpenCV cascade backend
//! - Startup provisioning of the Haar cascade definitions
//! - The face → smile detection pipeline

pub mod cascade;
pub mod classifier;
pub mod detector;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod provision;

pub use cascade::CascadeDetector;
pub use classifier::ClassifierSet;
pub use detector::{GrayView, RegionDetector};
pub use error::{MediaError, MediaResult};
pub use frame::{decode_data_url, decode_image_bytes, to_grayscale, ImageFrame};
pub use pipeline::{DetectionOutcome, SmilePipeline};
pub use provision::{CascadeProvisioner, FileStatus, ProvisionReport};
