//! Local capture store and gallery listing.
//!
//! This crate provides:
//! - Timestamp-named JPEG captures in a flat image directory
//! - Newest-first gallery listing of that directory

pub mod capture;
pub mod error;
pub mod gallery;

pub use capture::CaptureStore;
pub use error::{StorageError, StorageResult};
pub use gallery::{list_gallery, GALLERY_EXTENSIONS};
