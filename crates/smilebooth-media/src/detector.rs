//! The region detector capability.
//!
//! Detection backends (OpenCV cascades, test doubles) implement
//! [`RegionDetector`] and are handed read-only grayscale views.

use image::{imageops, GrayImage};

use smilebooth_models::{DetectionParams, Region};

use crate::error::MediaResult;

/// Read-only rectangular view into a grayscale frame.
#[derive(Debug, Clone, Copy)]
pub struct GrayView<'a> {
    image: &'a GrayImage,
    region: Region,
}

impl<'a> GrayView<'a> {
    /// View covering the whole image.
    pub fn full(image: &'a GrayImage) -> Self {
        Self {
            image,
            region: Region::full(image.width(), image.height()),
        }
    }

    /// View restricted to `region`, clamped to the image bounds.
    ///
    /// Returns `None` when the clamped region is empty.
    pub fn crop(image: &'a GrayImage, region: Region) -> Option<Self> {
        let region = region.clamp_to(image.width(), image.height())?;
        Some(Self { image, region })
    }

    pub fn width(&self) -> u32 {
        self.region.width
    }

    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Position of the view inside the underlying frame.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Copy the viewed pixels into a contiguous image.
    pub fn to_image(&self) -> GrayImage {
        let r = self.region;
        imageops::crop_imm(self.image, r.x, r.y, r.width, r.height).to_image()
    }
}

/// Multi-scale object detector over grayscale views.
///
/// Regions are returned relative to the view that was searched.
/// Implementations are shared across concurrent requests.
pub trait RegionDetector: Send + Sync {
    /// Detect regions inside `view` using the given sensitivity parameters.
    fn detect_regions(&self, view: &GrayView<'_>, params: DetectionParams) -> MediaResult<Vec<Region>>;

    /// True when the detector could not be loaded and must not be used.
    fn is_empty(&self) -> bool;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn gradient(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| Luma([(x + y * width) as u8]))
    }

    #[test]
    fn test_crop_reads_parent_pixels() {
        let image = gradient(8, 8);
        let view = GrayView::crop(&image, Region::new(2, 3, 4, 2)).unwrap();
        assert_eq!((view.width(), view.height()), (4, 2));
        let copy = view.to_image();
        assert_eq!(copy.get_pixel(0, 0), image.get_pixel(2, 3));
        assert_eq!(copy.get_pixel(3, 1), image.get_pixel(5, 4));
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let image = gradient(8, 8);
        let view = GrayView::crop(&image, Region::new(6, 6, 10, 10)).unwrap();
        assert_eq!(view.region(), Region::new(6, 6, 2, 2));
        assert!(GrayView::crop(&image, Region::new(8, 0, 2, 2)).is_none());
    }

    #[test]
    fn test_to_image_copies_region() {
        let image = gradient(8, 8);
        let copy = GrayView::crop(&image, Region::new(1, 1, 3, 2)).unwrap().to_image();
        assert_eq!(copy.dimensions(), (3, 2));
        assert_eq!(copy.get_pixel(2, 1), image.get_pixel(3, 2));
    }
}
