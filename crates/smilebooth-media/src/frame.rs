//! Frame decoding and color conversion.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{GrayImage, Luma, RgbImage};

use smilebooth_models::split_data_url;

use crate::error::MediaResult;

/// A decoded RGB frame, 8 bits per channel.
pub type ImageFrame = RgbImage;

/// Decode a `data:image/...;base64,<payload>` string into an RGB frame.
pub fn decode_data_url(data_url: &str) -> MediaResult<ImageFrame> {
    let encoded = split_data_url(data_url)?;
    let bytes = STANDARD.decode(encoded.trim())?;
    decode_image_bytes(&bytes)
}

/// Decode encoded image bytes (format sniffed from content) into an RGB frame.
pub fn decode_image_bytes(bytes: &[u8]) -> MediaResult<ImageFrame> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgb8())
}

// BT.601 weights in Q14 fixed point, same rounding as OpenCV's RGB2GRAY.
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Convert an RGB frame to single-channel luma.
pub fn to_grayscale(frame: &ImageFrame) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let [r, g, b] = frame.get_pixel(x, y).0;
        let luma = (u32::from(r) * R_WEIGHT + u32::from(g) * G_WEIGHT + u32::from(b) * B_WEIGHT + ROUND)
            >> SHIFT;
        Luma([luma as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MediaError;
    use image::{DynamicImage, ImageOutputFormat, Rgb};
    use std::io::Cursor;

    fn png_data_url(frame: &ImageFrame) -> String {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(frame.clone())
            .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(buf))
    }

    #[test]
    fn test_decode_png_data_url() {
        let frame = RgbImage::from_pixel(4, 3, Rgb([10, 200, 30]));
        let decoded = decode_data_url(&png_data_url(&frame)).unwrap();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(2, 1), &Rgb([10, 200, 30]));
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        let err = decode_data_url("data:image/jpeg;base64,@@not base64@@").unwrap_err();
        assert!(matches!(err, MediaError::Base64(_)));
    }

    #[test]
    fn test_decode_rejects_non_image_bytes() {
        let url = format!("data:image/jpeg;base64,{}", STANDARD.encode(b"plain text"));
        let err = decode_data_url(&url).unwrap_err();
        assert!(matches!(err, MediaError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_missing_header() {
        let err = decode_data_url("iVBORw0KGgo=").unwrap_err();
        assert!(matches!(err, MediaError::InvalidPayload(_)));
    }

    #[test]
    fn test_grayscale_uses_bt601_weights() {
        let mut frame = RgbImage::new(4, 1);
        frame.put_pixel(0, 0, Rgb([255, 0, 0]));
        frame.put_pixel(1, 0, Rgb([0, 255, 0]));
        frame.put_pixel(2, 0, Rgb([0, 0, 255]));
        frame.put_pixel(3, 0, Rgb([255, 255, 255]));

        let gray = to_grayscale(&frame);
        assert_eq!(gray.get_pixel(0, 0).0[0], 76);
        assert_eq!(gray.get_pixel(1, 0).0[0], 150);
        assert_eq!(gray.get_pixel(2, 0).0[0], 29);
        assert_eq!(gray.get_pixel(3, 0).0[0], 255);
    }
}
