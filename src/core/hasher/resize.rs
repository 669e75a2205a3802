//! Fast SIMD-accelerated resize to grayscale.
//!
//! Uses the fast_image_resize crate, which is 5-14x faster than the image
//! crate's resize and automatically uses AVX2/NEON when available. Resize
//! plus grayscale conversion is the hot first step of every hash algorithm.

use crate::error::HashError;
use fast_image_resize::{images::Image, PixelType, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};

/// Resize an image to the given dimensions and convert to grayscale.
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, HashError> {
    // Grayscale first: resizing a single channel is cheaper than three
    let gray = image.to_luma8();

    let src_width = gray.width();
    let src_height = gray.height();

    if src_width == 0 || src_height == 0 {
        return Err(HashError::ComputationFailed(
            "source image has zero dimensions".to_string(),
        ));
    }
    if width == 0 || height == 0 {
        return Err(HashError::ComputationFailed(
            "destination dimensions must be positive".to_string(),
        ));
    }

    let src_image = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
        .map_err(|e| HashError::ComputationFailed(format!("failed to create source image: {}", e)))?;

    let mut dst_image = Image::new(width, height, PixelType::U8);

    // Bilinear is a good balance of speed and quality for hashing
    let options = ResizeOptions::new().resize_alg(fast_image_resize::ResizeAlg::Convolution(
        fast_image_resize::FilterType::Bilinear,
    ));

    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| HashError::ComputationFailed(format!("resize failed: {}", e)))?;

    let result: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
            HashError::ComputationFailed("failed to create result buffer".to_string())
        })?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, _| {
            let shade = (x * 255 / width.max(1)) as u8;
            Rgb([shade, shade, shade])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn resizes_to_requested_dimensions() {
        let image = gradient_image(100, 60);
        let gray = resize_to_grayscale(&image, 9, 8).unwrap();
        assert_eq!(gray.width(), 9);
        assert_eq!(gray.height(), 8);
    }

    #[test]
    fn zero_destination_is_rejected() {
        let image = gradient_image(10, 10);
        assert!(resize_to_grayscale(&image, 0, 8).is_err());
        assert!(resize_to_grayscale(&image, 8, 0).is_err());
    }

    #[test]
    fn preserves_left_to_right_gradient() {
        let image = gradient_image(200, 100);
        let gray = resize_to_grayscale(&image, 8, 8).unwrap();

        let left = gray.get_pixel(0, 4)[0];
        let right = gray.get_pixel(7, 4)[0];
        assert!(left < right, "expected gradient, got {} vs {}", left, right);
    }
}
