//! Perceptual Hash (pHash) implementation.
//!
//! pHash extracts frequency information from the image, which makes it
//! more robust to:
//! - Scaling
//! - Minor rotations
//! - Brightness/contrast changes
//! - Compression artifacts
//!
//! Uses the image_hasher crate, which provides a well-tested
//! implementation.

use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::HashError;
use image::DynamicImage;
use image_hasher::{HashAlg, HasherConfig as ImageHasherConfig};

/// Perceptual Hash (pHash) implementation
pub struct PerceptualHasher {
    hasher: image_hasher::Hasher,
}

impl PerceptualHasher {
    /// Create a new pHash hasher
    pub fn new(hash_size: u32) -> Self {
        let hasher = ImageHasherConfig::new()
            .hash_size(hash_size, hash_size)
            .hash_alg(HashAlg::DoubleGradient)
            .to_hasher();

        Self { hasher }
    }
}

impl HashAlgorithm for PerceptualHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        let hash = self.hasher.hash_image(image);
        Ok(Fingerprint::new(
            hash.as_bytes().to_vec(),
            HashAlgorithmKind::Perceptual,
        ))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Perceptual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid_image(shade: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([shade, shade, shade]));
        DynamicImage::ImageRgb8(img)
    }

    fn brightened_image(shade: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| {
            let s = shade.saturating_add(5);
            Rgb([s, s, s])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_fingerprint() {
        let hasher = PerceptualHasher::new(8);
        let image = solid_image(128);

        let hash1 = hasher.hash_image(&image).unwrap();
        let hash2 = hasher.hash_image(&image).unwrap();

        assert_eq!(hash1.distance(&hash2).unwrap(), 0);
    }

    #[test]
    fn slightly_brightened_image_stays_within_threshold() {
        let hasher = PerceptualHasher::new(8);

        let hash1 = hasher.hash_image(&solid_image(128)).unwrap();
        let hash2 = hasher.hash_image(&brightened_image(128)).unwrap();

        assert!(hash1.distance(&hash2).unwrap() < 10);
    }

    #[test]
    fn kind_returns_perceptual() {
        assert_eq!(
            PerceptualHasher::new(8).kind(),
            HashAlgorithmKind::Perceptual
        );
    }
}
