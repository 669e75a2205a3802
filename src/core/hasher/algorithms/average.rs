//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Resizing the image to hash_size x hash_size
//! 2. Converting to grayscale
//! 3. Computing the average brightness
//! 4. For each pixel: if brighter than average, set bit to 1, else 0
//!
//! This is the fastest hash but less robust to edits.

use super::super::resize::resize_to_grayscale;
use super::super::traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
use crate::error::HashError;
use image::DynamicImage;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    /// Size of the hash (width and height)
    hash_size: u32,
}

impl AverageHasher {
    /// Create a new aHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError> {
        let gray = resize_to_grayscale(image, self.hash_size, self.hash_size)?;

        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let count = (self.hash_size * self.hash_size) as u64;
        let average = (total / count) as u8;

        let mut hash_bytes = Vec::with_capacity((self.hash_size * self.hash_size / 8) as usize + 1);
        let mut current_byte: u8 = 0;
        let mut bit_position = 0;

        for y in 0..self.hash_size {
            for x in 0..self.hash_size {
                if gray.get_pixel(x, y)[0] > average {
                    current_byte |= 1 << (7 - bit_position);
                }

                bit_position += 1;
                if bit_position == 8 {
                    hash_bytes.push(current_byte);
                    current_byte = 0;
                    bit_position = 0;
                }
            }
        }

        if bit_position > 0 {
            hash_bytes.push(current_byte);
        }

        Ok(Fingerprint::new(hash_bytes, HashAlgorithmKind::Average))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
