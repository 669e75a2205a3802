//! # Hasher Module
//!
//! Computes perceptual fingerprints for screenshot bytes.
//!
//! ## Supported Algorithms
//! - **dHash (Difference Hash)** - Best balance of speed and accuracy (default)
//! - **aHash (Average Hash)** - Fastest, good for exact re-uploads
//! - **pHash (Perceptual Hash)** - Most robust, handles edits well
//!
//! ## How It Works
//! 1. Decode the raw bytes (zune-jpeg fast path for JPEG)
//! 2. Resize to a small grid (8x8 or 16x16) and convert to grayscale
//! 3. Compute hash bits from pixel relationships
//! 4. Compare fingerprints using Hamming distance
//!
//! Hashing is deterministic and pure: the same bytes always produce the
//! same fingerprint, and nothing here performs I/O.
//!
//! ## Example
//! ```rust,ignore
//! use screenshot_guard::core::hasher::{HasherConfig, HashAlgorithmKind};
//!
//! let hasher = HasherConfig::new()
//!     .algorithm(HashAlgorithmKind::Difference)
//!     .hash_size(8)
//!     .build()?;
//!
//! let fingerprint = hasher.hash_bytes(&bytes, locator)?;
//! ```

mod algorithms;
pub mod decode;
pub mod resize;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher};
pub use traits::{Fingerprint, HashAlgorithm, HashAlgorithmKind};

use crate::error::HashError;

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Hash size (8, 16, or 32)
    hash_size: u32,
    /// Algorithm to use
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            hash_size: 8,
            algorithm: HashAlgorithmKind::Difference,
        }
    }

    /// Set the hash size.
    ///
    /// Larger sizes are more discriminative but slower:
    /// - 8: 64 bits, fast, good for most uses
    /// - 16: 256 bits, more accurate
    /// - 32: 1024 bits, very accurate, slower
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Result<Box<dyn HashAlgorithm>, HashError> {
        if self.hash_size == 0 {
            return Err(HashError::ComputationFailed(
                "hash size must be positive".to_string(),
            ));
        }

        match self.algorithm {
            HashAlgorithmKind::Average => Ok(Box::new(AverageHasher::new(self.hash_size))),
            HashAlgorithmKind::Difference => Ok(Box::new(DifferenceHasher::new(self.hash_size))),
            HashAlgorithmKind::Perceptual => Ok(Box::new(PerceptualHasher::new(self.hash_size))),
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}
