//! Trait definitions for perceptual hashing.

use super::decode;
use crate::error::{CompareError, HashError};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - Fast, good for exact duplicates
    Average,
    /// Difference Hash (dHash) - Good balance of speed and accuracy
    Difference,
    /// Perceptual Hash (pHash) - Most robust, handles edits well
    Perceptual,
}

impl HashAlgorithmKind {
    /// Short tag used in the canonical fingerprint text encoding
    pub fn tag(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => "ahash",
            HashAlgorithmKind::Difference => "dhash",
            HashAlgorithmKind::Perceptual => "phash",
        }
    }

    /// Parse a tag back into an algorithm kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ahash" => Some(HashAlgorithmKind::Average),
            "dhash" => Some(HashAlgorithmKind::Difference),
            "phash" => Some(HashAlgorithmKind::Perceptual),
            _ => None,
        }
    }

    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - Fast comparison based on average brightness"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - Compares brightness gradients between pixels"
            }
            HashAlgorithmKind::Perceptual => {
                "Perceptual Hash (pHash) - DCT-based, robust to edits and re-encoding"
            }
        }
    }
}

impl std::fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
        }
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a fingerprint from an already-decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<Fingerprint, HashError>;

    /// Compute a fingerprint directly from raw image bytes.
    ///
    /// Uses fast decoders where available:
    /// - JPEG: zune-jpeg (1.5-2x faster)
    /// - Other formats: image crate fallback
    ///
    /// `locator` is only used for error context.
    fn hash_bytes(&self, bytes: &[u8], locator: &str) -> Result<Fingerprint, HashError> {
        let image = decode::decode_bytes(bytes, locator)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(HashError::EmptyImage {
                locator: locator.to_string(),
            });
        }
        self.hash_image(&image)
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

/// A computed perceptual fingerprint.
///
/// Fingerprints are deterministic for a given input and algorithm, and
/// comparable only against fingerprints of the same algorithm and length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// The raw hash bits
    bytes: Vec<u8>,
    /// The algorithm that produced this fingerprint
    algorithm: HashAlgorithmKind,
}

impl Fingerprint {
    /// Create a new fingerprint
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithmKind) -> Self {
        Self { bytes, algorithm }
    }

    /// Get the raw hash bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the algorithm that produced this fingerprint
    pub fn algorithm(&self) -> HashAlgorithmKind {
        self.algorithm
    }

    /// Get the total number of bits in this fingerprint
    pub fn bit_count(&self) -> u32 {
        (self.bytes.len() * 8) as u32
    }

    /// Compute the Hamming distance to another fingerprint.
    ///
    /// Symmetric, and zero for identical fingerprints. Fingerprints from
    /// different algorithms or of different lengths are incomparable and
    /// produce a [`CompareError`] rather than a misleading distance.
    pub fn distance(&self, other: &Self) -> Result<u32, CompareError> {
        if self.algorithm != other.algorithm {
            return Err(CompareError::AlgorithmMismatch {
                left: self.algorithm,
                right: other.algorithm,
            });
        }
        if self.bytes.len() != other.bytes.len() {
            return Err(CompareError::LengthMismatch {
                left: self.bytes.len(),
                right: other.bytes.len(),
            });
        }
        Ok(self
            .bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum())
    }
}

/// Canonical text encoding: `{algorithm_tag}:{hex}`, e.g. `dhash:a1b2c3d4e5f60718`
impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:", self.algorithm.tag())?;
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl FromStr for Fingerprint {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CompareError::MalformedFingerprint {
            value: s.to_string(),
        };

        let (tag, hex) = s.split_once(':').ok_or_else(malformed)?;
        let algorithm = HashAlgorithmKind::from_tag(tag).ok_or_else(malformed)?;

        if hex.is_empty() || hex.len() % 2 != 0 {
            return Err(malformed());
        }
        let bytes = (0..hex.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| malformed())?;

        Ok(Self { bytes, algorithm })
    }
}
