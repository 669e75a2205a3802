//! # Core Module
//!
//! The transport-agnostic duplicate-submission engine.
//!
//! ## Modules
//! - `hasher` - Computes perceptual fingerprints from screenshot bytes
//! - `comparator` - Decides whether two fingerprints are duplicates
//! - `scanner` - Scans a fingerprint against history and the current batch
//! - `intake` - Orchestrates the full submission workflow
//! - `fetch` - Retrieves screenshot bytes from their locator
//! - `store` - Persistence seams for submissions and earnings
//! - `notify` - Best-effort real-time balance updates

pub mod comparator;
pub mod fetch;
pub mod hasher;
pub mod intake;
pub mod notify;
pub mod scanner;
pub mod store;

// Re-export commonly used types
pub use comparator::{ComparisonStrategy, MatchType, ThresholdStrategy};
pub use hasher::{Fingerprint, HashAlgorithm, HashAlgorithmKind};
pub use intake::{BatchOutcome, IntakeConfig, IntakeWorkflow, RewardSchedule, SingleOutcome};
pub use scanner::{DuplicateMatch, HistoryEntry};
