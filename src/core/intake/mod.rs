//! # Intake Module
//!
//! Orchestrates the full submission workflow.
//!
//! ## Single-file mode
//! Received -> Hashing -> Scanning -> Accepted | RejectedDuplicate | FailedHashing
//!
//! Fails fast: a fetch/decode error or a duplicate aborts the request with
//! no submission row and no earnings change. Persisting the submission is
//! the commit point; the earnings credit after it is retried once and then
//! surfaced with the committed id for reconciliation.
//!
//! ## Batch mode
//! Each file is processed independently, in input order, against the
//! combined history (persisted + accepted earlier in this batch). Files
//! partition into three disjoint buckets: `successful`, `duplicates`,
//! `failed`. One bad file never aborts its siblings. Oversized batches
//! are rejected before any hashing begins.
//!
//! ## Concurrency
//! The scan-then-create tail runs under a per-user async lock so two
//! concurrent uploads of the same screenshot cannot both pass the scan.

mod locks;
mod workflow;

pub use locks::UserLocks;
pub use workflow::{
    AcceptedFile, BatchOutcome, DuplicateFile, FailedFile, IntakeWorkflow, IntakeWorkflowBuilder,
    SingleOutcome,
};

use crate::core::hasher::HashAlgorithmKind;
use crate::model::Platform;
use std::collections::HashMap;

/// Fixed per-submission reward amounts, keyed by platform.
///
/// A plain configuration map, not a pricing engine.
#[derive(Debug, Clone)]
pub struct RewardSchedule {
    default_cents: i64,
    overrides: HashMap<Platform, i64>,
}

impl RewardSchedule {
    /// Flat schedule: every platform pays `default_cents`
    pub fn flat(default_cents: i64) -> Self {
        Self {
            default_cents,
            overrides: HashMap::new(),
        }
    }

    /// Override the amount for one platform
    pub fn with_amount(mut self, platform: Platform, cents: i64) -> Self {
        self.overrides.insert(platform, cents);
        self
    }

    /// Reward for a submission on `platform`
    pub fn amount_for(&self, platform: Platform) -> i64 {
        self.overrides
            .get(&platform)
            .copied()
            .unwrap_or(self.default_cents)
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self::flat(50)
    }
}

/// Configuration for the intake workflow.
///
/// All tunables live here as named options; call sites never carry their
/// own magic numbers.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Hash algorithm for fingerprinting
    pub algorithm: HashAlgorithmKind,
    /// Hash grid size (8, 16, or 32)
    pub hash_size: u32,
    /// Maximum Hamming distance still considered a duplicate
    pub threshold: u32,
    /// How many recent prior submissions to scan per user
    pub history_window: usize,
    /// Maximum number of files in one batch request
    pub max_batch_size: usize,
    /// Approve and credit at intake, or leave pending for admin review
    pub auto_approve: bool,
    /// Per-platform reward amounts
    pub rewards: RewardSchedule,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithmKind::Difference,
            hash_size: 8,
            threshold: 8,
            history_window: 50,
            max_batch_size: 10,
            auto_approve: true,
            rewards: RewardSchedule::default(),
        }
    }
}
