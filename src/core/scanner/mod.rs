//! # Scanner Module
//!
//! Scans a new fingerprint against a user's submission history and the
//! screenshots already accepted earlier in the same batch.
//!
//! ## Scan Order
//! 1. Persisted history, newest first, bounded by the configured window
//! 2. In-batch accepted fingerprints, in submission order (batch mode only)
//!
//! The first match wins and the scan short-circuits. A historical match is
//! always preferred over an in-batch one because it carries a prior date
//! for the user-facing rejection message.
//!
//! ## Fail-Open Policy
//! History rows with missing, malformed, or incomparable fingerprints are
//! skipped with a warning. One corrupt legacy row degrades duplicate
//! recall for that row only; it never blocks a user's future submissions.
//!
//! The scanner is pure: it never mutates its inputs and performs no I/O.
//! History must be supplied already materialized.

use crate::core::comparator::{ComparisonStrategy, MatchType};
use crate::core::hasher::Fingerprint;
use crate::model::SubmissionId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One prior submission as seen by the scanner.
///
/// `fingerprint` holds the canonical text encoding as persisted;
/// `None` marks legacy rows created before fingerprinting existed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub submission_id: SubmissionId,
    pub fingerprint: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// A fingerprint accepted earlier in the current batch
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Zero-based position of the file in the batch input
    pub index: usize,
    pub fingerprint: Fingerprint,
}

/// Provenance of a duplicate match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateMatch {
    /// Matched a persisted prior submission
    Historical {
        submission_id: SubmissionId,
        submitted_at: DateTime<Utc>,
        distance: u32,
    },
    /// Matched a screenshot accepted earlier in the same batch
    WithinBatch { index: usize, distance: u32 },
}

impl DuplicateMatch {
    pub fn distance(&self) -> u32 {
        match self {
            Self::Historical { distance, .. } => *distance,
            Self::WithinBatch { distance, .. } => *distance,
        }
    }
}

/// Find the first prior entry the candidate fingerprint duplicates.
///
/// Returns `None` when the candidate is distinct from everything in
/// `history` and `batch`.
pub fn find_duplicate(
    candidate: &Fingerprint,
    history: &[HistoryEntry],
    batch: &[BatchEntry],
    strategy: &dyn ComparisonStrategy,
) -> Option<DuplicateMatch> {
    for entry in history {
        let Some(stored) = entry.fingerprint.as_deref() else {
            continue;
        };

        let prior: Fingerprint = match stored.parse() {
            Ok(prior) => prior,
            Err(error) => {
                tracing::warn!(
                    submission_id = %entry.submission_id,
                    %error,
                    "skipping history row with unparseable fingerprint"
                );
                continue;
            }
        };

        match candidate.distance(&prior) {
            Ok(distance) if strategy.is_duplicate(distance) => {
                tracing::info!(
                    submission_id = %entry.submission_id,
                    distance,
                    match_type = %MatchType::from_distance(distance),
                    "candidate duplicates a prior submission"
                );
                return Some(DuplicateMatch::Historical {
                    submission_id: entry.submission_id,
                    submitted_at: entry.submitted_at,
                    distance,
                });
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(
                    submission_id = %entry.submission_id,
                    %error,
                    "skipping incomparable history fingerprint"
                );
            }
        }
    }

    for entry in batch {
        match candidate.distance(&entry.fingerprint) {
            Ok(distance) if strategy.is_duplicate(distance) => {
                tracing::info!(
                    batch_index = entry.index,
                    distance,
                    match_type = %MatchType::from_distance(distance),
                    "candidate duplicates an earlier file in the same batch"
                );
                return Some(DuplicateMatch::WithinBatch {
                    index: entry.index,
                    distance,
                });
            }
            Ok(_) => {}
            Err(error) => {
                tracing::warn!(
                    batch_index = entry.index,
                    %error,
                    "skipping incomparable in-batch fingerprint"
                );
            }
        }
    }

    None
}
