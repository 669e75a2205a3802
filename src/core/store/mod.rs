//! # Store Module
//!
//! Persistence seams for submissions and earnings.
//!
//! The intake workflow talks to storage only through these traits. Two
//! backends ship with the crate:
//! - [`InMemoryStore`] for tests and embedding
//! - [`SqliteStore`] for a durable single-node deployment
//!
//! ## History Contract
//! `recent_fingerprints` returns a user's **non-rejected** submissions,
//! newest first, capped at `limit`. Rejected submissions are excluded
//! because only non-rejected pairs are constrained by the duplicate
//! invariant; a rejected upload should not block a corrected resubmission.

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use crate::core::scanner::HistoryEntry;
use crate::error::StoreError;
use crate::model::{EarningsSnapshot, NewSubmission, SubmissionId, UserId};
use async_trait::async_trait;

/// Reads and writes submission records
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// A user's most recent non-rejected submissions, newest first,
    /// at most `limit` entries.
    async fn recent_fingerprints(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, StoreError>;

    /// Persist a new submission and return its assigned id.
    ///
    /// The record joins the user's history immediately, even while
    /// pending.
    async fn insert(&self, submission: NewSubmission) -> Result<SubmissionId, StoreError>;
}

/// Reads and updates per-user earnings counters
#[async_trait]
pub trait EarningsStore: Send + Sync {
    /// Credit a reward, lazily creating the earnings record on first use.
    /// Returns the counters after the credit.
    async fn credit(&self, user: UserId, amount_cents: i64)
        -> Result<EarningsSnapshot, StoreError>;

    /// Current counters for a user, `None` if nothing was ever credited
    async fn snapshot(&self, user: UserId) -> Result<Option<EarningsSnapshot>, StoreError>;
}
