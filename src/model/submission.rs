//! Submission records and their status lifecycle.

use super::{Platform, SubmissionId, UserId};
use crate::error::TransitionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of a submission.
///
/// `Pending` is the only state that allows a further transition. Some
/// intake paths pre-approve at creation; others leave the record pending
/// for admin review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted proof-of-engagement submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub user: UserId,
    pub platform: Platform,
    /// Opaque reference (URL) to the stored screenshot
    pub screenshot_ref: String,
    /// Canonical fingerprint text, `None` only for legacy/failed-hash rows
    pub image_hash: Option<String>,
    pub status: SubmissionStatus,
    /// Fixed reward for this submission type, in minor currency units
    pub amount_cents: i64,
    /// Set only while status is `Rejected`
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    /// Approve a pending submission.
    ///
    /// Clears any stale rejection reason so it can never outlive a
    /// rejected status.
    pub fn approve(&mut self) -> Result<(), TransitionError> {
        self.transition(SubmissionStatus::Approved, None)
    }

    /// Reject a pending submission with a user-facing reason.
    pub fn reject(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(SubmissionStatus::Rejected, Some(reason.into()))
    }

    fn transition(
        &mut self,
        to: SubmissionStatus,
        reason: Option<String>,
    ) -> Result<(), TransitionError> {
        if self.status != SubmissionStatus::Pending {
            return Err(TransitionError::AlreadyFinal {
                current: self.status.to_string(),
                requested: to.to_string(),
            });
        }
        self.status = to;
        self.rejection_reason = if to == SubmissionStatus::Rejected {
            reason
        } else {
            None
        };
        Ok(())
    }
}

/// Fields of a submission about to be persisted
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user: UserId,
    pub platform: Platform,
    pub screenshot_ref: String,
    pub image_hash: Option<String>,
    pub status: SubmissionStatus,
    pub amount_cents: i64,
    pub created_at: DateTime<Utc>,
}
