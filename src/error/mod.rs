//! # Error Module
//!
//! Error types for the duplicate-screenshot intake pipeline.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - locators, submission ids, what went wrong
//! - **Keep rejection distinct from failure** - a duplicate screenshot is an
//!   expected, user-correctable condition, never a server error
//! - **Fail open on bad history** - an incomparable stored fingerprint
//!   degrades duplicate recall, never availability

use crate::core::hasher::HashAlgorithmKind;
use crate::model::SubmissionId;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Top-level intake error
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Duplicate screenshot: {0}")]
    Duplicate(#[from] DuplicateError),

    #[error("Batch of {submitted} files exceeds the maximum of {max}")]
    BatchTooLarge { submitted: usize, max: usize },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntakeError {
    /// Whether this error is a user-correctable rejection rather than a
    /// genuine failure. Callers should render rejections as validation
    /// messages, not error screens.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            IntakeError::Duplicate(_) | IntakeError::BatchTooLarge { .. }
        )
    }
}

/// Errors that occur while fetching screenshot bytes from storage/CDN
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Storage unreachable for {locator}: {reason}")]
    Unreachable { locator: String, reason: String },

    #[error("Fetching {locator} returned HTTP status {status}")]
    BadStatus { locator: String, status: u16 },

    #[error("Timed out fetching {locator}")]
    Timeout { locator: String },
}

/// Errors that occur while decoding and hashing an image
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to decode image {locator}: {reason}")]
    DecodeFailed { locator: String, reason: String },

    #[error("Image is empty or corrupted: {locator}")]
    EmptyImage { locator: String },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),
}

/// Errors that occur when two fingerprints cannot be compared.
///
/// These indicate malformed or legacy history rows. The scanner treats
/// them as "not a match" and logs a warning so one bad row never blocks
/// every future submission for a user.
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Malformed fingerprint: {value:?}")]
    MalformedFingerprint { value: String },

    #[error("Cannot compare {left} fingerprint with {right} fingerprint")]
    AlgorithmMismatch {
        left: HashAlgorithmKind,
        right: HashAlgorithmKind,
    },

    #[error("Fingerprint length mismatch: {left} bytes vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },
}

/// A submission was rejected because its screenshot matched a prior one
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DuplicateError {
    #[error("duplicate of a previous submission from {submitted_at}")]
    OfHistorical {
        submission_id: SubmissionId,
        submitted_at: DateTime<Utc>,
    },

    #[error("duplicate of another screenshot within the current batch")]
    WithinBatch { index: usize },
}

/// Errors from the submission/earnings storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open store at {path}: {reason}")]
    OpenFailed { path: String, reason: String },

    #[error("Store query failed: {0}")]
    QueryFailed(String),

    #[error("Failed to serialize stored data: {0}")]
    SerializationFailed(String),

    #[error(
        "Earnings credit failed after submission {submission_id} was committed: {reason}. \
         The submission stands; reconcile earnings separately."
    )]
    CreditAfterCommit {
        submission_id: SubmissionId,
        reason: String,
    },
}

/// Errors from the best-effort balance notifier.
///
/// Never propagated out of the intake workflow; logged and swallowed.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification channel closed")]
    ChannelClosed,

    #[error("Failed to deliver balance update: {0}")]
    DeliveryFailed(String),
}

/// Errors from invalid submission status transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Submission is already {current} and cannot transition to {requested}")]
    AlreadyFinal { current: String, requested: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, IntakeError>;
