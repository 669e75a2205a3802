//! Event type definitions for intake progress reporting.

use crate::model::SubmissionId;
use serde::{Deserialize, Serialize};

/// All events emitted by the intake workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Single-file intake events
    Intake(IntakeEvent),
    /// Batch intake events
    Batch(BatchEvent),
}

/// Events during a single-file intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum IntakeEvent {
    /// A submission was received and is about to be hashed
    Received { locator: String },
    /// The screenshot was fingerprinted
    Hashed { locator: String, fingerprint: String },
    /// The screenshot duplicated a prior submission
    DuplicateRejected { locator: String, reason: String },
    /// The submission was persisted and credited
    Accepted {
        submission_id: SubmissionId,
        amount_cents: i64,
    },
    /// Fetching or hashing failed; no submission was created
    Failed { locator: String, message: String },
}

/// Events during batch intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchEvent {
    /// Batch processing started
    Started { total: usize },
    /// One file was accepted
    FileAccepted {
        index: usize,
        submission_id: SubmissionId,
    },
    /// One file was excluded as a duplicate; siblings continue
    FileDuplicate { index: usize, reason: String },
    /// One file failed to fetch or decode; siblings continue
    FileFailed { index: usize, message: String },
    /// Batch processing finished
    Completed { summary: BatchSummary },
}

/// Summary of a completed batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub accepted: usize,
    pub duplicates: usize,
    pub failed: usize,
    pub total_earned_cents: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_to_json() {
        let event = Event::Batch(BatchEvent::FileDuplicate {
            index: 3,
            reason: "duplicate of another screenshot within the current batch".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("FileDuplicate"));
        assert!(json.contains("\"index\":3"));
    }
}
