//! In-memory store backend for testing and embedding.

use super::{EarningsStore, SubmissionStore};
use crate::core::scanner::HistoryEntry;
use crate::error::StoreError;
use crate::model::{
    Earnings, EarningsSnapshot, NewSubmission, Submission, SubmissionId, SubmissionStatus, UserId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store backend
pub struct InMemoryStore {
    submissions: RwLock<Vec<Submission>>,
    earnings: RwLock<HashMap<UserId, Earnings>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            submissions: RwLock::new(Vec::new()),
            earnings: RwLock::new(HashMap::new()),
        }
    }

    /// Number of persisted submissions (test helper)
    pub fn submission_count(&self) -> usize {
        self.submissions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Look up a persisted submission by id (test helper)
    pub fn submission(&self, id: SubmissionId) -> Option<Submission> {
        self.submissions
            .read()
            .ok()?
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    fn poisoned() -> StoreError {
        StoreError::QueryFailed("store lock poisoned".to_string())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionStore for InMemoryStore {
    async fn recent_fingerprints(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let submissions = self.submissions.read().map_err(|_| Self::poisoned())?;

        let mut entries: Vec<&Submission> = submissions
            .iter()
            .filter(|s| s.user == user && s.status != SubmissionStatus::Rejected)
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(entries
            .into_iter()
            .take(limit)
            .map(|s| HistoryEntry {
                submission_id: s.id,
                fingerprint: s.image_hash.clone(),
                submitted_at: s.created_at,
            })
            .collect())
    }

    async fn insert(&self, submission: NewSubmission) -> Result<SubmissionId, StoreError> {
        let id = SubmissionId::new();
        let record = Submission {
            id,
            user: submission.user,
            platform: submission.platform,
            screenshot_ref: submission.screenshot_ref,
            image_hash: submission.image_hash,
            status: submission.status,
            amount_cents: submission.amount_cents,
            rejection_reason: None,
            created_at: submission.created_at,
        };

        self.submissions
            .write()
            .map_err(|_| Self::poisoned())?
            .push(record);
        Ok(id)
    }
}

#[async_trait]
impl EarningsStore for InMemoryStore {
    async fn credit(
        &self,
        user: UserId,
        amount_cents: i64,
    ) -> Result<EarningsSnapshot, StoreError> {
        let mut earnings = self.earnings.write().map_err(|_| Self::poisoned())?;
        let record = earnings.entry(user).or_default();
        record
            .credit(amount_cents)
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(record.snapshot())
    }

    async fn snapshot(&self, user: UserId) -> Result<Option<EarningsSnapshot>, StoreError> {
        let earnings = self.earnings.read().map_err(|_| Self::poisoned())?;
        Ok(earnings.get(&user).map(|e| e.snapshot()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Platform;
    use chrono::{Duration, Utc};

    fn new_submission(user: UserId, hash: &str, age_minutes: i64) -> NewSubmission {
        NewSubmission {
            user,
            platform: Platform::Facebook,
            screenshot_ref: format!("ref-{}", hash),
            image_hash: Some(hash.to_string()),
            status: SubmissionStatus::Approved,
            amount_cents: 50,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn history_is_newest_first_and_bounded() {
        let store = InMemoryStore::new();
        let user = UserId(1);

        store.insert(new_submission(user, "dhash:01", 30)).await.unwrap();
        store.insert(new_submission(user, "dhash:02", 10)).await.unwrap();
        store.insert(new_submission(user, "dhash:03", 20)).await.unwrap();

        let history = store.recent_fingerprints(user, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].fingerprint.as_deref(), Some("dhash:02"));
        assert_eq!(history[1].fingerprint.as_deref(), Some("dhash:03"));
    }

    #[tokio::test]
    async fn history_is_scoped_per_user() {
        let store = InMemoryStore::new();
        store.insert(new_submission(UserId(1), "dhash:01", 1)).await.unwrap();
        store.insert(new_submission(UserId(2), "dhash:02", 1)).await.unwrap();

        let history = store.recent_fingerprints(UserId(1), 50).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].fingerprint.as_deref(), Some("dhash:01"));
    }

    #[tokio::test]
    async fn rejected_submissions_are_excluded_from_history() {
        let store = InMemoryStore::new();
        let user = UserId(1);

        let mut submission = new_submission(user, "dhash:aa", 5);
        submission.status = SubmissionStatus::Rejected;
        store.insert(submission).await.unwrap();

        let history = store.recent_fingerprints(user, 50).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn credit_lazily_creates_earnings() {
        let store = InMemoryStore::new();
        let user = UserId(9);

        assert_eq!(store.snapshot(user).await.unwrap(), None);

        let snapshot = store.credit(user, 75).await.unwrap();
        assert_eq!(snapshot.total_earned_cents, 75);
        assert_eq!(snapshot.available_balance_cents, 75);

        let snapshot = store.credit(user, 25).await.unwrap();
        assert_eq!(snapshot.total_earned_cents, 100);
    }
}
