//! Intake workflow implementation.

use super::locks::UserLocks;
use super::IntakeConfig;
use crate::core::comparator::ThresholdStrategy;
use crate::core::fetch::ImageSource;
use crate::core::hasher::{Fingerprint, HashAlgorithm, HasherConfig};
use crate::core::notify::BalanceNotifier;
use crate::core::scanner::{find_duplicate, BatchEntry, DuplicateMatch};
use crate::core::store::{EarningsStore, SubmissionStore};
use crate::error::{DuplicateError, IntakeError, StoreError};
use crate::events::{null_sender, BatchEvent, BatchSummary, Event, EventSender, IntakeEvent};
use crate::model::{
    EarningsSnapshot, NewSubmission, Platform, SubmissionId, SubmissionStatus, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of an accepted single-file submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleOutcome {
    pub submission_id: SubmissionId,
    pub earnings: EarningsSnapshot,
}

/// A batch file that was accepted and persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedFile {
    pub index: usize,
    pub locator: String,
    pub submission_id: SubmissionId,
    pub amount_cents: i64,
}

/// A batch file excluded as a duplicate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateFile {
    pub index: usize,
    pub locator: String,
    /// User-facing rejection message
    pub reason: String,
    /// Date of the matched prior submission, `None` for in-batch matches
    pub prior_date: Option<DateTime<Utc>>,
}

/// A batch file that failed to fetch or decode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFile {
    pub index: usize,
    pub locator: String,
    pub message: String,
}

/// Result of a batch submission: three disjoint buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub successful: Vec<AcceptedFile>,
    pub duplicates: Vec<DuplicateFile>,
    pub failed: Vec<FailedFile>,
    /// Sum of the per-item amounts of accepted files. Credited
    /// immediately when auto-approve is on, otherwise credited later by
    /// the admin approval flow.
    pub total_earned_cents: i64,
    pub earnings: EarningsSnapshot,
}

/// Builder for the intake workflow
pub struct IntakeWorkflowBuilder {
    config: IntakeConfig,
    images: Option<Arc<dyn ImageSource>>,
    submissions: Option<Arc<dyn SubmissionStore>>,
    earnings: Option<Arc<dyn EarningsStore>>,
    notifier: Option<Arc<dyn BalanceNotifier>>,
    events: Option<EventSender>,
}

impl IntakeWorkflowBuilder {
    pub fn new() -> Self {
        Self {
            config: IntakeConfig::default(),
            images: None,
            submissions: None,
            earnings: None,
            notifier: None,
            events: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: IntakeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the image source
    pub fn images(mut self, images: Arc<dyn ImageSource>) -> Self {
        self.images = Some(images);
        self
    }

    /// Set the submission store
    pub fn submissions(mut self, store: Arc<dyn SubmissionStore>) -> Self {
        self.submissions = Some(store);
        self
    }

    /// Set the earnings store
    pub fn earnings(mut self, store: Arc<dyn EarningsStore>) -> Self {
        self.earnings = Some(store);
        self
    }

    /// Use one backend for both submissions and earnings
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: SubmissionStore + EarningsStore + 'static,
    {
        self.submissions(store.clone()).earnings(store)
    }

    /// Set the balance notifier (defaults to a no-op)
    pub fn notifier(mut self, notifier: Arc<dyn BalanceNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Set the progress event sender (defaults to a null sender)
    pub fn events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Build the workflow
    pub fn build(self) -> Result<IntakeWorkflow, IntakeError> {
        let images = self
            .images
            .ok_or_else(|| IntakeError::Config("image source is required".to_string()))?;
        let submissions = self
            .submissions
            .ok_or_else(|| IntakeError::Config("submission store is required".to_string()))?;
        let earnings = self
            .earnings
            .ok_or_else(|| IntakeError::Config("earnings store is required".to_string()))?;

        let hasher = HasherConfig::new()
            .algorithm(self.config.algorithm)
            .hash_size(self.config.hash_size)
            .build()?;
        let strategy = ThresholdStrategy::new(self.config.threshold);

        Ok(IntakeWorkflow {
            config: self.config,
            strategy,
            hasher,
            images,
            submissions,
            earnings,
            notifier: self.notifier.unwrap_or_else(|| {
                Arc::new(crate::core::notify::NullNotifier)
            }),
            events: self.events.unwrap_or_else(null_sender),
            locks: UserLocks::new(),
        })
    }
}

impl Default for IntakeWorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The submission intake workflow
pub struct IntakeWorkflow {
    config: IntakeConfig,
    strategy: ThresholdStrategy,
    hasher: Box<dyn HashAlgorithm>,
    images: Arc<dyn ImageSource>,
    submissions: Arc<dyn SubmissionStore>,
    earnings: Arc<dyn EarningsStore>,
    notifier: Arc<dyn BalanceNotifier>,
    events: EventSender,
    locks: UserLocks,
}

impl IntakeWorkflow {
    /// Create a workflow builder
    pub fn builder() -> IntakeWorkflowBuilder {
        IntakeWorkflowBuilder::new()
    }

    /// Process one screenshot submission.
    ///
    /// Fails the whole request on the first problem: fetch/decode errors
    /// and duplicates both abort with no submission row created.
    pub async fn submit_single(
        &self,
        user: UserId,
        platform: Platform,
        locator: &str,
    ) -> Result<SingleOutcome, IntakeError> {
        self.events.send(Event::Intake(IntakeEvent::Received {
            locator: locator.to_string(),
        }));

        let fingerprint = match self.fetch_and_hash(locator).await {
            Ok(fingerprint) => fingerprint,
            Err(error) => {
                self.events.send(Event::Intake(IntakeEvent::Failed {
                    locator: locator.to_string(),
                    message: error.to_string(),
                }));
                return Err(error);
            }
        };
        self.events.send(Event::Intake(IntakeEvent::Hashed {
            locator: locator.to_string(),
            fingerprint: fingerprint.to_string(),
        }));

        // Scan and create under the user's lock so a concurrent identical
        // upload cannot slip past the scan.
        let lock = self.locks.for_user(user);
        let _guard = lock.lock().await;

        let history = self
            .submissions
            .recent_fingerprints(user, self.config.history_window)
            .await?;

        if let Some(found) = find_duplicate(&fingerprint, &history, &[], &self.strategy) {
            let error = duplicate_error(&found);
            tracing::info!(%user, %platform, %error, "submission rejected as duplicate");
            self.events
                .send(Event::Intake(IntakeEvent::DuplicateRejected {
                    locator: locator.to_string(),
                    reason: error.to_string(),
                }));
            return Err(error.into());
        }

        let amount_cents = self.config.rewards.amount_for(platform);
        let submission_id = self
            .submissions
            .insert(self.new_submission(user, platform, locator, &fingerprint, amount_cents))
            .await?;

        let earnings = self.settle(user, amount_cents, submission_id).await?;

        tracing::debug!(%user, %platform, %submission_id, "submission accepted");
        self.events.send(Event::Intake(IntakeEvent::Accepted {
            submission_id,
            amount_cents,
        }));
        self.push_balance(user, earnings).await;

        Ok(SingleOutcome {
            submission_id,
            earnings,
        })
    }

    /// Process a batch of screenshot submissions with partial-success
    /// semantics.
    pub async fn submit_batch(
        &self,
        user: UserId,
        platform: Platform,
        locators: &[String],
    ) -> Result<BatchOutcome, IntakeError> {
        if locators.len() > self.config.max_batch_size {
            return Err(IntakeError::BatchTooLarge {
                submitted: locators.len(),
                max: self.config.max_batch_size,
            });
        }

        self.events.send(Event::Batch(BatchEvent::Started {
            total: locators.len(),
        }));

        let lock = self.locks.for_user(user);
        let _guard = lock.lock().await;

        // One history read covers the whole batch; later files also scan
        // against the fingerprints accepted earlier in this batch.
        let history = self
            .submissions
            .recent_fingerprints(user, self.config.history_window)
            .await?;

        let amount_cents = self.config.rewards.amount_for(platform);
        let mut successful: Vec<AcceptedFile> = Vec::new();
        let mut duplicates: Vec<DuplicateFile> = Vec::new();
        let mut failed: Vec<FailedFile> = Vec::new();
        let mut accepted_fingerprints: Vec<BatchEntry> = Vec::new();

        for (index, locator) in locators.iter().enumerate() {
            let fingerprint = match self.fetch_and_hash(locator).await {
                Ok(fingerprint) => fingerprint,
                Err(error) => {
                    let message = error.to_string();
                    self.events.send(Event::Batch(BatchEvent::FileFailed {
                        index,
                        message: message.clone(),
                    }));
                    failed.push(FailedFile {
                        index,
                        locator: locator.clone(),
                        message,
                    });
                    continue;
                }
            };

            if let Some(found) =
                find_duplicate(&fingerprint, &history, &accepted_fingerprints, &self.strategy)
            {
                let error = duplicate_error(&found);
                let prior_date = match &found {
                    DuplicateMatch::Historical { submitted_at, .. } => Some(*submitted_at),
                    DuplicateMatch::WithinBatch { .. } => None,
                };
                self.events.send(Event::Batch(BatchEvent::FileDuplicate {
                    index,
                    reason: error.to_string(),
                }));
                duplicates.push(DuplicateFile {
                    index,
                    locator: locator.clone(),
                    reason: error.to_string(),
                    prior_date,
                });
                continue;
            }

            let insert = self
                .submissions
                .insert(self.new_submission(user, platform, locator, &fingerprint, amount_cents))
                .await;
            let submission_id = match insert {
                Ok(id) => id,
                Err(error) => {
                    let message = error.to_string();
                    self.events.send(Event::Batch(BatchEvent::FileFailed {
                        index,
                        message: message.clone(),
                    }));
                    failed.push(FailedFile {
                        index,
                        locator: locator.clone(),
                        message,
                    });
                    continue;
                }
            };

            self.events.send(Event::Batch(BatchEvent::FileAccepted {
                index,
                submission_id,
            }));
            accepted_fingerprints.push(BatchEntry { index, fingerprint });
            successful.push(AcceptedFile {
                index,
                locator: locator.clone(),
                submission_id,
                amount_cents,
            });
        }

        let total_earned_cents = amount_cents * successful.len() as i64;
        let earnings = if let Some(first) = successful.first() {
            self.settle_sum(user, total_earned_cents, first.submission_id)
                .await?
        } else {
            self.current_snapshot(user).await?
        };

        self.events.send(Event::Batch(BatchEvent::Completed {
            summary: BatchSummary {
                accepted: successful.len(),
                duplicates: duplicates.len(),
                failed: failed.len(),
                total_earned_cents,
            },
        }));
        if !successful.is_empty() {
            self.push_balance(user, earnings).await;
        }

        Ok(BatchOutcome {
            successful,
            duplicates,
            failed,
            total_earned_cents,
            earnings,
        })
    }

    /// Fetch the screenshot bytes and fingerprint them.
    ///
    /// Pure CPU work after the fetch; both failure kinds abort only the
    /// file they belong to.
    async fn fetch_and_hash(&self, locator: &str) -> Result<Fingerprint, IntakeError> {
        let bytes = self.images.fetch(locator).await?;
        let fingerprint = self.hasher.hash_bytes(&bytes, locator)?;
        Ok(fingerprint)
    }

    fn new_submission(
        &self,
        user: UserId,
        platform: Platform,
        locator: &str,
        fingerprint: &Fingerprint,
        amount_cents: i64,
    ) -> NewSubmission {
        let status = if self.config.auto_approve {
            SubmissionStatus::Approved
        } else {
            SubmissionStatus::Pending
        };
        NewSubmission {
            user,
            platform,
            screenshot_ref: locator.to_string(),
            image_hash: Some(fingerprint.to_string()),
            status,
            amount_cents,
            created_at: Utc::now(),
        }
    }

    /// Credit one accepted submission (auto-approve mode only)
    async fn settle(
        &self,
        user: UserId,
        amount_cents: i64,
        submission_id: SubmissionId,
    ) -> Result<EarningsSnapshot, IntakeError> {
        if !self.config.auto_approve {
            return self.current_snapshot(user).await;
        }
        self.credit_with_retry(user, amount_cents, submission_id)
            .await
    }

    /// Credit the summed amount of a batch (auto-approve mode only)
    async fn settle_sum(
        &self,
        user: UserId,
        total_cents: i64,
        first_submission: SubmissionId,
    ) -> Result<EarningsSnapshot, IntakeError> {
        if !self.config.auto_approve || total_cents == 0 {
            return self.current_snapshot(user).await;
        }
        self.credit_with_retry(user, total_cents, first_submission)
            .await
    }

    /// The submission row is already committed when this runs, so one
    /// transient failure gets a retry before surfacing with the committed
    /// id for reconciliation.
    async fn credit_with_retry(
        &self,
        user: UserId,
        amount_cents: i64,
        submission_id: SubmissionId,
    ) -> Result<EarningsSnapshot, IntakeError> {
        match self.earnings.credit(user, amount_cents).await {
            Ok(snapshot) => Ok(snapshot),
            Err(error) => {
                tracing::warn!(%user, %error, "earnings credit failed, retrying once");
                self.earnings.credit(user, amount_cents).await.map_err(|e| {
                    StoreError::CreditAfterCommit {
                        submission_id,
                        reason: e.to_string(),
                    }
                    .into()
                })
            }
        }
    }

    async fn current_snapshot(&self, user: UserId) -> Result<EarningsSnapshot, IntakeError> {
        Ok(self.earnings.snapshot(user).await?.unwrap_or_default())
    }

    /// Fire-and-forget balance push; failures are logged, never surfaced.
    async fn push_balance(&self, user: UserId, snapshot: EarningsSnapshot) {
        if let Err(error) = self.notifier.balance_changed(user, snapshot).await {
            tracing::warn!(%user, %error, "balance notification failed");
        }
    }
}

fn duplicate_error(found: &DuplicateMatch) -> DuplicateError {
    match found {
        DuplicateMatch::Historical {
            submission_id,
            submitted_at,
            ..
        } => DuplicateError::OfHistorical {
            submission_id: *submission_id,
            submitted_at: *submitted_at,
        },
        DuplicateMatch::WithinBatch { index, .. } => DuplicateError::WithinBatch { index: *index },
    }
}
