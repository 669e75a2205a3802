//! Integration tests for the intake workflow.
//!
//! These tests drive the public API end to end with in-memory
//! collaborators: single-file accept/reject, batch partitioning,
//! intra-batch duplicates, and notifier behavior.
//!
//! Test images are 9x8 grayscale "pattern images" whose horizontal
//! brightness steps encode an exact 64-bit dHash, so fingerprint
//! distances between fixtures are known constants.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Luma};
use screenshot_guard::core::fetch::InMemoryImageSource;
use screenshot_guard::core::hasher::{Fingerprint, HasherConfig};
use screenshot_guard::core::intake::{IntakeConfig, IntakeWorkflow};
use screenshot_guard::core::notify::{BalanceNotifier, ChannelNotifier};
use screenshot_guard::core::store::{InMemoryStore, SubmissionStore};
use screenshot_guard::error::{DuplicateError, IntakeError, NotifyError};
use screenshot_guard::model::{
    EarningsSnapshot, NewSubmission, Platform, SubmissionStatus, UserId,
};
use std::io::Cursor;
use std::sync::Arc;

// 64-bit dHash patterns, pairwise 32-64 bits apart
const P_RAMP: u64 = 0;
const P_RAMP_INV: u64 = u64::MAX;
const P_ALT: u64 = 0xAAAA_AAAA_AAAA_AAAA;
const P_NIB: u64 = 0x0F0F_0F0F_0F0F_0F0F;

/// Build a 9x8 grayscale image whose dHash is exactly `bits`.
///
/// Each row starts at 128 and steps +/-14 per column; bit 1 means the
/// left pixel is brighter than its right neighbor.
fn pattern_image(bits: u64) -> DynamicImage {
    let mut img = image::GrayImage::new(9, 8);
    for y in 0u32..8 {
        let mut value: i16 = 128;
        img.put_pixel(0, y, Luma([value as u8]));
        for x in 0u32..8 {
            let bit = (bits >> (63 - (y * 8 + x))) & 1 == 1;
            value += if bit { -14 } else { 14 };
            img.put_pixel(x + 1, y, Luma([value as u8]));
        }
    }
    DynamicImage::ImageLuma8(img)
}

fn pattern_png(bits: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    pattern_image(bits)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// The same visual content as [`pattern_png`], re-encoded as a
/// high-quality JPEG. Close to the PNG fingerprint, not byte-identical.
fn pattern_jpeg(bits: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    let gray = pattern_image(bits).to_luma8();
    let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), 90);
    encoder.encode_image(&gray).unwrap();
    bytes
}

fn harness(
    config: IntakeConfig,
    images: Vec<(&str, Vec<u8>)>,
) -> (IntakeWorkflow, Arc<InMemoryStore>) {
    let mut source = InMemoryImageSource::new();
    for (locator, bytes) in images {
        source.insert(locator, bytes);
    }
    let store = Arc::new(InMemoryStore::new());
    let workflow = IntakeWorkflow::builder()
        .config(config)
        .images(Arc::new(source))
        .store(store.clone())
        .build()
        .unwrap();
    (workflow, store)
}

fn locators(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

const USER: UserId = UserId(1);

#[test]
fn hashing_is_deterministic() {
    let hasher = HasherConfig::new().build().unwrap();
    let bytes = pattern_png(P_ALT);

    let first = hasher.hash_bytes(&bytes, "a").unwrap();
    let second = hasher.hash_bytes(&bytes, "a").unwrap();
    assert_eq!(first, second);
}

#[test]
fn pattern_fixtures_are_pairwise_distinct() {
    let hasher = HasherConfig::new().build().unwrap();
    let patterns = [P_RAMP, P_RAMP_INV, P_ALT, P_NIB];

    let fingerprints: Vec<Fingerprint> = patterns
        .iter()
        .map(|p| hasher.hash_bytes(&pattern_png(*p), "fixture").unwrap())
        .collect();

    for i in 0..fingerprints.len() {
        for j in (i + 1)..fingerprints.len() {
            let distance = fingerprints[i].distance(&fingerprints[j]).unwrap();
            assert!(
                distance > 8,
                "patterns {} and {} too close: distance {}",
                i,
                j,
                distance
            );
        }
    }
}

#[tokio::test]
async fn accepted_submission_is_persisted_and_credited() {
    let (workflow, store) = harness(
        IntakeConfig::default(),
        vec![("shot-1", pattern_png(P_RAMP))],
    );

    let outcome = workflow
        .submit_single(USER, Platform::Facebook, "shot-1")
        .await
        .unwrap();

    assert_eq!(outcome.earnings.total_earned_cents, 50);
    assert_eq!(outcome.earnings.available_balance_cents, 50);
    assert_eq!(store.submission_count(), 1);

    let record = store.submission(outcome.submission_id).unwrap();
    assert_eq!(record.status, SubmissionStatus::Approved);
    assert_eq!(record.screenshot_ref, "shot-1");
    assert!(record.image_hash.is_some());
}

#[tokio::test]
async fn identical_resubmission_is_rejected_without_side_effects() {
    let (workflow, store) = harness(
        IntakeConfig::default(),
        vec![
            ("shot-1", pattern_png(P_RAMP)),
            ("shot-2", pattern_png(P_RAMP)),
        ],
    );

    workflow
        .submit_single(USER, Platform::Facebook, "shot-1")
        .await
        .unwrap();

    // Same pixels under a different locator: still a duplicate
    let err = workflow
        .submit_single(USER, Platform::Facebook, "shot-2")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IntakeError::Duplicate(DuplicateError::OfHistorical { .. })
    ));

    // And every further attempt keeps failing the same way
    let err = workflow
        .submit_single(USER, Platform::Facebook, "shot-2")
        .await
        .unwrap_err();
    assert!(err.is_rejection());

    assert_eq!(store.submission_count(), 1);
    let earnings = outcome_snapshot(&store).await;
    assert_eq!(earnings.total_earned_cents, 50);
}

async fn outcome_snapshot(store: &Arc<InMemoryStore>) -> EarningsSnapshot {
    use screenshot_guard::core::store::EarningsStore;
    store.snapshot(USER).await.unwrap().unwrap_or_default()
}

#[tokio::test]
async fn reencoded_copy_matches_prior_submission() {
    let (workflow, _store) = harness(
        IntakeConfig::default(),
        vec![
            ("original.png", pattern_png(P_RAMP)),
            ("reencoded.jpg", pattern_jpeg(P_RAMP)),
        ],
    );

    workflow
        .submit_single(USER, Platform::Instagram, "original.png")
        .await
        .unwrap();

    let err = workflow
        .submit_single(USER, Platform::Instagram, "reencoded.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Duplicate(_)));
}

#[tokio::test]
async fn duplicate_rejection_names_the_prior_date() {
    let (workflow, store) = harness(
        IntakeConfig::default(),
        vec![("shot-1", pattern_png(P_RAMP))],
    );

    // Seed history: a prior approved submission from 2024-01-01 whose
    // fingerprint differs from shot-1's by one bit.
    let hasher = HasherConfig::new().build().unwrap();
    let fingerprint = hasher.hash_bytes(&pattern_png(P_RAMP), "seed").unwrap();
    let mut near_bytes = fingerprint.as_bytes().to_vec();
    near_bytes[7] ^= 0x01;
    let near = Fingerprint::new(near_bytes, fingerprint.algorithm());

    let prior_date = Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
    store
        .insert(NewSubmission {
            user: USER,
            platform: Platform::Facebook,
            screenshot_ref: "seeded".to_string(),
            image_hash: Some(near.to_string()),
            status: SubmissionStatus::Approved,
            amount_cents: 50,
            created_at: prior_date,
        })
        .await
        .unwrap();

    let err = workflow
        .submit_single(USER, Platform::Facebook, "shot-1")
        .await
        .unwrap_err();

    match err {
        IntakeError::Duplicate(DuplicateError::OfHistorical { submitted_at, .. }) => {
            assert_eq!(submitted_at, prior_date);
        }
        other => panic!("expected historical duplicate, got {:?}", other),
    }

    // No new row, no earnings
    assert_eq!(store.submission_count(), 1);
    assert_eq!(outcome_snapshot(&store).await.total_earned_cents, 0);
}

#[tokio::test]
async fn fetch_failure_creates_no_submission() {
    let (workflow, store) = harness(IntakeConfig::default(), vec![]);

    let err = workflow
        .submit_single(USER, Platform::Twitter, "missing")
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::Fetch(_)));
    assert!(!err.is_rejection());
    assert_eq!(store.submission_count(), 0);
    assert_eq!(outcome_snapshot(&store).await.total_earned_cents, 0);
}

#[tokio::test]
async fn decode_failure_creates_no_submission() {
    let (workflow, store) = harness(
        IntakeConfig::default(),
        vec![("corrupt", b"this is not a valid image file".to_vec())],
    );

    let err = workflow
        .submit_single(USER, Platform::Twitter, "corrupt")
        .await
        .unwrap_err();

    assert!(matches!(err, IntakeError::Hash(_)));
    assert_eq!(store.submission_count(), 0);
}

#[tokio::test]
async fn users_do_not_share_history() {
    let (workflow, _store) = harness(
        IntakeConfig::default(),
        vec![("shot-1", pattern_png(P_RAMP))],
    );

    workflow
        .submit_single(UserId(1), Platform::Facebook, "shot-1")
        .await
        .unwrap();

    // A different user may submit the same screenshot content
    workflow
        .submit_single(UserId(2), Platform::Facebook, "shot-1")
        .await
        .unwrap();
}

#[tokio::test]
async fn batch_survives_one_corrupt_file() {
    let (workflow, store) = harness(
        IntakeConfig::default(),
        vec![
            ("f0", pattern_png(P_RAMP)),
            ("f1", pattern_png(P_RAMP_INV)),
            ("f2", b"broken bytes".to_vec()),
            ("f3", pattern_png(P_ALT)),
            ("f4", pattern_png(P_NIB)),
        ],
    );

    let outcome = workflow
        .submit_batch(
            USER,
            Platform::Youtube,
            &locators(&["f0", "f1", "f2", "f3", "f4"]),
        )
        .await
        .unwrap();

    let accepted: Vec<usize> = outcome.successful.iter().map(|f| f.index).collect();
    assert_eq!(accepted, vec![0, 1, 3, 4]);
    assert!(outcome.duplicates.is_empty());

    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].index, 2);
    assert!(outcome.failed[0].message.contains("decode"));

    assert_eq!(outcome.total_earned_cents, 4 * 50);
    assert_eq!(store.submission_count(), 4);
}

#[tokio::test]
async fn intra_batch_duplicate_is_excluded_and_not_credited() {
    // [A, B, A'] where A' is a re-encode of A and nothing matches history
    let (workflow, store) = harness(
        IntakeConfig::default(),
        vec![
            ("a", pattern_png(P_RAMP)),
            ("b", pattern_png(P_RAMP_INV)),
            ("a-again", pattern_jpeg(P_RAMP)),
        ],
    );

    let outcome = workflow
        .submit_batch(USER, Platform::Tiktok, &locators(&["a", "b", "a-again"]))
        .await
        .unwrap();

    let accepted: Vec<usize> = outcome.successful.iter().map(|f| f.index).collect();
    assert_eq!(accepted, vec![0, 1]);

    assert_eq!(outcome.duplicates.len(), 1);
    let duplicate = &outcome.duplicates[0];
    assert_eq!(duplicate.index, 2);
    assert!(duplicate.reason.contains("within the current batch"));
    assert_eq!(duplicate.prior_date, None);

    assert!(outcome.failed.is_empty());
    assert_eq!(outcome.total_earned_cents, 2 * 50);
    assert_eq!(outcome.earnings.total_earned_cents, 2 * 50);
    assert_eq!(store.submission_count(), 2);
}

#[tokio::test]
async fn historical_match_wins_over_batch_sibling() {
    let (workflow, _store) = harness(
        IntakeConfig::default(),
        vec![
            ("earlier", pattern_png(P_RAMP)),
            ("copy-1", pattern_png(P_RAMP)),
            ("copy-2", pattern_png(P_RAMP)),
        ],
    );

    // "earlier" is persisted history before the batch runs
    workflow
        .submit_single(USER, Platform::Facebook, "earlier")
        .await
        .unwrap();

    let outcome = workflow
        .submit_batch(USER, Platform::Facebook, &locators(&["copy-1", "copy-2"]))
        .await
        .unwrap();

    // Both copies duplicate the persisted submission, and the reason
    // carries its date rather than "within current batch".
    assert!(outcome.successful.is_empty());
    assert_eq!(outcome.duplicates.len(), 2);
    for duplicate in &outcome.duplicates {
        assert!(duplicate.prior_date.is_some());
        assert!(duplicate.reason.contains("previous submission"));
    }
    assert_eq!(outcome.total_earned_cents, 0);
}

#[tokio::test]
async fn empty_history_never_reports_duplicates() {
    let (workflow, _store) = harness(
        IntakeConfig::default(),
        vec![
            ("f0", pattern_png(P_RAMP)),
            ("f1", pattern_png(P_RAMP_INV)),
            ("f2", pattern_png(P_ALT)),
        ],
    );

    let outcome = workflow
        .submit_batch(USER, Platform::GoogleReview, &locators(&["f0", "f1", "f2"]))
        .await
        .unwrap();

    assert_eq!(outcome.successful.len(), 3);
    assert!(outcome.duplicates.is_empty());
    assert!(outcome.failed.is_empty());
}

#[tokio::test]
async fn oversized_batch_is_rejected_before_any_processing() {
    let config = IntakeConfig {
        max_batch_size: 3,
        ..IntakeConfig::default()
    };
    let (workflow, store) = harness(config, vec![("f0", pattern_png(P_RAMP))]);

    let err = workflow
        .submit_batch(
            USER,
            Platform::Facebook,
            &locators(&["f0", "f1", "f2", "f3"]),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        IntakeError::BatchTooLarge {
            submitted: 4,
            max: 3
        }
    ));
    assert_eq!(store.submission_count(), 0);
}

#[tokio::test]
async fn pending_mode_defers_earnings_to_admin_review() {
    let config = IntakeConfig {
        auto_approve: false,
        ..IntakeConfig::default()
    };
    let (workflow, store) = harness(config, vec![("shot-1", pattern_png(P_RAMP))]);

    let outcome = workflow
        .submit_single(USER, Platform::Facebook, "shot-1")
        .await
        .unwrap();

    let record = store.submission(outcome.submission_id).unwrap();
    assert_eq!(record.status, SubmissionStatus::Pending);
    assert_eq!(outcome.earnings.total_earned_cents, 0);
    assert_eq!(outcome_snapshot(&store).await.total_earned_cents, 0);
}

#[tokio::test]
async fn pending_submissions_still_block_duplicates() {
    let config = IntakeConfig {
        auto_approve: false,
        ..IntakeConfig::default()
    };
    let (workflow, _store) = harness(
        config,
        vec![
            ("shot-1", pattern_png(P_RAMP)),
            ("shot-2", pattern_png(P_RAMP)),
        ],
    );

    workflow
        .submit_single(USER, Platform::Facebook, "shot-1")
        .await
        .unwrap();

    let err = workflow
        .submit_single(USER, Platform::Facebook, "shot-2")
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Duplicate(_)));
}

struct FailingNotifier;

#[async_trait]
impl BalanceNotifier for FailingNotifier {
    async fn balance_changed(
        &self,
        _user: UserId,
        _snapshot: EarningsSnapshot,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::DeliveryFailed("push gateway down".to_string()))
    }
}

#[tokio::test]
async fn notifier_failure_never_fails_the_intake() {
    let mut source = InMemoryImageSource::new();
    source.insert("shot-1", pattern_png(P_RAMP));
    let store = Arc::new(InMemoryStore::new());

    let workflow = IntakeWorkflow::builder()
        .images(Arc::new(source))
        .store(store.clone())
        .notifier(Arc::new(FailingNotifier))
        .build()
        .unwrap();

    let outcome = workflow
        .submit_single(USER, Platform::Facebook, "shot-1")
        .await
        .unwrap();
    assert_eq!(outcome.earnings.total_earned_cents, 50);
    assert_eq!(store.submission_count(), 1);
}

#[tokio::test]
async fn channel_notifier_receives_the_new_balance() {
    let (notifier, mut updates) = ChannelNotifier::new();

    let mut source = InMemoryImageSource::new();
    source.insert("shot-1", pattern_png(P_RAMP));
    let store = Arc::new(InMemoryStore::new());

    let workflow = IntakeWorkflow::builder()
        .images(Arc::new(source))
        .store(store)
        .notifier(Arc::new(notifier))
        .build()
        .unwrap();

    workflow
        .submit_single(USER, Platform::Facebook, "shot-1")
        .await
        .unwrap();

    let update = updates.recv().await.unwrap();
    assert_eq!(update.user, USER);
    assert_eq!(update.snapshot.total_earned_cents, 50);
}
