//! # Screenshot Guard
//!
//! Duplicate-screenshot detection and reward intake for engagement
//! platforms: users submit screenshots as proof of social-network
//! actions, and this library decides whether a screenshot is a
//! re-submission of one they already earned for.
//!
//! ## Core Philosophy
//! - **Perceptual, not cryptographic** - a lightly re-encoded copy of the
//!   same screenshot must still match; security-grade hashing is a
//!   non-goal
//! - **Reject, don't fail** - a duplicate is a user-correctable
//!   condition, kept distinct from genuine fetch/decode/storage failures
//! - **Fail open on bad history** - corrupt legacy fingerprints degrade
//!   duplicate recall, never availability
//!
//! ## Architecture
//! The library is split into a core engine and its seams:
//! - `core` - Hashing, comparison, scanning, and intake orchestration
//! - `model` - Submissions, earnings, platforms
//! - `events` - Event-driven progress reporting (audit/UI-ready)
//! - `error` - The intake error taxonomy

pub mod core;
pub mod error;
pub mod events;
pub mod model;

// Re-export commonly used types at the crate root
pub use crate::core::intake::{IntakeConfig, IntakeWorkflow, RewardSchedule};
pub use crate::error::{IntakeError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
