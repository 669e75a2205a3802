//! # Model Module
//!
//! Domain types shared across the intake pipeline: users, platforms,
//! submissions, and earnings counters.

mod earnings;
mod submission;

pub use earnings::{Earnings, EarningsSnapshot};
pub use submission::{NewSubmission, Submission, SubmissionStatus};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a submitting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a submission, assigned at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    /// Generate a fresh submission id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Social network / task type a submission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Facebook,
    Instagram,
    Twitter,
    Youtube,
    Tiktok,
    GoogleReview,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Twitter => "twitter",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::GoogleReview => "google_review",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "facebook" => Some(Self::Facebook),
            "instagram" => Some(Self::Instagram),
            "twitter" => Some(Self::Twitter),
            "youtube" => Some(Self::Youtube),
            "tiktok" => Some(Self::Tiktok),
            "google_review" => Some(Self::GoogleReview),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Facebook => "Facebook",
            Self::Instagram => "Instagram",
            Self::Twitter => "Twitter",
            Self::Youtube => "YouTube",
            Self::Tiktok => "TikTok",
            Self::GoogleReview => "Google Review",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_roundtrip() {
        let platform = Platform::GoogleReview;
        assert_eq!(Platform::from_str(platform.as_str()), Some(platform));
    }

    #[test]
    fn platform_rejects_unknown_tag() {
        assert_eq!(Platform::from_str("myspace"), None);
    }

    #[test]
    fn submission_ids_are_unique() {
        assert_ne!(SubmissionId::new(), SubmissionId::new());
    }
}
