//! Submission entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentforge_core::types::{DbId, Timestamp};

/// Review statuses a submission moves through.
pub const SUBMISSION_STATUSES: &[&str] = &[
    "pending_review",
    "under_review",
    "requires_changes",
    "accepted",
    "rejected",
];

/// Validate that a submission status string is one of the accepted values.
pub fn validate_submission_status(status: &str) -> Result<(), String> {
    if SUBMISSION_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid submission status '{status}'. Must be one of: {}",
            SUBMISSION_STATUSES.join(", ")
        ))
    }
}

/// Full submission row from the `submissions` table.
///
/// The link columns are JSONB arrays of `{title, url, description?}` objects.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub application_id: DbId,
    pub submitter_id: DbId,
    pub deployed_links: serde_json::Value,
    pub github_links: serde_json::Value,
    pub figma_links: serde_json::Value,
    pub other_links: serde_json::Value,
    pub submitter_comments: Option<String>,
    pub status: String,
    pub last_updated: Timestamp,
    pub created_at: Timestamp,
}

/// Submission row joined with its challenge identity, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SubmissionWithChallenge {
    pub id: DbId,
    pub application_id: DbId,
    pub submitter_id: DbId,
    pub deployed_links: serde_json::Value,
    pub github_links: serde_json::Value,
    pub figma_links: serde_json::Value,
    pub other_links: serde_json::Value,
    pub submitter_comments: Option<String>,
    pub status: String,
    pub last_updated: Timestamp,
    pub created_at: Timestamp,
    pub challenge_title: String,
    pub challenge_slug: String,
}

/// One piece of reviewer feedback on a submission.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub submission_id: DbId,
    pub reviewer_id: DbId,
    pub comment: String,
    pub is_private: bool,
    pub created_at: Timestamp,
}

/// DTO for inserting a submission.
#[derive(Debug)]
pub struct CreateSubmission {
    pub application_id: DbId,
    pub submitter_id: DbId,
    pub deployed_links: serde_json::Value,
    pub github_links: serde_json::Value,
    pub figma_links: serde_json::Value,
    pub other_links: serde_json::Value,
    pub submitter_comments: Option<String>,
}

/// DTO for appending feedback.
#[derive(Debug, Deserialize)]
pub struct CreateFeedback {
    pub comment: String,
    #[serde(default)]
    pub is_private: bool,
}
