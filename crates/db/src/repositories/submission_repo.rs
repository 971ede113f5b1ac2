//! Repository for the `submissions` and `submission_feedback` tables.
//!
//! Feedback rows are owned by their submission (cascade delete) and are only
//! reachable through it.

use sqlx::PgPool;
use talentforge_core::types::DbId;

use crate::models::submission::{
    CreateFeedback, CreateSubmission, Feedback, Submission, SubmissionWithChallenge,
};

/// Column list for `submissions` queries.
const COLUMNS: &str = "id, application_id, submitter_id, deployed_links, github_links, \
    figma_links, other_links, submitter_comments, status, last_updated, created_at";

/// Column list for queries joining the owning challenge (aliased `s` / `c`).
const JOINED_COLUMNS: &str = "s.id, s.application_id, s.submitter_id, s.deployed_links, \
    s.github_links, s.figma_links, s.other_links, s.submitter_comments, s.status, \
    s.last_updated, s.created_at, c.title AS challenge_title, c.slug AS challenge_slug";

/// Feedback column list.
const FEEDBACK_COLUMNS: &str = "id, submission_id, reviewer_id, comment, is_private, created_at";

/// Provides operations for solution submissions and reviewer feedback.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a new submission, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmission,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions
                (application_id, submitter_id, deployed_links, github_links,
                 figma_links, other_links, submitter_comments)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.application_id)
            .bind(input.submitter_id)
            .bind(&input.deployed_links)
            .bind(&input.github_links)
            .bind(&input.figma_links)
            .bind(&input.other_links)
            .bind(&input.submitter_comments)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a submission already exists for an application.
    pub async fn exists_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM submissions WHERE application_id = $1)")
            .bind(application_id)
            .fetch_one(pool)
            .await
    }

    /// List submissions with challenge identity, optionally filtered by
    /// status, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionWithChallenge>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM submissions s
             JOIN applications a ON a.id = s.application_id
             JOIN challenges c ON c.id = a.challenge_id
             WHERE ($1::text IS NULL OR s.status = $1)
             ORDER BY s.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SubmissionWithChallenge>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count submissions, optionally filtered by status.
    pub async fn count(pool: &PgPool, status: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM submissions WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// List a user's own submissions with challenge identity, newest first.
    pub async fn list_by_submitter(
        pool: &PgPool,
        submitter_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SubmissionWithChallenge>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM submissions s
             JOIN applications a ON a.id = s.application_id
             JOIN challenges c ON c.id = a.challenge_id
             WHERE s.submitter_id = $1
             ORDER BY s.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SubmissionWithChallenge>(&query)
            .bind(submitter_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a user's own submissions.
    pub async fn count_by_submitter(
        pool: &PgPool,
        submitter_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM submissions WHERE submitter_id = $1")
            .bind(submitter_id)
            .fetch_one(pool)
            .await
    }

    /// Append reviewer feedback and bump the submission's `last_updated`.
    pub async fn add_feedback(
        pool: &PgPool,
        submission_id: DbId,
        reviewer_id: DbId,
        input: &CreateFeedback,
    ) -> Result<Feedback, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO submission_feedback (submission_id, reviewer_id, comment, is_private)
             VALUES ($1, $2, $3, $4)
             RETURNING {FEEDBACK_COLUMNS}"
        );
        let feedback = sqlx::query_as::<_, Feedback>(&query)
            .bind(submission_id)
            .bind(reviewer_id)
            .bind(&input.comment)
            .bind(input.is_private)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE submissions SET last_updated = NOW() WHERE id = $1")
            .bind(submission_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(feedback)
    }

    /// List feedback for a submission, oldest first. Private feedback is
    /// excluded unless `include_private` is set.
    pub async fn list_feedback(
        pool: &PgPool,
        submission_id: DbId,
        include_private: bool,
    ) -> Result<Vec<Feedback>, sqlx::Error> {
        let filter = if include_private {
            ""
        } else {
            "AND is_private = false"
        };
        let query = format!(
            "SELECT {FEEDBACK_COLUMNS} FROM submission_feedback
             WHERE submission_id = $1 {filter}
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(submission_id)
            .fetch_all(pool)
            .await
    }

    /// Set a submission's review status and bump `last_updated`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "UPDATE submissions SET status = $2, last_updated = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
