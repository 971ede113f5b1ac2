//! Handlers for the `/submissions` resource.
//!
//! Submissions are made by the applicant (the team leader for team
//! applications), one per application. Reviewers attach feedback and move
//! submissions through the review statuses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use talentforge_core::application::ApplicationType;
use talentforge_core::error::CoreError;
use talentforge_core::types::DbId;
use talentforge_db::models::submission::{
    validate_submission_status, CreateFeedback, CreateSubmission, Feedback, Submission,
    SubmissionWithChallenge,
};
use talentforge_db::repositories::{ApplicationRepo, SubmissionRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::PaginationParams;
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One external link attached to a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

/// Request body for `POST /submissions`.
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub application_id: DbId,
    #[serde(default)]
    pub deployed_links: Vec<Link>,
    #[serde(default)]
    pub github_links: Vec<Link>,
    #[serde(default)]
    pub figma_links: Vec<Link>,
    #[serde(default)]
    pub other_links: Vec<Link>,
    pub submitter_comments: Option<String>,
}

/// Request body for `PUT /submissions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Query parameters for `GET /submissions`.
#[derive(Debug, Deserialize)]
pub struct SubmissionQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
}

/// A submission with its (visibility-filtered) feedback attached.
#[derive(Debug, Serialize)]
pub struct SubmissionWithFeedback {
    #[serde(flatten)]
    pub submission: SubmissionWithChallenge,
    pub feedback: Vec<Feedback>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/submissions
///
/// Submit a solution for an application. Only the applicant may submit, and
/// only once per application.
pub async fn create_submission(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateSubmissionRequest>,
) -> AppResult<(StatusCode, Json<Submission>)> {
    let application = ApplicationRepo::find_by_id(&state.pool, input.application_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::not_found("Application", input.application_id))
        })?;

    if application.applicant_id != user.user_id {
        let message = match application.app_type {
            ApplicationType::Team => "Only the team leader can submit solutions",
            ApplicationType::Individual => "Not authorized to submit for this application",
        };
        return Err(AppError::Core(CoreError::Forbidden(message.into())));
    }

    if SubmissionRepo::exists_for_application(&state.pool, application.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "A submission already exists for this application".into(),
        )));
    }

    let create_dto = CreateSubmission {
        application_id: application.id,
        submitter_id: user.user_id,
        deployed_links: to_json(&input.deployed_links)?,
        github_links: to_json(&input.github_links)?,
        figma_links: to_json(&input.figma_links)?,
        other_links: to_json(&input.other_links)?,
        submitter_comments: input.submitter_comments,
    };
    let submission = SubmissionRepo::create(&state.pool, &create_dto).await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/v1/submissions
///
/// List all submissions (admin), optionally filtered by review status.
pub async fn list_submissions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<SubmissionQueryParams>,
) -> AppResult<Json<Paginated<SubmissionWithChallenge>>> {
    if let Some(status) = &params.status {
        validate_submission_status(status)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let submissions =
        SubmissionRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    let total = SubmissionRepo::count(&state.pool, params.status.as_deref()).await?;

    Ok(Json(Paginated::new(submissions, total, page, limit)))
}

/// GET /api/v1/submissions/mine
///
/// List the caller's own submissions with public feedback attached.
pub async fn my_submissions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<SubmissionWithFeedback>>> {
    let (page, limit, offset) = pagination.resolve();

    let submissions =
        SubmissionRepo::list_by_submitter(&state.pool, user.user_id, limit, offset).await?;
    let total = SubmissionRepo::count_by_submitter(&state.pool, user.user_id).await?;

    let mut enriched = Vec::with_capacity(submissions.len());
    for submission in submissions {
        let feedback = SubmissionRepo::list_feedback(&state.pool, submission.id, false).await?;
        enriched.push(SubmissionWithFeedback {
            submission,
            feedback,
        });
    }

    Ok(Json(Paginated::new(enriched, total, page, limit)))
}

/// POST /api/v1/submissions/{id}/feedback
///
/// Attach reviewer feedback to a submission.
pub async fn add_feedback(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<CreateFeedback>,
) -> AppResult<(StatusCode, Json<Feedback>)> {
    if SubmissionRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("Submission", id)));
    }

    let feedback = SubmissionRepo::add_feedback(&state.pool, id, admin.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

/// PUT /api/v1/submissions/{id}/status
///
/// Move a submission to a new review status.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<Submission>> {
    validate_submission_status(&input.status)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let submission = SubmissionRepo::update_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Submission", id)))?;

    Ok(Json(submission))
}

fn to_json(links: &[Link]) -> AppResult<serde_json::Value> {
    serde_json::to_value(links)
        .map_err(|e| AppError::InternalError(format!("Link serialization error: {e}")))
}
