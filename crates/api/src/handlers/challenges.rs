//! Handlers for the `/challenges` resource (CRUD and listing).
//!
//! Application and participant endpoints mounted under `/challenges` live in
//! [`crate::handlers::applications`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use talentforge_core::challenge::{validate_team_size, ChallengeStatus, ChallengeType};
use talentforge_core::error::CoreError;
use talentforge_core::slug::generate_slug;
use talentforge_core::types::{DbId, Timestamp};
use talentforge_db::models::challenge::{
    ChallengeFilter, ChallengeResponse, CreateChallenge, UpdateChallenge,
};
use talentforge_db::repositories::{CategoryRepo, ChallengeRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /challenges`.
#[derive(Debug, Deserialize)]
pub struct CreateChallengeRequest {
    pub title: String,
    pub description: String,
    pub contact_email: String,
    pub tasks: Option<String>,
    #[serde(default = "empty_json_array")]
    pub prizes: serde_json::Value,
    #[serde(default)]
    pub skills_needed: Vec<String>,
    pub juniority_level: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(rename = "type")]
    pub challenge_type: String,
    pub team_size: Option<i32>,
    pub category_id: DbId,
}

fn empty_json_array() -> serde_json::Value {
    serde_json::Value::Array(Vec::new())
}

/// Query parameters for `GET /challenges`.
#[derive(Debug, Deserialize)]
pub struct ChallengeQueryParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    /// `asc` or `desc` (default `desc`).
    pub sort_order: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/challenges
///
/// Create a challenge. The category must exist; team challenges must carry a
/// valid team size. The slug is derived from the title.
pub async fn create_challenge(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateChallengeRequest>,
) -> AppResult<(StatusCode, Json<ChallengeResponse>)> {
    let challenge_type = ChallengeType::parse(&input.challenge_type)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    validate_team_size(challenge_type, input.team_size)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if CategoryRepo::find_by_id(&state.pool, input.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::not_found(
            "Category",
            input.category_id,
        )));
    }

    let create_dto = CreateChallenge {
        slug: generate_slug(&input.title),
        title: input.title,
        description: input.description,
        contact_email: input.contact_email,
        tasks: input.tasks,
        prizes: input.prizes,
        skills_needed: input.skills_needed,
        juniority_level: input.juniority_level,
        start_date: input.start_date,
        end_date: input.end_date,
        challenge_type: challenge_type.as_str().to_string(),
        team_size: input.team_size,
        category_id: input.category_id,
    };
    let challenge = ChallengeRepo::create(&state.pool, &create_dto).await?;

    // Re-read with the category joined for the response shape.
    let with_category = ChallengeRepo::find_with_category(&state.pool, challenge.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Created challenge vanished".into()))?;

    Ok((StatusCode::CREATED, Json(with_category.to_response())))
}

/// GET /api/v1/challenges
///
/// Paginated listing with optional status filter, title search, and sorting.
pub async fn list_challenges(
    State(state): State<AppState>,
    Query(params): Query<ChallengeQueryParams>,
) -> AppResult<Json<Paginated<ChallengeResponse>>> {
    if let Some(status) = &params.status {
        ChallengeStatus::parse(status)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let offset = (page - 1) * limit;

    let filter = ChallengeFilter {
        status: params.status,
        search: params.search,
        sort_field: params.sort_field,
        sort_desc: params.sort_order.as_deref() != Some("asc"),
    };

    let challenges = ChallengeRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = ChallengeRepo::count(&state.pool, &filter).await?;

    let responses = challenges.iter().map(|c| c.to_response()).collect();
    Ok(Json(Paginated::new(responses, total, page, limit)))
}

/// GET /api/v1/challenges/{id}
///
/// Fetch a challenge by numeric ID or by slug.
pub async fn get_challenge(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> AppResult<Json<ChallengeResponse>> {
    let challenge = match identifier.parse::<DbId>() {
        Ok(id) => ChallengeRepo::find_with_category(&state.pool, id).await?,
        Err(_) => ChallengeRepo::find_by_slug(&state.pool, &identifier).await?,
    };

    let challenge = challenge
        .ok_or_else(|| AppError::Core(CoreError::not_found("Challenge", &identifier)))?;

    Ok(Json(challenge.to_response()))
}

/// PUT /api/v1/challenges/{id}
///
/// Partially update a challenge.
pub async fn update_challenge(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateChallenge>,
) -> AppResult<Json<ChallengeResponse>> {
    if let Some(status) = &input.status {
        ChallengeStatus::parse(status)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    ChallengeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Challenge", id)))?;

    let with_category = ChallengeRepo::find_with_category(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Challenge", id)))?;

    Ok(Json(with_category.to_response()))
}

/// DELETE /api/v1/challenges/{id}
///
/// Remove a challenge. Returns 204 No Content.
pub async fn delete_challenge(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ChallengeRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Challenge", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
