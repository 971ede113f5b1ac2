//! Handlers for the `/users` resource (admin user management).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use talentforge_core::error::CoreError;
use talentforge_core::roles::{validate_role, VALID_ROLES};
use talentforge_core::types::DbId;
use talentforge_db::models::user::{UpdateUser, UserResponse};
use talentforge_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;

/// GET /api/v1/users/roles
///
/// List the assignable role names.
pub async fn list_roles(RequireAdmin(_admin): RequireAdmin) -> Json<DataResponse<Vec<&'static str>>> {
    Json(DataResponse {
        data: VALID_ROLES.to_vec(),
    })
}

/// GET /api/v1/users
///
/// List users, newest first, paginated.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let (page, limit, offset) = pagination.resolve();

    let users = UserRepo::list(&state.pool, limit, offset).await?;
    let total = UserRepo::count(&state.pool).await?;

    let responses = users.iter().map(|u| u.to_response()).collect();
    Ok(Json(Paginated::new(responses, total, page, limit)))
}

/// GET /api/v1/users/{id}
///
/// Get a single user by ID.
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", id)))?;

    Ok(Json(user.to_response()))
}

/// PATCH /api/v1/users/{id}
///
/// Update a user's profile fields (not password or verification state).
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    if let Some(role) = &input.role {
        validate_role(role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", id)))?;

    Ok(Json(user.to_response()))
}

/// DELETE /api/v1/users/{id}
///
/// Remove a user. Returns 204 No Content.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = UserRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("User", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
