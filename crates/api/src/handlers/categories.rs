//! Handlers for the `/categories` resource.
//!
//! Reads are public; writes require the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use talentforge_core::error::CoreError;
use talentforge_core::slug::generate_slug;
use talentforge_core::types::DbId;
use talentforge_db::models::category::{Category, CreateCategory, UpdateCategory};
use talentforge_db::repositories::CategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::Paginated;
use crate::state::AppState;

/// Request body for `POST /categories`.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for `PUT /categories/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// POST /api/v1/categories
///
/// Create a category; the slug is derived from the name.
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Category name is required".into(),
        )));
    }

    let slug = generate_slug(&input.name);

    if CategoryRepo::exists_by_name_or_slug(&state.pool, &input.name, &slug).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Category with this name or slug already exists".into(),
        )));
    }

    let create_dto = CreateCategory {
        name: input.name,
        slug,
        description: input.description,
        tags: input.tags,
    };
    let category = CategoryRepo::create(&state.pool, &create_dto).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/v1/categories
///
/// List categories, newest first, paginated.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Category>>> {
    let (page, limit, offset) = pagination.resolve();

    let categories = CategoryRepo::list(&state.pool, limit, offset).await?;
    let total = CategoryRepo::count(&state.pool).await?;

    Ok(Json(Paginated::new(categories, total, page, limit)))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Category>> {
    let category = CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Category", id)))?;

    Ok(Json(category))
}

/// PUT /api/v1/categories/{id}
///
/// Update a category; a name change regenerates the slug.
pub async fn update_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategoryRequest>,
) -> AppResult<Json<Category>> {
    let slug = input.name.as_deref().map(generate_slug);

    let update_dto = UpdateCategory {
        name: input.name,
        slug,
        description: input.description,
        tags: input.tags,
    };

    let category = CategoryRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Category", id)))?;

    Ok(Json(category))
}

/// DELETE /api/v1/categories/{id}
///
/// Remove a category. Returns 204 No Content.
pub async fn delete_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CategoryRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Category", id)));
    }
    Ok(StatusCode::NO_CONTENT)
}
