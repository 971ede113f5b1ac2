//! Route definitions for the `/users` resource (admin only).

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /         -> list_users
/// GET    /roles    -> list_roles
/// GET    /{id}     -> get_user
/// PATCH  /{id}     -> update_user
/// DELETE /{id}     -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/roles", get(users::list_roles))
        .route(
            "/{id}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
