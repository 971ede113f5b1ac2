//! Route definitions for the `/challenges` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{applications, challenges};
use crate::state::AppState;

/// Routes mounted at `/challenges`.
///
/// ```text
/// GET    /                       -> list_challenges (public)
/// POST   /                       -> create_challenge (admin)
/// GET    /{id}                   -> get_challenge by id or slug (public)
/// PUT    /{id}                   -> update_challenge (admin)
/// DELETE /{id}                   -> delete_challenge (admin)
/// POST   /{id}/apply             -> apply_to_challenge (auth)
/// GET    /{id}/participants      -> get_challenge_participants (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(challenges::list_challenges).post(challenges::create_challenge),
        )
        .route(
            "/{id}",
            get(challenges::get_challenge)
                .put(challenges::update_challenge)
                .delete(challenges::delete_challenge),
        )
        .route("/{id}/apply", post(applications::apply_to_challenge))
        .route(
            "/{id}/participants",
            get(applications::get_challenge_participants),
        )
}
