//! Route definitions for the `/submissions` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// GET  /              -> list_submissions (admin)
/// POST /              -> create_submission (auth)
/// GET  /mine          -> my_submissions (auth)
/// POST /{id}/feedback -> add_feedback (admin)
/// PUT  /{id}/status   -> update_status (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route("/mine", get(submissions::my_submissions))
        .route("/{id}/feedback", post(submissions::add_feedback))
        .route("/{id}/status", put(submissions::update_status))
}
