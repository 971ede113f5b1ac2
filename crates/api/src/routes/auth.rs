//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /sign-up       -> sign_up
/// GET  /verify-email  -> verify_email
/// POST /login         -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/verify-email", get(auth::verify_email))
        .route("/login", post(auth::login))
}
