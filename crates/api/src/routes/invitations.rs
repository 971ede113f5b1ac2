//! Route definitions for the `/team-invitations` resource.
//!
//! Token-addressed and unauthenticated: invitees respond straight from the
//! emailed link, before they ever log in.

use axum::routing::post;
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Routes mounted at `/team-invitations`.
///
/// ```text
/// POST /{token}/accept -> accept_invitation
/// POST /{token}/reject -> reject_invitation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{token}/accept", post(applications::accept_invitation))
        .route("/{token}/reject", post(applications::reject_invitation))
}
