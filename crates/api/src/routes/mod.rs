pub mod auth;
pub mod categories;
pub mod challenges;
pub mod health;
pub mod invitations;
pub mod submissions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/sign-up                       register (public)
/// /auth/verify-email                  confirm email (public)
/// /auth/login                         login (public)
///
/// /users                              list (admin)
/// /users/roles                        assignable roles (admin)
/// /users/{id}                         get, update, delete (admin)
///
/// /categories                         list (public), create (admin)
/// /categories/{id}                    get (public), update, delete (admin)
///
/// /challenges                         list (public), create (admin)
/// /challenges/{identifier}            get by id or slug (public)
/// /challenges/{id}                    update, delete (admin)
/// /challenges/{id}/apply              apply solo or with a team (auth)
/// /challenges/{id}/participants       accepted participant listing (public)
///
/// /team-invitations/{token}/accept    accept invitation (public, token-addressed)
/// /team-invitations/{token}/reject    reject invitation (public, token-addressed)
///
/// /submissions                        list all (admin), create (auth)
/// /submissions/mine                   caller's submissions (auth)
/// /submissions/{id}/feedback          attach feedback (admin)
/// /submissions/{id}/status            update review status (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/challenges", challenges::router())
        .nest("/team-invitations", invitations::router())
        .nest("/submissions", submissions::router())
}
