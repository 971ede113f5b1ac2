//! HTTP-level integration tests for category and challenge management.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_test_user, delete_auth, get, post_json_auth, send_json,
    token_for,
};
use sqlx::PgPool;

/// Build a minimal valid challenge creation body.
fn challenge_body(title: &str, category_id: i64) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Build something",
        "contact_email": "host@test.com",
        "juniority_level": "mid",
        "start_date": "2026-09-01T00:00:00Z",
        "end_date": "2026-10-01T00:00:00Z",
        "type": "individual",
        "category_id": category_id,
    })
}

/// Create a category over the API, returning its id.
async fn create_category_via_api(app: axum::Router, admin_token: &str, name: &str) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/categories",
        serde_json::json!({ "name": name }),
        admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// Category creation derives the slug and rejects duplicates; writes are
/// admin-only.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_create_rbac_and_slug(pool: PgPool) {
    let (admin, _) = create_test_user(&pool, "Root", "root@test.com", "admin", true).await;
    let (talent, _) = create_test_user(&pool, "Tal", "tal@test.com", "talent", true).await;
    let app = build_test_app(pool);
    let admin_token = token_for(admin.id, "admin");

    // Talent cannot create.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": "Web Development" }),
        &token_for(talent.id, "talent"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin can; the slug is derived.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": "Web Development", "tags": ["html", "css"] }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["slug"], "web-development");

    // Duplicate name conflicts.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/categories",
        serde_json::json!({ "name": "Web Development" }),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Public read shows the envelope.
    let response = get(app, "/api/v1/categories").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
}

// ---------------------------------------------------------------------------
// Challenges
// ---------------------------------------------------------------------------

/// Challenge creation validates the category, the type, and the team size.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_challenge_create_validation(pool: PgPool) {
    let (admin, _) = create_test_user(&pool, "Root", "root@test.com", "admin", true).await;
    let app = build_test_app(pool);
    let admin_token = token_for(admin.id, "admin");
    let category = create_category_via_api(app.clone(), &admin_token, "Backend").await;

    // Unknown category: 404.
    let mut body = challenge_body("API Sprint", 999_999);
    let response = post_json_auth(app.clone(), "/api/v1/challenges", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Team challenge without a team size: 400.
    body = challenge_body("Team Sprint", category);
    body["type"] = serde_json::json!("team");
    let response = post_json_auth(app.clone(), "/api/v1/challenges", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown type: 400.
    body = challenge_body("Odd Sprint", category);
    body["type"] = serde_json::json!("trio");
    let response = post_json_auth(app.clone(), "/api/v1/challenges", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Valid team challenge: 201 with category embedded and slug derived.
    body = challenge_body("Team Sprint", category);
    body["type"] = serde_json::json!("team");
    body["team_size"] = serde_json::json!(3);
    let response = post_json_auth(app, "/api/v1/challenges", body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["slug"], "team-sprint");
    assert_eq!(json["status"], "open");
    assert_eq!(json["team_size"], 3);
    assert_eq!(json["category"]["name"], "Backend");
}

/// Listing supports status filters and title search; detail lookup works by
/// id and by slug.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_challenge_listing_and_lookup(pool: PgPool) {
    let (admin, _) = create_test_user(&pool, "Root", "root@test.com", "admin", true).await;
    let app = build_test_app(pool);
    let admin_token = token_for(admin.id, "admin");
    let category = create_category_via_api(app.clone(), &admin_token, "Any").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/challenges",
        challenge_body("Alpha Run", category),
        &admin_token,
    )
    .await;
    let alpha_id = body_json(response).await["id"].as_i64().unwrap();

    post_json_auth(
        app.clone(),
        "/api/v1/challenges",
        challenge_body("Beta Run", category),
        &admin_token,
    )
    .await;

    // Archive Beta via update.
    let beta = get(app.clone(), "/api/v1/challenges/beta-run").await;
    let beta_id = body_json(beta).await["id"].as_i64().unwrap();
    let response = send_json(
        app.clone(),
        "PUT",
        &format!("/api/v1/challenges/{beta_id}"),
        serde_json::json!({ "status": "archived" }),
        Some(&admin_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Filter by status.
    let response = get(app.clone(), "/api/v1/challenges?status=open").await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["title"], "Alpha Run");

    // Bad status filter value rejected.
    let response = get(app.clone(), "/api/v1/challenges?status=bogus").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Case-insensitive search.
    let response = get(app.clone(), "/api/v1/challenges?search=beta").await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["title"], "Beta Run");

    // Lookup by numeric id and by slug return the same challenge.
    let by_id = get(app.clone(), &format!("/api/v1/challenges/{alpha_id}")).await;
    assert_eq!(by_id.status(), StatusCode::OK);
    let by_slug = get(app.clone(), "/api/v1/challenges/alpha-run").await;
    assert_eq!(by_slug.status(), StatusCode::OK);
    assert_eq!(
        body_json(by_id).await["id"],
        body_json(by_slug).await["id"]
    );

    // Unknown slug: 404.
    let response = get(app, "/api/v1/challenges/no-such-slug").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting a challenge requires admin and returns 204.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_challenge_delete(pool: PgPool) {
    let (admin, _) = create_test_user(&pool, "Root", "root@test.com", "admin", true).await;
    let (talent, _) = create_test_user(&pool, "Tal", "tal@test.com", "talent", true).await;
    let app = build_test_app(pool);
    let admin_token = token_for(admin.id, "admin");
    let category = create_category_via_api(app.clone(), &admin_token, "Temp").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/challenges",
        challenge_body("Doomed", category),
        &admin_token,
    )
    .await;
    let id = body_json(response).await["id"].as_i64().unwrap();

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/challenges/{id}"),
        &token_for(talent.id, "talent"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/v1/challenges/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, &format!("/api/v1/challenges/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
