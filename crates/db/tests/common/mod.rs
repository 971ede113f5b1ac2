//! Shared fixtures for db integration tests.

use chrono::Utc;
use sqlx::PgPool;
use talentforge_core::application::{invitation_expiry, new_invitation_token};
use talentforge_core::roles::ROLE_TALENT;
use talentforge_core::types::DbId;
use talentforge_db::models::application::NewTeamMember;
use talentforge_db::models::category::CreateCategory;
use talentforge_db::models::challenge::CreateChallenge;
use talentforge_db::models::user::{CreateUser, User};
use talentforge_db::repositories::{CategoryRepo, ChallengeRepo, UserRepo};

/// Create a verified user with a unique email.
pub async fn create_verified_user(pool: &PgPool, first_name: &str, email: &str) -> User {
    let input = CreateUser {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        password_hash: "unused-hash".to_string(),
        role: ROLE_TALENT.to_string(),
        verification_token_hash: None,
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    UserRepo::mark_verified(pool, user.id)
        .await
        .expect("verification should succeed");
    UserRepo::find_by_id(pool, user.id)
        .await
        .expect("lookup should succeed")
        .expect("user should exist")
}

/// Create an unverified user with a unique email.
pub async fn create_unverified_user(pool: &PgPool, first_name: &str, email: &str) -> User {
    let input = CreateUser {
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        email: email.to_string(),
        password_hash: "unused-hash".to_string(),
        role: ROLE_TALENT.to_string(),
        verification_token_hash: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Create a category with a unique name.
pub async fn create_category(pool: &PgPool, name: &str, slug: &str) -> DbId {
    let input = CreateCategory {
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        tags: vec![],
    };
    CategoryRepo::create(pool, &input)
        .await
        .expect("category creation should succeed")
        .id
}

/// Create an open challenge of the given type.
pub async fn create_challenge(
    pool: &PgPool,
    category_id: DbId,
    slug: &str,
    challenge_type: &str,
    team_size: Option<i32>,
) -> DbId {
    let input = CreateChallenge {
        slug: slug.to_string(),
        title: format!("Challenge {slug}"),
        description: "A test challenge".to_string(),
        contact_email: "host@test.com".to_string(),
        tasks: None,
        prizes: serde_json::json!([]),
        skills_needed: vec!["rust".to_string()],
        juniority_level: "mid".to_string(),
        start_date: Utc::now(),
        end_date: Utc::now() + chrono::Duration::days(30),
        challenge_type: challenge_type.to_string(),
        team_size,
        category_id,
    };
    ChallengeRepo::create(pool, &input)
        .await
        .expect("challenge creation should succeed")
        .id
}

/// Build a pending-member insertion DTO with a fresh token expiring in 48h.
pub fn new_member(user: &User) -> NewTeamMember {
    NewTeamMember {
        user_id: user.id,
        email: user.email.clone(),
        token: new_invitation_token(),
        token_expires_at: invitation_expiry(Utc::now()),
    }
}

/// Build a pending-member insertion DTO whose token is already expired.
pub fn expired_member(user: &User) -> NewTeamMember {
    NewTeamMember {
        user_id: user.id,
        email: user.email.clone(),
        token: new_invitation_token(),
        token_expires_at: Utc::now() - chrono::Duration::hours(1),
    }
}
