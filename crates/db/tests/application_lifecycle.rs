//! Integration tests for the application/team-member lifecycle.
//!
//! Exercises the invitation state machine against a real database:
//! atomic team creation, uniqueness across both participation dimensions,
//! single-use tokens, expiry, the rejection cascade, and the exactly-once
//! finalization of fully-accepted teams.

mod common;

use common::{
    create_category, create_challenge, create_verified_user, expired_member, new_member,
};
use sqlx::PgPool;
use talentforge_core::application::{
    ApplicationStatus, ApplicationType, TeamMemberState, TeamMemberStatus,
};
use talentforge_db::repositories::ApplicationRepo;

/// Pull the live invitation token of the member at `index`.
fn member_token(app: &talentforge_db::models::application::Application, index: usize) -> String {
    match &app.members[index].state {
        TeamMemberState::Pending { token, .. } => token.clone(),
        other => panic!("member {index} is not pending: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn individual_application_accepted_immediately(pool: PgPool) {
    let leader = create_verified_user(&pool, "Solo", "solo@test.com").await;
    let category = create_category(&pool, "Design", "design").await;
    let challenge = create_challenge(&pool, category, "solo-ch", "individual", None).await;

    let app = ApplicationRepo::create_individual(&pool, challenge, leader.id)
        .await
        .unwrap();

    assert_eq!(app.app_type, ApplicationType::Individual);
    assert_eq!(app.status, ApplicationStatus::Accepted);
    assert!(app.members.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn team_application_created_pending_with_all_members(pool: PgPool) {
    let leader = create_verified_user(&pool, "Lead", "lead@test.com").await;
    let alice = create_verified_user(&pool, "Alice", "alice@test.com").await;
    let bob = create_verified_user(&pool, "Bob", "bob@test.com").await;
    let category = create_category(&pool, "Backend", "backend").await;
    let challenge = create_challenge(&pool, category, "team-ch", "team", Some(3)).await;

    let members = vec![new_member(&alice), new_member(&bob)];
    let app = ApplicationRepo::create_team(&pool, challenge, leader.id, &members)
        .await
        .unwrap();

    assert_eq!(app.app_type, ApplicationType::Team);
    assert_eq!(app.status, ApplicationStatus::Pending);
    assert_eq!(app.members.len(), 2);
    for member in &app.members {
        assert!(member.state.is_pending());
    }

    // Tokens are distinct per member.
    let t0 = member_token(&app, 0);
    let t1 = member_token(&app, 1);
    assert_ne!(t0, t1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_applicant_hits_unique_index(pool: PgPool) {
    let leader = create_verified_user(&pool, "Dup", "dup@test.com").await;
    let category = create_category(&pool, "QA", "qa").await;
    let challenge = create_challenge(&pool, category, "dup-ch", "individual", None).await;

    ApplicationRepo::create_individual(&pool, challenge, leader.id)
        .await
        .unwrap();
    let second = ApplicationRepo::create_individual(&pool, challenge, leader.id).await;
    assert!(second.is_err(), "second application must violate uq index");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_cannot_join_two_teams_for_one_challenge(pool: PgPool) {
    let lead_a = create_verified_user(&pool, "LeadA", "lead-a@test.com").await;
    let lead_b = create_verified_user(&pool, "LeadB", "lead-b@test.com").await;
    let shared = create_verified_user(&pool, "Shared", "shared@test.com").await;
    let category = create_category(&pool, "Data", "data").await;
    let challenge = create_challenge(&pool, category, "two-teams", "team", Some(2)).await;

    ApplicationRepo::create_team(&pool, challenge, lead_a.id, &[new_member(&shared)])
        .await
        .unwrap();

    let second =
        ApplicationRepo::create_team(&pool, challenge, lead_b.id, &[new_member(&shared)]).await;
    assert!(
        second.is_err(),
        "the shared member must violate uq_team_members_user_challenge"
    );

    // The failed transaction must not leave a partial application behind:
    // lead_b does not participate.
    assert!(
        !ApplicationRepo::has_participant(&pool, challenge, lead_b.id)
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn participation_covers_both_roles(pool: PgPool) {
    let leader = create_verified_user(&pool, "Lead", "lead@test.com").await;
    let member = create_verified_user(&pool, "Member", "member@test.com").await;
    let outsider = create_verified_user(&pool, "Out", "out@test.com").await;
    let category = create_category(&pool, "Sec", "sec").await;
    let challenge = create_challenge(&pool, category, "roles-ch", "team", Some(2)).await;

    ApplicationRepo::create_team(&pool, challenge, leader.id, &[new_member(&member)])
        .await
        .unwrap();

    assert!(ApplicationRepo::has_participant(&pool, challenge, leader.id)
        .await
        .unwrap());
    assert!(ApplicationRepo::has_participant(&pool, challenge, member.id)
        .await
        .unwrap());
    assert!(!ApplicationRepo::has_participant(&pool, challenge, outsider.id)
        .await
        .unwrap());

    assert!(
        ApplicationRepo::any_participant(&pool, challenge, &[outsider.id, member.id])
            .await
            .unwrap()
    );
    assert!(
        !ApplicationRepo::any_participant(&pool, challenge, &[outsider.id])
            .await
            .unwrap()
    );
}

// ---------------------------------------------------------------------------
// Token lookup and response
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn token_is_single_use(pool: PgPool) {
    let leader = create_verified_user(&pool, "Lead", "lead@test.com").await;
    let alice = create_verified_user(&pool, "Alice", "alice@test.com").await;
    let bob = create_verified_user(&pool, "Bob", "bob@test.com").await;
    let category = create_category(&pool, "Web", "web").await;
    let challenge = create_challenge(&pool, category, "single-use", "team", Some(3)).await;

    let app = ApplicationRepo::create_team(
        &pool,
        challenge,
        leader.id,
        &[new_member(&alice), new_member(&bob)],
    )
    .await
    .unwrap();
    let token = member_token(&app, 0);

    // The token resolves while pending.
    assert!(ApplicationRepo::find_by_active_token(&pool, &token)
        .await
        .unwrap()
        .is_some());

    // First response wins.
    let outcome =
        ApplicationRepo::record_member_response(&pool, &token, TeamMemberStatus::Accepted)
            .await
            .unwrap();
    assert!(outcome.is_some());
    assert_eq!(outcome.unwrap().user_id, alice.id);

    // The token is cleared by the response: replay fails both at lookup and
    // at the conditional update.
    assert!(ApplicationRepo::find_by_active_token(&pool, &token)
        .await
        .unwrap()
        .is_none());
    assert!(
        ApplicationRepo::record_member_response(&pool, &token, TeamMemberStatus::Accepted)
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn expired_token_indistinguishable_from_unknown(pool: PgPool) {
    let leader = create_verified_user(&pool, "Lead", "lead@test.com").await;
    let alice = create_verified_user(&pool, "Alice", "alice@test.com").await;
    let category = create_category(&pool, "ML", "ml").await;
    let challenge = create_challenge(&pool, category, "expired-ch", "team", Some(2)).await;

    let member = expired_member(&alice);
    let token = member.token.clone();
    ApplicationRepo::create_team(&pool, challenge, leader.id, &[member])
        .await
        .unwrap();

    // Expired-but-present behaves exactly like absent.
    assert!(ApplicationRepo::find_by_active_token(&pool, &token)
        .await
        .unwrap()
        .is_none());
    assert!(ApplicationRepo::find_by_active_token(&pool, "no-such-token")
        .await
        .unwrap()
        .is_none());
    assert!(
        ApplicationRepo::record_member_response(&pool, &token, TeamMemberStatus::Accepted)
            .await
            .unwrap()
            .is_none()
    );
}

// ---------------------------------------------------------------------------
// Finalization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_fires_exactly_once_after_last_acceptance(pool: PgPool) {
    let leader = create_verified_user(&pool, "Lead", "lead@test.com").await;
    let alice = create_verified_user(&pool, "Alice", "alice@test.com").await;
    let bob = create_verified_user(&pool, "Bob", "bob@test.com").await;
    let category = create_category(&pool, "Infra", "infra").await;
    let challenge = create_challenge(&pool, category, "finalize-ch", "team", Some(3)).await;

    let app = ApplicationRepo::create_team(
        &pool,
        challenge,
        leader.id,
        &[new_member(&alice), new_member(&bob)],
    )
    .await
    .unwrap();
    let t0 = member_token(&app, 0);
    let t1 = member_token(&app, 1);

    // First acceptance: one member still pending, no transition.
    ApplicationRepo::record_member_response(&pool, &t0, TeamMemberStatus::Accepted)
        .await
        .unwrap()
        .expect("first response should record");
    assert!(!ApplicationRepo::finalize_if_complete(&pool, app.id)
        .await
        .unwrap());

    let mid = ApplicationRepo::find_by_id(&pool, app.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mid.status, ApplicationStatus::Pending);

    // Second acceptance completes the team; exactly one finalize succeeds.
    ApplicationRepo::record_member_response(&pool, &t1, TeamMemberStatus::Accepted)
        .await
        .unwrap()
        .expect("second response should record");
    assert!(ApplicationRepo::finalize_if_complete(&pool, app.id)
        .await
        .unwrap());
    assert!(
        !ApplicationRepo::finalize_if_complete(&pool, app.id)
            .await
            .unwrap(),
        "a second finalize must be a no-op"
    );

    let done = ApplicationRepo::find_by_id(&pool, app.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status, ApplicationStatus::Accepted);
    for member in &done.members {
        assert_eq!(member.state.status(), TeamMemberStatus::Accepted);
    }
}

// ---------------------------------------------------------------------------
// Rejection cascade
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejection_cascade_voids_remaining_tokens(pool: PgPool) {
    let leader = create_verified_user(&pool, "Lead", "lead@test.com").await;
    let alice = create_verified_user(&pool, "Alice", "alice@test.com").await;
    let bob = create_verified_user(&pool, "Bob", "bob@test.com").await;
    let category = create_category(&pool, "Games", "games").await;
    let challenge = create_challenge(&pool, category, "reject-ch", "team", Some(3)).await;

    let app = ApplicationRepo::create_team(
        &pool,
        challenge,
        leader.id,
        &[new_member(&alice), new_member(&bob)],
    )
    .await
    .unwrap();
    let t_alice = member_token(&app, 0);
    let t_bob = member_token(&app, 1);

    let outcome =
        ApplicationRepo::record_member_response(&pool, &t_alice, TeamMemberStatus::Rejected)
            .await
            .unwrap()
            .expect("rejection should record");
    assert_eq!(outcome.email, alice.email);

    assert!(ApplicationRepo::delete(&pool, app.id).await.unwrap());

    // The application and its member rows are gone; Bob's still-unexpired
    // token no longer resolves, and nobody participates anymore.
    assert!(ApplicationRepo::find_by_id(&pool, app.id)
        .await
        .unwrap()
        .is_none());
    assert!(ApplicationRepo::find_by_active_token(&pool, &t_bob)
        .await
        .unwrap()
        .is_none());
    assert!(!ApplicationRepo::has_participant(&pool, challenge, leader.id)
        .await
        .unwrap());

    // Everyone may apply to the challenge again.
    ApplicationRepo::create_team(&pool, challenge, leader.id, &[new_member(&alice)])
        .await
        .expect("re-application after cascade should succeed");
}

// ---------------------------------------------------------------------------
// Accepted listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn accepted_listing_includes_members(pool: PgPool) {
    let solo = create_verified_user(&pool, "Solo", "solo@test.com").await;
    let leader = create_verified_user(&pool, "Lead", "lead@test.com").await;
    let alice = create_verified_user(&pool, "Alice", "alice@test.com").await;
    let category = create_category(&pool, "Mixed", "mixed").await;
    let solo_challenge = create_challenge(&pool, category, "solo-list", "individual", None).await;
    let team_challenge = create_challenge(&pool, category, "team-list", "team", Some(2)).await;

    ApplicationRepo::create_individual(&pool, solo_challenge, solo.id)
        .await
        .unwrap();

    let app = ApplicationRepo::create_team(&pool, team_challenge, leader.id, &[new_member(&alice)])
        .await
        .unwrap();
    let token = member_token(&app, 0);
    ApplicationRepo::record_member_response(&pool, &token, TeamMemberStatus::Accepted)
        .await
        .unwrap()
        .unwrap();
    ApplicationRepo::finalize_if_complete(&pool, app.id)
        .await
        .unwrap();

    // A pending team on the same challenge must not show up.
    let other_lead = create_verified_user(&pool, "Other", "other@test.com").await;
    let carol = create_verified_user(&pool, "Carol", "carol@test.com").await;
    ApplicationRepo::create_team(&pool, team_challenge, other_lead.id, &[new_member(&carol)])
        .await
        .unwrap();

    let accepted = ApplicationRepo::list_accepted_for_challenge(&pool, team_challenge)
        .await
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].applicant_id, leader.id);
    assert_eq!(accepted[0].members.len(), 1);
    assert_eq!(accepted[0].members[0].user_id, alice.id);

    let solo_accepted = ApplicationRepo::list_accepted_for_challenge(&pool, solo_challenge)
        .await
        .unwrap();
    assert_eq!(solo_accepted.len(), 1);
    assert!(solo_accepted[0].members.is_empty());
}
