//! Application workflow handlers: applying to a challenge, responding to
//! team invitations, and the participant listing.
//!
//! This is the coordination-heavy part of the platform. The invariants:
//!
//! * one application per user per challenge, whether they appear as the
//!   applicant or as an invited member (two unique indexes back the
//!   pre-checks, so a racing duplicate still surfaces as 409);
//! * a team application is created atomically with all its members;
//! * an invitation token is single-use and expires 48 hours after issue;
//! * any member rejection destroys the whole application;
//! * the application becomes accepted exactly once, when the last member
//!   accepts, and exactly one approval email goes to the leader.
//!
//! Emails are fire-and-forget: a failed send is logged and never rolls back
//! or blocks the owning write.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use talentforge_core::application::{
    invitation_expiry, new_invitation_token, recompute_status, validate_invitee_count,
    ApplicationStatus, ApplicationType, TeamMemberStatus, INVITATION_TTL_HOURS,
};
use talentforge_core::challenge::{ChallengeStatus, ChallengeType};
use talentforge_core::error::CoreError;
use talentforge_core::types::DbId;
use talentforge_db::models::application::{ApplicationResponse, NewTeamMember};
use talentforge_db::models::challenge::Challenge;
use talentforge_db::models::user::User;
use talentforge_db::repositories::{ApplicationRepo, ChallengeRepo, UserRepo};
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::query::PaginationParams;
use crate::response::Paginated;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /challenges/{id}/apply`.
#[derive(Debug, Deserialize)]
pub struct ApplyChallengeRequest {
    /// Team member emails; required for team challenges, ignored otherwise.
    pub team_members: Option<Vec<String>>,
}

/// Role of one participant row in the listing.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    TeamLeader,
    TeamMember,
}

/// One accepted person (leader or member) in the participant listing.
///
/// Names and email are resolved from the user directory at query time, not
/// from the snapshot stored on the membership row.
#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub user_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: ParticipantRole,
}

// ---------------------------------------------------------------------------
// Apply
// ---------------------------------------------------------------------------

/// POST /api/v1/challenges/{id}/apply
///
/// Apply to a challenge, solo or with a team. Individual applications are
/// accepted immediately; team applications are created pending and one
/// invitation is emailed per member.
pub async fn apply_to_challenge(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(challenge_id): Path<DbId>,
    Json(input): Json<ApplyChallengeRequest>,
) -> AppResult<(StatusCode, Json<ApplicationResponse>)> {
    // 1. The challenge must exist.
    let challenge = ChallengeRepo::find_by_id(&state.pool, challenge_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Challenge", challenge_id)))?;

    // 2. It must be open for applications.
    let status = ChallengeStatus::parse(&challenge.status)
        .map_err(|e| AppError::Core(CoreError::Internal(e)))?;
    if status != ChallengeStatus::Open {
        return Err(AppError::Core(CoreError::InvalidState(
            "Challenge is not open for applications".into(),
        )));
    }

    // 3. The applicant must not already participate, in either capacity.
    if ApplicationRepo::has_participant(&state.pool, challenge_id, user.user_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You already have an application for this challenge".into(),
        )));
    }

    // 4. Branch on challenge type.
    let challenge_type = ChallengeType::parse(&challenge.challenge_type)
        .map_err(|e| AppError::Core(CoreError::Internal(e)))?;

    let application = match challenge_type {
        ChallengeType::Individual => {
            ApplicationRepo::create_individual(&state.pool, challenge_id, user.user_id).await?
        }
        ChallengeType::Team => {
            create_team_application(&state, &challenge, user.user_id, input.team_members).await?
        }
    };

    Ok((StatusCode::CREATED, Json(application.to_response())))
}

/// Build and persist a team application, then dispatch the invitations.
async fn create_team_application(
    state: &AppState,
    challenge: &Challenge,
    applicant_id: DbId,
    emails: Option<Vec<String>>,
) -> AppResult<talentforge_db::models::application::Application> {
    let emails = emails.filter(|e| !e.is_empty()).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Team member emails are required".into(),
        ))
    })?;

    for email in &emails {
        if !email.validate_email() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "'{email}' is not a valid email address"
            ))));
        }
    }

    let team_size = challenge
        .team_size
        .ok_or_else(|| AppError::InternalError("Team challenge without a team size".into()))?;

    // a. Leader + invitees must exactly fill the team.
    validate_invitee_count(emails.len(), team_size)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    // b. Resolve all emails at once; report every miss in a single error.
    let members = UserRepo::find_verified_by_emails(&state.pool, &emails).await?;
    let found: Vec<&str> = members.iter().map(|m| m.email.as_str()).collect();
    let missing: Vec<&str> = emails
        .iter()
        .map(String::as_str)
        .filter(|e| !found.contains(e))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "The following users are not registered or verified: {}",
            missing.join(", ")
        ))));
    }

    // c. The leader cannot invite themselves.
    if members.iter().any(|m| m.id == applicant_id) {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot add yourself as a team member".into(),
        )));
    }

    // d. No invitee may already participate in this challenge.
    let member_ids: Vec<DbId> = members.iter().map(|m| m.id).collect();
    if ApplicationRepo::any_participant(&state.pool, challenge.id, &member_ids).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Some team members already belong to another application for this challenge".into(),
        )));
    }

    // e. Synthesize the pending members with fresh tokens.
    let now = Utc::now();
    let expires_at = invitation_expiry(now);
    let new_members: Vec<NewTeamMember> = members
        .iter()
        .map(|m| NewTeamMember {
            user_id: m.id,
            email: m.email.clone(),
            token: new_invitation_token(),
            token_expires_at: expires_at,
        })
        .collect();

    // f. One transaction writes the application and every member row.
    let application =
        ApplicationRepo::create_team(&state.pool, challenge.id, applicant_id, &new_members)
            .await?;

    // g. Invitations go out after the commit; a failed send is logged and
    //    does not undo the application.
    for member in &new_members {
        if let Err(err) = state
            .mailer
            .send_team_invitation(&member.email, &member.token, INVITATION_TTL_HOURS)
            .await
        {
            tracing::warn!(
                error = %err,
                email = %member.email,
                application_id = application.id,
                "Failed to send team invitation email"
            );
        }
    }

    Ok(application)
}

// ---------------------------------------------------------------------------
// Invitation response
// ---------------------------------------------------------------------------

/// POST /api/v1/team-invitations/{token}/accept
pub async fn accept_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    handle_invitation_response(&state, &token, true).await?;
    Ok(Json(serde_json::json!({
        "message": "Invitation accepted successfully"
    })))
}

/// POST /api/v1/team-invitations/{token}/reject
pub async fn reject_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    handle_invitation_response(&state, &token, false).await?;
    Ok(Json(serde_json::json!({
        "message": "Invitation rejected successfully"
    })))
}

/// Shared accept/reject flow.
///
/// Lookup and update are separate statements; the update is conditional on
/// the member still being pending with an unexpired token, so of two racing
/// responses exactly one records an outcome and the other fails here with
/// "already been responded to". Once an application is deleted by a
/// rejection, the remaining members' tokens stop matching the lookup and
/// surface as "invalid or expired".
async fn handle_invitation_response(
    state: &AppState,
    token: &str,
    accept: bool,
) -> AppResult<()> {
    // 1. Find the owning application; expired and unknown tokens are
    //    deliberately indistinguishable.
    let application = ApplicationRepo::find_by_active_token(&state.pool, token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation("Invalid or expired invitation".into()))
        })?;

    // 2. Atomically record the response; losing a race surfaces here.
    let new_status = if accept {
        TeamMemberStatus::Accepted
    } else {
        TeamMemberStatus::Rejected
    };
    let outcome = ApplicationRepo::record_member_response(&state.pool, token, new_status)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Invitation has already been responded to".into(),
            ))
        })?;

    tracing::info!(
        application_id = outcome.application_id,
        user_id = outcome.user_id,
        accept,
        "Recorded invitation response"
    );

    let (leader, challenge) =
        load_leader_and_challenge(state, application.applicant_id, application.challenge_id)
            .await?;

    if !accept {
        // 3. Rejection: best-effort notice to the leader, then destroy the
        //    application. Deletion proceeds even if the email fails.
        if let (Some(leader), Some(challenge)) = (&leader, &challenge) {
            let reason = format!("{} declined the invitation", outcome.email);
            if let Err(err) = state
                .mailer
                .send_rejection(&leader.email, &challenge.title, &reason)
                .await
            {
                tracing::warn!(error = %err, "Failed to send rejection email");
            }
        }

        ApplicationRepo::delete(&state.pool, outcome.application_id).await?;
        return Ok(());
    }

    // 4. Acceptance: recompute the aggregate status from the members as they
    //    now stand. If the team is complete, the conditional UPDATE is the
    //    race-safe gate: only the call that performs the pending -> accepted
    //    transition sends the approval email.
    let Some(current) = ApplicationRepo::find_by_id(&state.pool, outcome.application_id).await?
    else {
        // A concurrent rejection destroyed the application; this acceptance
        // is simply discarded with it.
        return Ok(());
    };
    let member_statuses: Vec<TeamMemberStatus> =
        current.members.iter().map(|m| m.state.status()).collect();
    if recompute_status(&member_statuses) != ApplicationStatus::Accepted {
        return Ok(());
    }

    let finalized =
        ApplicationRepo::finalize_if_complete(&state.pool, outcome.application_id).await?;

    if finalized {
        if let (Some(leader), Some(challenge)) = (&leader, &challenge) {
            if let Err(err) = state
                .mailer
                .send_approval(&leader.email, &challenge.title)
                .await
            {
                tracing::warn!(error = %err, "Failed to send approval email");
            }
        }
    }

    Ok(())
}

/// Resolve the leader and challenge for notification purposes. Either may be
/// gone if deleted concurrently; notifications are then skipped.
async fn load_leader_and_challenge(
    state: &AppState,
    applicant_id: DbId,
    challenge_id: DbId,
) -> AppResult<(Option<User>, Option<Challenge>)> {
    let leader = UserRepo::find_by_id(&state.pool, applicant_id).await?;
    let challenge = ChallengeRepo::find_by_id(&state.pool, challenge_id).await?;
    if leader.is_none() || challenge.is_none() {
        tracing::warn!(
            applicant_id,
            challenge_id,
            "Leader or challenge missing while handling invitation response"
        );
    }
    Ok((leader, challenge))
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

/// GET /api/v1/challenges/{id}/participants
///
/// Flatten accepted applications into one row per person (leader + members),
/// paginated over the flattened list. `total` counts people, not
/// applications.
pub async fn get_challenge_participants(
    State(state): State<AppState>,
    Path(challenge_id): Path<DbId>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Participant>>> {
    if ChallengeRepo::find_by_id(&state.pool, challenge_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::not_found(
            "Challenge",
            challenge_id,
        )));
    }

    let applications =
        ApplicationRepo::list_accepted_for_challenge(&state.pool, challenge_id).await?;

    // Resolve every involved user in one batch; the flattened rows carry
    // current directory data rather than invitation-time snapshots.
    let mut user_ids: Vec<DbId> = Vec::new();
    for application in &applications {
        user_ids.push(application.applicant_id);
        user_ids.extend(application.members.iter().map(|m| m.user_id));
    }
    let users: HashMap<DbId, User> = UserRepo::find_by_ids(&state.pool, &user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut participants: Vec<Participant> = Vec::new();
    for application in &applications {
        if let Some(leader) = users.get(&application.applicant_id) {
            participants.push(to_participant(leader, ParticipantRole::TeamLeader));
        }
        if application.app_type == ApplicationType::Team {
            for member in &application.members {
                if let Some(user) = users.get(&member.user_id) {
                    participants.push(to_participant(user, ParticipantRole::TeamMember));
                }
            }
        }
    }

    let (page, limit, offset) = pagination.resolve();
    let total = participants.len() as i64;
    let data: Vec<Participant> = participants
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    Ok(Json(Paginated::new(data, total, page, limit)))
}

fn to_participant(user: &User, role: ParticipantRole) -> Participant {
    Participant {
        user_id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        role,
    }
}
