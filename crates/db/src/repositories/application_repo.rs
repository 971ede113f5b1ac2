//! Repository for the `applications` table and its owned `team_members`.
//!
//! The application row is the unit of mutual exclusion for the invitation
//! workflow. Three operations carry the concurrency design:
//!
//! * team creation runs in a single transaction -- the application and every
//!   member row land together or not at all;
//! * a member response is one conditional UPDATE keyed by token + pending
//!   status + unexpired token, so two responses racing on the same token can
//!   never both succeed;
//! * [`ApplicationRepo::finalize_if_complete`] flips the aggregate status in
//!   one conditional UPDATE whose rows-affected tells exactly one caller it
//!   performed the transition.

use std::collections::HashMap;

use sqlx::PgPool;
use talentforge_core::application::TeamMemberStatus;
use talentforge_core::types::DbId;

use crate::models::application::{
    Application, ApplicationRow, MemberResponseOutcome, NewTeamMember, TeamMemberRow,
};

/// Column list for `applications` queries.
const COLUMNS: &str = "id, challenge_id, applicant_id, app_type, status, created_at, updated_at";

/// Column list for `team_members` queries.
const MEMBER_COLUMNS: &str = "application_id, user_id, email, status, invited_at, \
                              responded_at, token, token_expires_at";

/// Provides operations for applications and their embedded team members.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert an individual application, immediately accepted.
    pub async fn create_individual(
        pool: &PgPool,
        challenge_id: DbId,
        applicant_id: DbId,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (challenge_id, applicant_id, app_type, status)
             VALUES ($1, $2, 'individual', 'accepted')
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(challenge_id)
            .bind(applicant_id)
            .fetch_one(pool)
            .await?;
        assemble(row, Vec::new())
    }

    /// Insert a pending team application with all its members in one
    /// transaction: either every member row is recorded or none.
    pub async fn create_team(
        pool: &PgPool,
        challenge_id: DbId,
        applicant_id: DbId,
        members: &[NewTeamMember],
    ) -> Result<Application, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO applications (challenge_id, applicant_id, app_type, status)
             VALUES ($1, $2, 'team', 'pending')
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(challenge_id)
            .bind(applicant_id)
            .fetch_one(&mut *tx)
            .await?;

        let member_query = format!(
            "INSERT INTO team_members
                (application_id, challenge_id, user_id, email, status, token, token_expires_at)
             VALUES ($1, $2, $3, $4, 'pending', $5, $6)
             RETURNING {MEMBER_COLUMNS}"
        );
        let mut member_rows = Vec::with_capacity(members.len());
        for member in members {
            let member_row = sqlx::query_as::<_, TeamMemberRow>(&member_query)
                .bind(row.id)
                .bind(challenge_id)
                .bind(member.user_id)
                .bind(&member.email)
                .bind(&member.token)
                .bind(member.token_expires_at)
                .fetch_one(&mut *tx)
                .await?;
            member_rows.push(member_row);
        }

        tx.commit().await?;
        assemble(row, member_rows)
    }

    /// Find an application by ID with its members.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let members = load_members(pool, row.id).await?;
        assemble(row, members).map(Some)
    }

    /// Does the user already participate in this challenge, as applicant or
    /// as a team member of any application?
    pub async fn has_participant(
        pool: &PgPool,
        challenge_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM applications WHERE challenge_id = $1 AND applicant_id = $2
             ) OR EXISTS(
                 SELECT 1 FROM team_members WHERE challenge_id = $1 AND user_id = $2
             )",
        )
        .bind(challenge_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Does any of the users already participate in this challenge?
    pub async fn any_participant(
        pool: &PgPool,
        challenge_id: DbId,
        user_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM applications WHERE challenge_id = $1 AND applicant_id = ANY($2)
             ) OR EXISTS(
                 SELECT 1 FROM team_members WHERE challenge_id = $1 AND user_id = ANY($2)
             )",
        )
        .bind(challenge_id)
        .bind(user_ids)
        .fetch_one(pool)
        .await
    }

    /// Find the application owning a member with this exact token whose
    /// expiry is still in the future. Expired and unknown tokens are
    /// indistinguishable: both return `None`.
    pub async fn find_by_active_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE id = (
                 SELECT application_id FROM team_members
                 WHERE token = $1 AND token_expires_at > NOW()
             )"
        );
        let Some(row) = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let members = load_members(pool, row.id).await?;
        assemble(row, members).map(Some)
    }

    /// Atomically record a member's response.
    ///
    /// The UPDATE is keyed by token, pending status, and unexpired token, so
    /// at most one of two racing responses can match; the loser sees `None`.
    /// The token and expiry are cleared in the same statement, making the
    /// token single-use.
    pub async fn record_member_response(
        pool: &PgPool,
        token: &str,
        status: TeamMemberStatus,
    ) -> Result<Option<MemberResponseOutcome>, sqlx::Error> {
        sqlx::query_as::<_, MemberResponseOutcome>(
            "UPDATE team_members
             SET status = $2, responded_at = NOW(), token = NULL, token_expires_at = NULL
             WHERE token = $1 AND status = 'pending' AND token_expires_at > NOW()
             RETURNING application_id, user_id, email",
        )
        .bind(token)
        .bind(status.as_str())
        .fetch_optional(pool)
        .await
    }

    /// Flip a pending application to accepted when no non-accepted member
    /// remains. Returns `true` only for the call that performed the
    /// transition, so follow-up effects (the approval email) run exactly
    /// once even under concurrent acceptances.
    pub async fn finalize_if_complete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE applications
             SET status = 'accepted', updated_at = NOW()
             WHERE id = $1 AND status = 'pending'
               AND NOT EXISTS (
                   SELECT 1 FROM team_members
                   WHERE application_id = $1 AND status <> 'accepted'
               )",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an application; member rows cascade away with it, which voids
    /// every still-pending invitation token.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List all accepted applications for a challenge with their members,
    /// in creation order.
    pub async fn list_accepted_for_challenge(
        pool: &PgPool,
        challenge_id: DbId,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE challenge_id = $1 AND status = 'accepted'
             ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(challenge_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let member_query = format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members
             WHERE application_id = ANY($1)
             ORDER BY id ASC"
        );
        let member_rows = sqlx::query_as::<_, TeamMemberRow>(&member_query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut grouped: HashMap<DbId, Vec<TeamMemberRow>> = HashMap::new();
        for member in member_rows {
            grouped.entry(member.application_id).or_default().push(member);
        }

        rows.into_iter()
            .map(|row| {
                let members = grouped.remove(&row.id).unwrap_or_default();
                assemble(row, members)
            })
            .collect()
    }
}

/// Load the member rows of one application in stable (insertion) order.
async fn load_members(pool: &PgPool, application_id: DbId) -> Result<Vec<TeamMemberRow>, sqlx::Error> {
    let query = format!(
        "SELECT {MEMBER_COLUMNS} FROM team_members
         WHERE application_id = $1
         ORDER BY id ASC"
    );
    sqlx::query_as::<_, TeamMemberRow>(&query)
        .bind(application_id)
        .fetch_all(pool)
        .await
}

/// Assemble the typed aggregate; a row that fails to parse is reported as a
/// decode error.
fn assemble(
    row: ApplicationRow,
    member_rows: Vec<TeamMemberRow>,
) -> Result<Application, sqlx::Error> {
    Application::assemble(row, member_rows)
        .map_err(|e| sqlx::Error::Decode(e.to_string().into()))
}
