//! Application aggregate: the application row plus its owned team members.
//!
//! Team member rows never leave this module as raw rows -- they are folded
//! into [`TeamMember`] values (carrying a [`TeamMemberState`]) owned by their
//! [`Application`], so no caller can address a member outside its parent.

use serde::Serialize;
use sqlx::FromRow;
use talentforge_core::application::{
    ApplicationStatus, ApplicationType, TeamMemberState, TeamMemberStatus,
};
use talentforge_core::error::CoreError;
use talentforge_core::types::{DbId, Timestamp};

/// Raw row from the `applications` table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: DbId,
    pub challenge_id: DbId,
    pub applicant_id: DbId,
    pub app_type: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Raw row from the `team_members` table. Internal to the repository layer.
#[derive(Debug, Clone, FromRow)]
pub struct TeamMemberRow {
    pub application_id: DbId,
    pub user_id: DbId,
    pub email: String,
    pub status: String,
    pub invited_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub token: Option<String>,
    pub token_expires_at: Option<Timestamp>,
}

impl TeamMemberRow {
    /// Fold the nullable columns into the typed member value.
    fn into_member(self) -> Result<TeamMember, CoreError> {
        let status = TeamMemberStatus::parse(&self.status).map_err(CoreError::Internal)?;
        let state = TeamMemberState::from_columns(
            status,
            self.token,
            self.token_expires_at,
            self.responded_at,
        )
        .map_err(CoreError::Internal)?;
        Ok(TeamMember {
            user_id: self.user_id,
            email: self.email,
            invited_at: self.invited_at,
            state,
        })
    }
}

/// One invited team member, owned by its application.
#[derive(Debug, Clone)]
pub struct TeamMember {
    pub user_id: DbId,
    pub email: String,
    pub invited_at: Timestamp,
    pub state: TeamMemberState,
}

/// The application aggregate with typed status fields and owned members.
#[derive(Debug, Clone)]
pub struct Application {
    pub id: DbId,
    pub challenge_id: DbId,
    pub applicant_id: DbId,
    pub app_type: ApplicationType,
    pub status: ApplicationStatus,
    pub members: Vec<TeamMember>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Application {
    /// Assemble the aggregate from its rows, parsing the persisted strings
    /// into core enums. A parse failure means a corrupt row and surfaces as
    /// [`CoreError::Internal`].
    pub fn assemble(
        row: ApplicationRow,
        member_rows: Vec<TeamMemberRow>,
    ) -> Result<Self, CoreError> {
        let app_type = ApplicationType::parse(&row.app_type).map_err(CoreError::Internal)?;
        let status = ApplicationStatus::parse(&row.status).map_err(CoreError::Internal)?;
        let members = member_rows
            .into_iter()
            .map(TeamMemberRow::into_member)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Application {
            id: row.id,
            challenge_id: row.challenge_id,
            applicant_id: row.applicant_id,
            app_type,
            status,
            members,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    pub fn to_response(&self) -> ApplicationResponse {
        ApplicationResponse {
            id: self.id,
            challenge_id: self.challenge_id,
            applicant_id: self.applicant_id,
            app_type: self.app_type,
            status: self.status,
            team_members: self
                .members
                .iter()
                .map(|m| TeamMemberResponse {
                    email: m.email.clone(),
                    status: m.state.status(),
                    invited_at: m.invited_at,
                    responded_at: match m.state {
                        TeamMemberState::Accepted { responded_at }
                        | TeamMemberState::Rejected { responded_at } => Some(responded_at),
                        TeamMemberState::Pending { .. } => None,
                    },
                })
                .collect(),
            created_at: self.created_at,
        }
    }
}

/// Application representation for API responses. Invitation tokens are
/// credential material and are never serialized.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    pub id: DbId,
    pub challenge_id: DbId,
    pub applicant_id: DbId,
    #[serde(rename = "type")]
    pub app_type: ApplicationType,
    pub status: ApplicationStatus,
    pub team_members: Vec<TeamMemberResponse>,
    pub created_at: Timestamp,
}

/// Team member view inside [`ApplicationResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct TeamMemberResponse {
    pub email: String,
    pub status: TeamMemberStatus,
    pub invited_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

/// Insertion DTO for one invited member of a new team application.
#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub user_id: DbId,
    pub email: String,
    pub token: String,
    pub token_expires_at: Timestamp,
}

/// Outcome of the atomic member-response update: identifies the application
/// the member belonged to and the responder's email.
#[derive(Debug, Clone, FromRow)]
pub struct MemberResponseOutcome {
    pub application_id: DbId,
    pub user_id: DbId,
    pub email: String,
}
