//! The application/team-member state machine.
//!
//! An application is one applicant's (or team's) bid for one challenge.
//! Individual applications are accepted the moment they are created. Team
//! applications start pending with one invited member per teammate; each
//! member independently accepts or rejects through a single-use, time-limited
//! token. The application becomes accepted only once every member has
//! accepted; any rejection destroys it.
//!
//! Everything here is pure: persistence and notification are orchestrated by
//! the callers in the db and api crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Timestamp;

/// Hours an invitation token stays valid after being issued.
pub const INVITATION_TTL_HOURS: i64 = 48;

/// Whether an application was made solo or on behalf of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationType {
    Individual,
    Team,
}

impl ApplicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationType::Individual => "individual",
            ApplicationType::Team => "team",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "individual" => Ok(ApplicationType::Individual),
            "team" => Ok(ApplicationType::Team),
            other => Err(format!("Invalid application type '{other}'")),
        }
    }
}

/// Aggregate status of an application.
///
/// There is no rejected status: a member rejection deletes the application
/// outright, so only pending and accepted are ever persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            other => Err(format!("Invalid application status '{other}'")),
        }
    }
}

/// Response status of one invited team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamMemberStatus {
    Pending,
    Accepted,
    Rejected,
}

impl TeamMemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamMemberStatus::Pending => "pending",
            TeamMemberStatus::Accepted => "accepted",
            TeamMemberStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "pending" => Ok(TeamMemberStatus::Pending),
            "accepted" => Ok(TeamMemberStatus::Accepted),
            "rejected" => Ok(TeamMemberStatus::Rejected),
            other => Err(format!("Invalid team member status '{other}'")),
        }
    }
}

/// Lifecycle state of a team member, with the data each state carries.
///
/// A live token exists only while the member is pending; a response
/// timestamp exists only once the member has answered. Modeling the pair as
/// a tagged enum keeps states like "accepted but still holding a token"
/// unrepresentable above the row layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TeamMemberState {
    Pending {
        token: String,
        expires_at: Timestamp,
    },
    Accepted {
        responded_at: Timestamp,
    },
    Rejected {
        responded_at: Timestamp,
    },
}

impl TeamMemberState {
    pub fn status(&self) -> TeamMemberStatus {
        match self {
            TeamMemberState::Pending { .. } => TeamMemberStatus::Pending,
            TeamMemberState::Accepted { .. } => TeamMemberStatus::Accepted,
            TeamMemberState::Rejected { .. } => TeamMemberStatus::Rejected,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TeamMemberState::Pending { .. })
    }

    /// Reassemble a state from its persisted columns.
    ///
    /// Fails when the columns violate the state invariant (pending without a
    /// token, responded without a timestamp), which indicates a corrupt row.
    pub fn from_columns(
        status: TeamMemberStatus,
        token: Option<String>,
        token_expires_at: Option<Timestamp>,
        responded_at: Option<Timestamp>,
    ) -> Result<Self, String> {
        match (status, token, token_expires_at, responded_at) {
            (TeamMemberStatus::Pending, Some(token), Some(expires_at), None) => {
                Ok(TeamMemberState::Pending { token, expires_at })
            }
            (TeamMemberStatus::Accepted, None, None, Some(responded_at)) => {
                Ok(TeamMemberState::Accepted { responded_at })
            }
            (TeamMemberStatus::Rejected, None, None, Some(responded_at)) => {
                Ok(TeamMemberState::Rejected { responded_at })
            }
            (status, _, _, _) => Err(format!(
                "Team member columns inconsistent with status '{}'",
                status.as_str()
            )),
        }
    }
}

/// Generate a fresh opaque invitation token.
pub fn new_invitation_token() -> String {
    Uuid::new_v4().to_string()
}

/// Absolute expiry for an invitation issued at `now`.
pub fn invitation_expiry(now: Timestamp) -> Timestamp {
    now + chrono::Duration::hours(INVITATION_TTL_HOURS)
}

/// Validate the invitee count against the challenge's required team size
/// (the leader counts toward the size).
pub fn validate_invitee_count(invitee_count: usize, team_size: i32) -> Result<(), String> {
    if invitee_count + 1 != team_size as usize {
        return Err(format!("Team size must be exactly {team_size} members"));
    }
    Ok(())
}

/// Recompute the aggregate application status from its member statuses:
/// accepted iff every member has accepted, pending otherwise.
///
/// Callers own the side effects (persisting the transition, notifying the
/// leader). Rejections never reach this function — a rejection deletes the
/// application before any recomputation.
pub fn recompute_status(members: &[TeamMemberStatus]) -> ApplicationStatus {
    if members.iter().all(|s| *s == TeamMemberStatus::Accepted) {
        ApplicationStatus::Accepted
    } else {
        ApplicationStatus::Pending
    }
}
