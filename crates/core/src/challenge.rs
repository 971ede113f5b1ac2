//! Challenge status/type enums and team-size rules.
//!
//! Statuses and types are persisted as lowercase text; the enums here are the
//! single source of the accepted values.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a challenge. Applications are only accepted while
/// the challenge is [`ChallengeStatus::Open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Open,
    Ongoing,
    Completed,
    Archived,
}

impl ChallengeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Open => "open",
            ChallengeStatus::Ongoing => "ongoing",
            ChallengeStatus::Completed => "completed",
            ChallengeStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "open" => Ok(ChallengeStatus::Open),
            "ongoing" => Ok(ChallengeStatus::Ongoing),
            "completed" => Ok(ChallengeStatus::Completed),
            "archived" => Ok(ChallengeStatus::Archived),
            other => Err(format!("Invalid challenge status '{other}'")),
        }
    }
}

/// Whether a challenge is entered solo or by a fixed-size team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeType {
    Individual,
    Team,
}

impl ChallengeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeType::Individual => "individual",
            ChallengeType::Team => "team",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "individual" => Ok(ChallengeType::Individual),
            "team" => Ok(ChallengeType::Team),
            other => Err(format!("Invalid challenge type '{other}'")),
        }
    }
}

/// Smallest team a team challenge may require (leader included).
pub const MIN_TEAM_SIZE: i32 = 2;

/// Validate the `team_size` field against the challenge type: required and
/// at least [`MIN_TEAM_SIZE`] for team challenges, absent for individual ones.
pub fn validate_team_size(
    challenge_type: ChallengeType,
    team_size: Option<i32>,
) -> Result<(), String> {
    match (challenge_type, team_size) {
        (ChallengeType::Team, None) => Err("Team challenges require a team size".to_string()),
        (ChallengeType::Team, Some(size)) if size < MIN_TEAM_SIZE => Err(format!(
            "Team size must be at least {MIN_TEAM_SIZE} members"
        )),
        (ChallengeType::Individual, Some(_)) => {
            Err("Individual challenges do not take a team size".to_string())
        }
        _ => Ok(()),
    }
}
