//! Challenge entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use talentforge_core::types::{DbId, Timestamp};

/// Full challenge row from the `challenges` table.
///
/// `prizes` is a JSONB array of `{place, min_value, max_value}` objects;
/// `challenge_type` and `status` hold the lowercase forms of the core enums.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Challenge {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub contact_email: String,
    pub tasks: Option<String>,
    pub prizes: serde_json::Value,
    pub skills_needed: Vec<String>,
    pub juniority_level: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: String,
    pub challenge_type: String,
    pub team_size: Option<i32>,
    pub category_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Challenge row joined with its category identity, as returned by list and
/// detail queries.
#[derive(Debug, Clone, FromRow)]
pub struct ChallengeWithCategory {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub contact_email: String,
    pub tasks: Option<String>,
    pub prizes: serde_json::Value,
    pub skills_needed: Vec<String>,
    pub juniority_level: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: String,
    pub challenge_type: String,
    pub team_size: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub category_id: DbId,
    pub category_name: String,
    pub category_slug: String,
}

impl ChallengeWithCategory {
    pub fn to_response(&self) -> ChallengeResponse {
        ChallengeResponse {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            contact_email: self.contact_email.clone(),
            tasks: self.tasks.clone(),
            prizes: self.prizes.clone(),
            skills_needed: self.skills_needed.clone(),
            juniority_level: self.juniority_level.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status.clone(),
            challenge_type: self.challenge_type.clone(),
            team_size: self.team_size,
            category: CategoryRef {
                id: self.category_id,
                name: self.category_name.clone(),
                slug: self.category_slug.clone(),
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Embedded category identity inside challenge responses.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Challenge representation for API responses, with the category embedded.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeResponse {
    pub id: DbId,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub contact_email: String,
    pub tasks: Option<String>,
    pub prizes: serde_json::Value,
    pub skills_needed: Vec<String>,
    pub juniority_level: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub status: String,
    pub challenge_type: String,
    pub team_size: Option<i32>,
    pub category: CategoryRef,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new challenge. The slug is derived from the title.
#[derive(Debug)]
pub struct CreateChallenge {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub contact_email: String,
    pub tasks: Option<String>,
    pub prizes: serde_json::Value,
    pub skills_needed: Vec<String>,
    pub juniority_level: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub challenge_type: String,
    pub team_size: Option<i32>,
    pub category_id: DbId,
}

/// DTO for updating a challenge. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateChallenge {
    pub title: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub tasks: Option<String>,
    pub prizes: Option<serde_json::Value>,
    pub skills_needed: Option<Vec<String>>,
    pub juniority_level: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub status: Option<String>,
}

/// Filters for the paginated challenge listing.
#[derive(Debug, Default)]
pub struct ChallengeFilter {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_desc: bool,
}
