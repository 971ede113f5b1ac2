//! Repository for the `challenges` table.

use sqlx::PgPool;
use talentforge_core::types::DbId;

use crate::models::challenge::{
    Challenge, ChallengeFilter, ChallengeWithCategory, CreateChallenge, UpdateChallenge,
};

/// Column list for bare `challenges` queries.
const COLUMNS: &str = "id, slug, title, description, contact_email, tasks, prizes, \
    skills_needed, juniority_level, start_date, end_date, status, challenge_type, \
    team_size, category_id, created_at, updated_at";

/// Column list for queries joining the owning category (aliased `c` / `cat`).
const JOINED_COLUMNS: &str = "c.id, c.slug, c.title, c.description, c.contact_email, \
    c.tasks, c.prizes, c.skills_needed, c.juniority_level, c.start_date, c.end_date, \
    c.status, c.challenge_type, c.team_size, c.created_at, c.updated_at, \
    cat.id AS category_id, cat.name AS category_name, cat.slug AS category_slug";

/// Sort fields accepted by the listing query. Anything else falls back to
/// `created_at` so user input never reaches the ORDER BY clause verbatim.
const SORT_FIELDS: &[&str] = &["created_at", "title", "start_date", "end_date"];

/// Provides CRUD and listing operations for challenges.
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Insert a new challenge, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateChallenge) -> Result<Challenge, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenges
                (slug, title, description, contact_email, tasks, prizes, skills_needed,
                 juniority_level, start_date, end_date, challenge_type, team_size, category_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(&input.slug)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.contact_email)
            .bind(&input.tasks)
            .bind(&input.prizes)
            .bind(&input.skills_needed)
            .bind(&input.juniority_level)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.challenge_type)
            .bind(input.team_size)
            .bind(input.category_id)
            .fetch_one(pool)
            .await
    }

    /// Find a challenge by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenges WHERE id = $1");
        sqlx::query_as::<_, Challenge>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a challenge by ID with its category joined.
    pub async fn find_with_category(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChallengeWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM challenges c
             JOIN categories cat ON cat.id = c.category_id
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, ChallengeWithCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a challenge by slug with its category joined.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<ChallengeWithCategory>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM challenges c
             JOIN categories cat ON cat.id = c.category_id
             WHERE c.slug = $1"
        );
        sqlx::query_as::<_, ChallengeWithCategory>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List challenges matching the filter, with categories joined.
    ///
    /// `search` matches the title case-insensitively as a substring.
    pub async fn list(
        pool: &PgPool,
        filter: &ChallengeFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ChallengeWithCategory>, sqlx::Error> {
        let sort_field = filter
            .sort_field
            .as_deref()
            .filter(|f| SORT_FIELDS.contains(f))
            .unwrap_or("created_at");
        let direction = if filter.sort_desc { "DESC" } else { "ASC" };

        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM challenges c
             JOIN categories cat ON cat.id = c.category_id
             WHERE ($1::text IS NULL OR c.status = $1)
               AND ($2::text IS NULL OR c.title ILIKE '%' || $2 || '%')
             ORDER BY c.{sort_field} {direction}
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ChallengeWithCategory>(&query)
            .bind(&filter.status)
            .bind(&filter.search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count challenges matching the filter.
    pub async fn count(pool: &PgPool, filter: &ChallengeFilter) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM challenges
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')",
        )
        .bind(&filter.status)
        .bind(&filter.search)
        .fetch_one(pool)
        .await
    }

    /// Update a challenge. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChallenge,
    ) -> Result<Option<Challenge>, sqlx::Error> {
        let query = format!(
            "UPDATE challenges SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                contact_email = COALESCE($4, contact_email),
                tasks = COALESCE($5, tasks),
                prizes = COALESCE($6, prizes),
                skills_needed = COALESCE($7, skills_needed),
                juniority_level = COALESCE($8, juniority_level),
                start_date = COALESCE($9, start_date),
                end_date = COALESCE($10, end_date),
                status = COALESCE($11, status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Challenge>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.contact_email)
            .bind(&input.tasks)
            .bind(&input.prizes)
            .bind(&input.skills_needed)
            .bind(&input.juniority_level)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a challenge. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM challenges WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
