//! Repository for guide database operations.

use domain::Caller;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GuideWithOwner;

const GUIDE_COLUMNS: &str = "g.id, g.title, g.description, g.days, g.mobility, g.season, \
     g.audience, g.owner_id, u.username AS owner_username, g.created_at, g.updated_at";

/// The visibility predicate as SQL, applied to non-admin reads.
///
/// $1 is the caller id, $2 the caller email (empty string when the account
/// has none; the `$2 <> ''` guard keeps an empty email from matching).
const VISIBLE_GUIDE_PREDICATE: &str = "(g.owner_id = $1 OR EXISTS (
        SELECT 1 FROM guide_invitations gi
        WHERE gi.guide_id = g.id
          AND (gi.invited_user_id = $1
               OR ($2 <> '' AND LOWER(gi.invited_email) = LOWER($2)))
    ))";

/// New guide fields, owner supplied separately by the caller context.
#[derive(Debug, Clone)]
pub struct NewGuide {
    pub title: String,
    pub description: String,
    pub days: i32,
    pub mobility: String,
    pub season: String,
    pub audience: String,
}

/// Partial update; `None` fields keep their current value. The owner is
/// immutable and deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct GuideChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub days: Option<i32>,
    pub mobility: Option<String>,
    pub season: Option<String>,
    pub audience: Option<String>,
}

/// Repository for guide operations.
#[derive(Clone)]
pub struct GuideRepository {
    pool: PgPool,
}

impl GuideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists guides visible to the caller, most recently created first.
    /// Admins get the unfiltered set.
    pub async fn list_visible(&self, caller: &Caller) -> Result<Vec<GuideWithOwner>, sqlx::Error> {
        if caller.is_admin() {
            let query = format!(
                "SELECT {GUIDE_COLUMNS} FROM guides g \
                 JOIN users u ON u.id = g.owner_id \
                 ORDER BY g.created_at DESC"
            );
            return sqlx::query_as::<_, GuideWithOwner>(&query)
                .fetch_all(&self.pool)
                .await;
        }

        let query = format!(
            "SELECT {GUIDE_COLUMNS} FROM guides g \
             JOIN users u ON u.id = g.owner_id \
             WHERE {VISIBLE_GUIDE_PREDICATE} \
             ORDER BY g.created_at DESC"
        );
        sqlx::query_as::<_, GuideWithOwner>(&query)
            .bind(caller.id)
            .bind(&caller.email)
            .fetch_all(&self.pool)
            .await
    }

    /// Finds a guide by id if it is visible to the caller.
    pub async fn find_visible_by_id(
        &self,
        caller: &Caller,
        guide_id: Uuid,
    ) -> Result<Option<GuideWithOwner>, sqlx::Error> {
        if caller.is_admin() {
            let query = format!(
                "SELECT {GUIDE_COLUMNS} FROM guides g \
                 JOIN users u ON u.id = g.owner_id \
                 WHERE g.id = $1"
            );
            return sqlx::query_as::<_, GuideWithOwner>(&query)
                .bind(guide_id)
                .fetch_optional(&self.pool)
                .await;
        }

        let query = format!(
            "SELECT {GUIDE_COLUMNS} FROM guides g \
             JOIN users u ON u.id = g.owner_id \
             WHERE g.id = $3 AND {VISIBLE_GUIDE_PREDICATE}"
        );
        sqlx::query_as::<_, GuideWithOwner>(&query)
            .bind(caller.id)
            .bind(&caller.email)
            .bind(guide_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Creates a guide owned by `owner_id`.
    pub async fn create(
        &self,
        owner_id: Uuid,
        guide: &NewGuide,
    ) -> Result<GuideWithOwner, sqlx::Error> {
        sqlx::query_as::<_, GuideWithOwner>(
            r#"
            WITH inserted AS (
                INSERT INTO guides (title, description, days, mobility, season, audience, owner_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id, title, description, days, mobility, season, audience,
                          owner_id, created_at, updated_at
            )
            SELECT g.id, g.title, g.description, g.days, g.mobility, g.season, g.audience,
                   g.owner_id, u.username AS owner_username, g.created_at, g.updated_at
            FROM inserted g
            JOIN users u ON u.id = g.owner_id
            "#,
        )
        .bind(&guide.title)
        .bind(&guide.description)
        .bind(guide.days)
        .bind(&guide.mobility)
        .bind(&guide.season)
        .bind(&guide.audience)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Applies a partial update. Caller must have checked write permission.
    pub async fn update(
        &self,
        guide_id: Uuid,
        changes: &GuideChanges,
    ) -> Result<Option<GuideWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, GuideWithOwner>(
            r#"
            WITH updated AS (
                UPDATE guides SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    days = COALESCE($4, days),
                    mobility = COALESCE($5, mobility),
                    season = COALESCE($6, season),
                    audience = COALESCE($7, audience),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING id, title, description, days, mobility, season, audience,
                          owner_id, created_at, updated_at
            )
            SELECT g.id, g.title, g.description, g.days, g.mobility, g.season, g.audience,
                   g.owner_id, u.username AS owner_username, g.created_at, g.updated_at
            FROM updated g
            JOIN users u ON u.id = g.owner_id
            "#,
        )
        .bind(guide_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.days)
        .bind(changes.mobility.as_deref())
        .bind(changes.season.as_deref())
        .bind(changes.audience.as_deref())
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes a guide; activities and invitations cascade in the database.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(&self, guide_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM guides WHERE id = $1")
            .bind(guide_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
