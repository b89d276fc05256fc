//! Repository for activity database operations.
//!
//! Activity visibility is the parent guide's visibility, composed through
//! the guide relation in each query.

use domain::Caller;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::{ActivityEntity, ActivityWithGuideOwner};

const ACTIVITY_COLUMNS: &str = "a.id, a.guide_id, a.title, a.description, a.category, \
     a.address, a.phone, a.opening_hours, a.website, a.day, a.\"order\"";

/// Parent-guide visibility, applied to non-admin reads.
/// $1 is the caller id, $2 the caller email.
const VISIBLE_PARENT_PREDICATE: &str = "(g.owner_id = $1 OR EXISTS (
        SELECT 1 FROM guide_invitations gi
        WHERE gi.guide_id = g.id
          AND (gi.invited_user_id = $1
               OR ($2 <> '' AND LOWER(gi.invited_email) = LOWER($2)))
    ))";

/// New activity fields; the parent guide comes from the validated payload.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub opening_hours: String,
    pub website: String,
    pub day: i32,
    pub order: i32,
}

/// Partial update; `None` fields keep their current value. The parent guide
/// is immutable once set.
#[derive(Debug, Clone, Default)]
pub struct ActivityChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_hours: Option<String>,
    pub website: Option<String>,
    pub day: Option<i32>,
    pub order: Option<i32>,
}

/// Repository for activity operations.
#[derive(Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists activities on guides visible to the caller, in canonical
    /// `(day, order, id)` order.
    pub async fn list_visible(&self, caller: &Caller) -> Result<Vec<ActivityEntity>, sqlx::Error> {
        if caller.is_admin() {
            let query = format!(
                "SELECT {ACTIVITY_COLUMNS} FROM activities a \
                 ORDER BY a.day, a.\"order\", a.id"
            );
            return sqlx::query_as::<_, ActivityEntity>(&query)
                .fetch_all(&self.pool)
                .await;
        }

        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities a \
             JOIN guides g ON g.id = a.guide_id \
             WHERE {VISIBLE_PARENT_PREDICATE} \
             ORDER BY a.day, a.\"order\", a.id"
        );
        sqlx::query_as::<_, ActivityEntity>(&query)
            .bind(caller.id)
            .bind(&caller.email)
            .fetch_all(&self.pool)
            .await
    }

    /// Lists the activities of one guide in canonical order. The caller's
    /// access to the guide must already be established.
    pub async fn list_for_guide(&self, guide_id: Uuid) -> Result<Vec<ActivityEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities a \
             WHERE a.guide_id = $1 \
             ORDER BY a.day, a.\"order\", a.id"
        );
        sqlx::query_as::<_, ActivityEntity>(&query)
            .bind(guide_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Fetches the activities of several guides in one round trip, grouped
    /// by guide and in canonical order within each group.
    pub async fn list_for_guides(
        &self,
        guide_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<ActivityEntity>>, sqlx::Error> {
        if guide_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities a \
             WHERE a.guide_id = ANY($1) \
             ORDER BY a.day, a.\"order\", a.id"
        );
        let rows = sqlx::query_as::<_, ActivityEntity>(&query)
            .bind(guide_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<ActivityEntity>> = HashMap::new();
        for row in rows {
            grouped.entry(row.guide_id).or_default().push(row);
        }
        Ok(grouped)
    }

    /// Finds an activity by id if its parent guide is visible to the caller.
    /// Carries the guide owner for the write-permission check.
    pub async fn find_visible_by_id(
        &self,
        caller: &Caller,
        activity_id: Uuid,
    ) -> Result<Option<ActivityWithGuideOwner>, sqlx::Error> {
        if caller.is_admin() {
            let query = format!(
                "SELECT {ACTIVITY_COLUMNS}, g.owner_id AS guide_owner_id \
                 FROM activities a \
                 JOIN guides g ON g.id = a.guide_id \
                 WHERE a.id = $1"
            );
            return sqlx::query_as::<_, ActivityWithGuideOwner>(&query)
                .bind(activity_id)
                .fetch_optional(&self.pool)
                .await;
        }

        let query = format!(
            "SELECT {ACTIVITY_COLUMNS}, g.owner_id AS guide_owner_id \
             FROM activities a \
             JOIN guides g ON g.id = a.guide_id \
             WHERE a.id = $3 AND {VISIBLE_PARENT_PREDICATE}"
        );
        sqlx::query_as::<_, ActivityWithGuideOwner>(&query)
            .bind(caller.id)
            .bind(&caller.email)
            .bind(activity_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Creates an activity on the given guide.
    pub async fn create(
        &self,
        guide_id: Uuid,
        activity: &NewActivity,
    ) -> Result<ActivityEntity, sqlx::Error> {
        sqlx::query_as::<_, ActivityEntity>(
            r#"
            INSERT INTO activities
                (guide_id, title, description, category, address, phone,
                 opening_hours, website, day, "order")
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, guide_id, title, description, category, address, phone,
                      opening_hours, website, day, "order"
            "#,
        )
        .bind(guide_id)
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(&activity.category)
        .bind(&activity.address)
        .bind(&activity.phone)
        .bind(&activity.opening_hours)
        .bind(&activity.website)
        .bind(activity.day)
        .bind(activity.order)
        .fetch_one(&self.pool)
        .await
    }

    /// Applies a partial update. Caller must have checked write permission.
    pub async fn update(
        &self,
        activity_id: Uuid,
        changes: &ActivityChanges,
    ) -> Result<Option<ActivityEntity>, sqlx::Error> {
        sqlx::query_as::<_, ActivityEntity>(
            r#"
            UPDATE activities SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                address = COALESCE($5, address),
                phone = COALESCE($6, phone),
                opening_hours = COALESCE($7, opening_hours),
                website = COALESCE($8, website),
                day = COALESCE($9, day),
                "order" = COALESCE($10, "order")
            WHERE id = $1
            RETURNING id, guide_id, title, description, category, address, phone,
                      opening_hours, website, day, "order"
            "#,
        )
        .bind(activity_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.category.as_deref())
        .bind(changes.address.as_deref())
        .bind(changes.phone.as_deref())
        .bind(changes.opening_hours.as_deref())
        .bind(changes.website.as_deref())
        .bind(changes.day)
        .bind(changes.order)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes an activity. Returns true if a row was deleted.
    pub async fn delete(&self, activity_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(activity_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
