//! Repository for guide invitation database operations.

use domain::Caller;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{GuideInvitationEntity, InvitationWithGuideOwner};

/// Repository for guide invitation operations.
#[derive(Clone)]
pub struct GuideInvitationRepository {
    pool: PgPool,
}

impl GuideInvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists invitations visible to the caller: all of them for admins,
    /// otherwise those addressed to the caller (by account or email) plus
    /// those on the caller's own guides.
    pub async fn list_visible(
        &self,
        caller: &Caller,
    ) -> Result<Vec<GuideInvitationEntity>, sqlx::Error> {
        if caller.is_admin() {
            return sqlx::query_as::<_, GuideInvitationEntity>(
                r#"
                SELECT gi.id, gi.guide_id, gi.invited_email, gi.invited_user_id, gi.created_at
                FROM guide_invitations gi
                ORDER BY gi.created_at DESC
                "#,
            )
            .fetch_all(&self.pool)
            .await;
        }

        sqlx::query_as::<_, GuideInvitationEntity>(
            r#"
            SELECT gi.id, gi.guide_id, gi.invited_email, gi.invited_user_id, gi.created_at
            FROM guide_invitations gi
            JOIN guides g ON g.id = gi.guide_id
            WHERE gi.invited_user_id = $1
               OR ($2 <> '' AND LOWER(gi.invited_email) = LOWER($2))
               OR g.owner_id = $1
            ORDER BY gi.created_at DESC
            "#,
        )
        .bind(caller.id)
        .bind(&caller.email)
        .fetch_all(&self.pool)
        .await
    }

    /// Finds an invitation by id if it is visible to the caller. Carries the
    /// guide owner for authorization checks.
    pub async fn find_visible_by_id(
        &self,
        caller: &Caller,
        invitation_id: Uuid,
    ) -> Result<Option<InvitationWithGuideOwner>, sqlx::Error> {
        if caller.is_admin() {
            return sqlx::query_as::<_, InvitationWithGuideOwner>(
                r#"
                SELECT gi.id, gi.guide_id, gi.invited_email, gi.invited_user_id, gi.created_at,
                       g.owner_id AS guide_owner_id
                FROM guide_invitations gi
                JOIN guides g ON g.id = gi.guide_id
                WHERE gi.id = $1
                "#,
            )
            .bind(invitation_id)
            .fetch_optional(&self.pool)
            .await;
        }

        sqlx::query_as::<_, InvitationWithGuideOwner>(
            r#"
            SELECT gi.id, gi.guide_id, gi.invited_email, gi.invited_user_id, gi.created_at,
                   g.owner_id AS guide_owner_id
            FROM guide_invitations gi
            JOIN guides g ON g.id = gi.guide_id
            WHERE gi.id = $3
              AND (gi.invited_user_id = $1
                   OR ($2 <> '' AND LOWER(gi.invited_email) = LOWER($2))
                   OR g.owner_id = $1)
            "#,
        )
        .bind(caller.id)
        .bind(&caller.email)
        .bind(invitation_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Creates an invitation. A duplicate `(guide_id, invited_email)` pair
    /// violates the unique constraint and surfaces as a database error the
    /// API layer maps to Conflict.
    pub async fn create(
        &self,
        guide_id: Uuid,
        invited_email: &str,
    ) -> Result<GuideInvitationEntity, sqlx::Error> {
        sqlx::query_as::<_, GuideInvitationEntity>(
            r#"
            INSERT INTO guide_invitations (guide_id, invited_email)
            VALUES ($1, $2)
            RETURNING id, guide_id, invited_email, invited_user_id, created_at
            "#,
        )
        .bind(guide_id)
        .bind(invited_email)
        .fetch_one(&self.pool)
        .await
    }

    /// Binds a pending invitation to the accepting user atomically.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// invitation was no longer pending (already accepted, possibly by a
    /// concurrent call).
    pub async fn accept(&self, invitation_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE guide_invitations
            SET invited_user_id = $2
            WHERE id = $1 AND invited_user_id IS NULL
            "#,
        )
        .bind(invitation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes an invitation. Returns true if a row was deleted.
    pub async fn delete(&self, invitation_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM guide_invitations WHERE id = $1")
            .bind(invitation_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
