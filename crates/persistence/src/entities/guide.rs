//! Guide entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Guide row joined with the owner's username.
///
/// Every guide read goes through this shape: the owner's username is part
/// of the external representation, so the join happens in the same query.
#[derive(Debug, Clone, FromRow)]
pub struct GuideWithOwner {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub days: i32,
    pub mobility: String,
    pub season: String,
    pub audience: String,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
