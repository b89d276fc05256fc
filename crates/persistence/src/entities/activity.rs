//! Activity entity (database row mapping).

use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the activities table.
///
/// Canonical ordering is `(day, order, id)`; every list query returns rows
/// in that order so the day-grouped presentation can rely on it.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntity {
    pub id: Uuid,
    pub guide_id: Uuid,
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

/// Activity row joined with the parent guide's owner, used for write
/// authorization without a second round trip.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityWithGuideOwner {
    pub id: Uuid,
    pub guide_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub opening_hours: String,
    pub website: String,
    pub day: i32,
    pub order: i32,
    pub guide_owner_id: Uuid,
}

impl ActivityWithGuideOwner {
    pub fn into_activity(self) -> ActivityEntity {
        ActivityEntity {
            id: self.id,
            guide_id: self.guide_id,
            title: self.title,
            description: self.description,
            category: self.category,
            address: self.address,
            phone: self.phone,
            opening_hours: self.opening_hours,
            website: self.website,
            day: self.day,
            order: self.order,
        }
    }
}
