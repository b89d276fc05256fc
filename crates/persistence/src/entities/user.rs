//! User account entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::{Caller, Role};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    /// Derived role, never stored.
    pub fn role(&self) -> Role {
        Role::from_is_staff(self.is_staff)
    }

    /// Projection used by visibility and policy checks.
    pub fn caller(&self) -> Caller {
        Caller::new(self.id, self.email.clone(), self.is_staff)
    }
}
