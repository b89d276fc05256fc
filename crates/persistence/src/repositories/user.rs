//! Repository for user account database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_staff, is_active, created_at, updated_at";

/// New account fields. The password arrives already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

/// Repository for user account operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists all accounts, oldest first.
    pub async fn list(&self) -> Result<Vec<UserEntity>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        sqlx::query_as::<_, UserEntity>(&query)
            .fetch_all(&self.pool)
            .await
    }

    /// Finds an account by id.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserEntity>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Finds an account by username (the login identifier).
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, UserEntity>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    /// Creates an account. A duplicate username violates the unique
    /// constraint and surfaces as a database error mapped to Conflict.
    pub async fn create(&self, user: &NewUser) -> Result<UserEntity, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, email, password_hash, is_staff)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, is_staff, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_staff)
        .fetch_one(&self.pool)
        .await
    }

    /// Applies a partial update. Caller must have checked write permission.
    pub async fn update(
        &self,
        user_id: Uuid,
        changes: &UserChanges,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                is_staff = COALESCE($5, is_staff),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, email, password_hash, is_staff, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(changes.username.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.is_staff)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes an account; owned guides cascade in the database.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
