//! Authenticated-user extractor.
//!
//! Validates the Bearer access token and loads the caller's account row, so
//! handlers get the email and staff flag every authorization decision needs.
//! Unknown or deactivated accounts are rejected as unauthorized even when
//! their token is otherwise valid.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::Caller;
use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;

/// The authenticated caller, loaded from the database per request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserEntity);

impl CurrentUser {
    /// Projection consumed by visibility and policy checks.
    pub fn caller(&self) -> Caller {
        self.0.caller()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state
            .jwt
            .validate_access_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        let user = UserRepository::new(state.pool.clone())
            .find_by_id(user_id)
            .await
            .map_err(ApiError::from)?
            .filter(|u| u.is_active)
            .ok_or_else(|| ApiError::Unauthorized("Account not found or disabled".to_string()))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user_entity(is_staff: bool) -> UserEntity {
        UserEntity {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            is_staff,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_caller_projection() {
        let current = CurrentUser(user_entity(true));
        let caller = current.caller();
        assert_eq!(caller.id, current.0.id);
        assert!(caller.is_staff);
    }

    #[test]
    fn test_current_user_clone_and_debug() {
        let current = CurrentUser(user_entity(false));
        let cloned = current.clone();
        assert_eq!(cloned.0.id, current.0.id);
        assert!(format!("{:?}", current).contains("CurrentUser"));
    }
}
