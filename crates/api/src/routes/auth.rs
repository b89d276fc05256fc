//! Token issuance routes.
//!
//! Credentials in, token pair out. Everything else on the API authenticates
//! with the access token through the `CurrentUser` extractor.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::users::UserResponse;
use persistence::repositories::UserRepository;
use shared::password::verify_password;

/// Request body for obtaining a token pair.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserResponse,
}

/// Obtain an access/refresh token pair.
///
/// POST /api/token
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let user = repo
        .find_by_username(&request.username)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let password_ok = verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

    if !password_ok || !user.is_active {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let access = state
        .jwt
        .generate_access_token(user.id)
        .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh = state
        .jwt
        .generate_refresh_token(user.id)
        .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(TokenResponse {
        access,
        refresh,
        user: UserResponse::from_entity(&user),
    }))
}

/// Request body for refreshing an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Response carrying a fresh access token.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Exchange a refresh token for a new access token.
///
/// POST /api/token/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let claims = state
        .jwt
        .validate_refresh_token(&request.refresh)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

    // The account must still exist and be active
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await
        .map_err(ApiError::from)?
        .filter(|u| u.is_active)
        .ok_or_else(|| ApiError::Unauthorized("Account not found or disabled".to_string()))?;

    let access = state
        .jwt
        .generate_access_token(user.id)
        .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(RefreshResponse { access }))
}
