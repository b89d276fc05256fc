//! User account routes: the caller's own profile plus admin-gated account
//! management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use domain::services::policy;
use domain::Role;
use persistence::entities::UserEntity;
use persistence::repositories::user::{NewUser, UserChanges};
use persistence::repositories::UserRepository;
use shared::password::hash_password;
use shared::validation::{validate_email_format, validate_password_strength, validate_username};

/// User representation returned by the API.
///
/// `role` is always derived from `is_staff`; the password hash never leaves
/// the persistence layer.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_staff: bool,
    pub is_active: bool,
}

impl UserResponse {
    pub fn from_entity(user: &UserEntity) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role(),
            is_staff: user.is_staff,
            is_active: user.is_active,
        }
    }
}

/// Get the authenticated caller's profile.
///
/// GET /api/me
pub async fn me(current_user: CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_entity(&current_user.0))
}

/// An empty email is allowed (account without email); anything else must
/// look like an email address.
fn validate_email_or_empty(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }
    validate_email_format(email)
}

fn validate_password_field(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password)
}

fn validate_username_field(username: &str) -> Result<(), ValidationError> {
    validate_username(username)
}

/// Request body for creating an account (admin only).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_username_field"))]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = "validate_email_or_empty"))]
    pub email: String,

    #[validate(custom(function = "validate_password_field"))]
    pub password: String,

    #[serde(default)]
    pub is_staff: bool,
}

/// Request body for updating an account.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_username_field"))]
    pub username: Option<String>,

    #[validate(custom(function = "validate_email_or_empty"))]
    pub email: Option<String>,

    #[validate(custom(function = "validate_password_field"))]
    pub password: Option<String>,

    pub is_staff: Option<bool>,
    pub is_active: Option<bool>,
}

/// List all accounts (admin only).
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    if !policy::can_administer_users(&current_user.caller()) {
        return Err(ApiError::Forbidden(
            "Only administrators may list accounts".to_string(),
        ));
    }

    let users = UserRepository::new(state.pool.clone())
        .list()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(users.iter().map(UserResponse::from_entity).collect()))
}

/// Create an account (admin only).
///
/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if !policy::can_administer_users(&current_user.caller()) {
        return Err(ApiError::Forbidden(
            "Only administrators may create accounts".to_string(),
        ));
    }

    request.validate().map_err(ApiError::from)?;

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    let user = UserRepository::new(state.pool.clone())
        .create(&NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            is_staff: request.is_staff,
        })
        .await
        .map_err(ApiError::from)?;

    info!(user_id = %user.id, username = %user.username, "Account created");

    Ok((StatusCode::CREATED, Json(UserResponse::from_entity(&user))))
}

/// Get one account: the caller's own, or any account for admins.
///
/// GET /api/users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    // A non-admin cannot see other accounts; report them as absent
    if !policy::can_read_user(&current_user.caller(), user_id) {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let user = UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from_entity(&user)))
}

/// Update an account. Non-admins may update themselves but never the staff
/// flag; admins may update anyone, including role changes.
///
/// PUT/PATCH /api/users/:user_id
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let caller = current_user.caller();

    if !policy::can_read_user(&caller, user_id) {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    request.validate().map_err(ApiError::from)?;

    let repo = UserRepository::new(state.pool.clone());

    let target = repo
        .find_by_id(user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let changes_staff_flag = request
        .is_staff
        .map(|requested| requested != target.is_staff)
        .unwrap_or(false);

    if !policy::can_update_user(&caller, user_id, changes_staff_flag) {
        return Err(ApiError::Forbidden(
            "You may not change your own role".to_string(),
        ));
    }

    let password_hash = match &request.password {
        Some(password) => Some(
            hash_password(password)
                .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?,
        ),
        None => None,
    };

    let updated = repo
        .update(
            user_id,
            &UserChanges {
                username: request.username,
                email: request.email,
                password_hash,
                is_staff: request.is_staff,
                is_active: request.is_active,
            },
        )
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = %updated.id, "Account updated");

    Ok(Json(UserResponse::from_entity(&updated)))
}

/// Delete an account (admin only).
///
/// DELETE /api/users/:user_id
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = current_user.caller();

    if !policy::can_administer_users(&caller) {
        // The caller can see their own record, so refusing self-deletion is
        // a plain Forbidden; other accounts are reported as absent
        return if caller.id == user_id {
            Err(ApiError::Forbidden(
                "Only administrators may delete accounts".to_string(),
            ))
        } else {
            Err(ApiError::NotFound("User not found".to_string()))
        };
    }

    let deleted = UserRepository::new(state.pool.clone())
        .delete(user_id)
        .await
        .map_err(ApiError::from)?;

    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(user_id = %user_id, "Account deleted");

    Ok(StatusCode::NO_CONTENT)
}
