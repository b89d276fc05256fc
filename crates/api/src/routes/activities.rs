//! Activity routes.
//!
//! An activity belongs to exactly one guide; reads inherit the guide's
//! visibility and writes require the guide owner or an admin.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use domain::models::activity::validate_category;
use domain::services::policy;
use persistence::entities::ActivityEntity;
use persistence::repositories::activity::{ActivityChanges, NewActivity};
use persistence::repositories::{ActivityRepository, GuideRepository};

/// Activity representation returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityResponse {
    pub id: String,
    pub guide: String,
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

impl ActivityResponse {
    pub fn from_entity(activity: &ActivityEntity) -> Self {
        Self {
            id: activity.id.to_string(),
            guide: activity.guide_id.to_string(),
            title: activity.title.clone(),
            description: activity.description.clone(),
            category: activity.category.clone(),
            address: activity.address.clone(),
            phone: activity.phone.clone(),
            opening_hours: activity.opening_hours.clone(),
            website: activity.website.clone(),
            day: activity.day,
            order: activity.order,
        }
    }
}

/// Request body for creating an activity on a guide.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateActivityRequest {
    /// Parent guide id
    pub guide: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[validate(custom(function = "validate_category"))]
    pub category: String,

    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub opening_hours: String,

    #[serde(default)]
    pub website: String,

    #[serde(default = "default_position")]
    #[validate(range(min = 1, message = "Day must be at least 1"))]
    pub day: i32,

    #[serde(default = "default_position")]
    #[validate(range(min = 1, message = "Order must be at least 1"))]
    pub order: i32,
}

fn default_position() -> i32 {
    1
}

/// Request body for updating an activity; absent fields are left unchanged.
/// The parent guide cannot be changed.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_hours: Option<String>,
    pub website: Option<String>,

    #[validate(range(min = 1, message = "Day must be at least 1"))]
    pub day: Option<i32>,

    #[validate(range(min = 1, message = "Order must be at least 1"))]
    pub order: Option<i32>,
}

/// List activities on guides visible to the caller, in canonical order.
///
/// GET /api/activities
pub async fn list_activities(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let caller = current_user.caller();

    let activities = ActivityRepository::new(state.pool.clone())
        .list_visible(&caller)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        activities.iter().map(ActivityResponse::from_entity).collect(),
    ))
}

/// Create an activity (parent guide owner or admin).
///
/// POST /api/activities
pub async fn create_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ActivityResponse>), ApiError> {
    let caller = current_user.caller();

    request.validate().map_err(ApiError::from)?;

    // An invisible parent guide is reported as absent, not forbidden
    let guide = GuideRepository::new(state.pool.clone())
        .find_visible_by_id(&caller, request.guide)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    if !policy::can_modify_guide(&caller, guide.owner_id) {
        return Err(ApiError::Forbidden(
            "Only the guide owner may add activities".to_string(),
        ));
    }

    let activity = ActivityRepository::new(state.pool.clone())
        .create(
            guide.id,
            &NewActivity {
                title: request.title,
                description: request.description,
                category: request.category,
                address: request.address,
                phone: request.phone,
                opening_hours: request.opening_hours,
                website: request.website,
                day: request.day,
                order: request.order,
            },
        )
        .await
        .map_err(ApiError::from)?;

    info!(activity_id = %activity.id, guide_id = %guide.id, "Activity created");

    Ok((
        StatusCode::CREATED,
        Json(ActivityResponse::from_entity(&activity)),
    ))
}

/// Get one activity if its parent guide is visible to the caller.
///
/// GET /api/activities/:activity_id
pub async fn get_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let caller = current_user.caller();

    let activity = ActivityRepository::new(state.pool.clone())
        .find_visible_by_id(&caller, activity_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    Ok(Json(ActivityResponse::from_entity(&activity.into_activity())))
}

/// Update an activity (parent guide owner or admin).
///
/// PUT/PATCH /api/activities/:activity_id
pub async fn update_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<UpdateActivityRequest>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let caller = current_user.caller();
    let repo = ActivityRepository::new(state.pool.clone());

    let existing = repo
        .find_visible_by_id(&caller, activity_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    if !policy::can_modify_guide(&caller, existing.guide_owner_id) {
        return Err(ApiError::Forbidden(
            "Only the guide owner may modify activities".to_string(),
        ));
    }

    request.validate().map_err(ApiError::from)?;

    let updated = repo
        .update(
            activity_id,
            &ActivityChanges {
                title: request.title,
                description: request.description,
                category: request.category,
                address: request.address,
                phone: request.phone,
                opening_hours: request.opening_hours,
                website: request.website,
                day: request.day,
                order: request.order,
            },
        )
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    info!(activity_id = %updated.id, "Activity updated");

    Ok(Json(ActivityResponse::from_entity(&updated)))
}

/// Delete an activity (parent guide owner or admin).
///
/// DELETE /api/activities/:activity_id
pub async fn delete_activity(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(activity_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = current_user.caller();
    let repo = ActivityRepository::new(state.pool.clone());

    let existing = repo
        .find_visible_by_id(&caller, activity_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Activity not found".to_string()))?;

    if !policy::can_modify_guide(&caller, existing.guide_owner_id) {
        return Err(ApiError::Forbidden(
            "Only the guide owner may delete activities".to_string(),
        ));
    }

    repo.delete(activity_id).await.map_err(ApiError::from)?;

    info!(activity_id = %activity_id, "Activity deleted");

    Ok(StatusCode::NO_CONTENT)
}
