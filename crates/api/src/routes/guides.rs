//! Guide routes and the guide presentation mapper.
//!
//! A guide is rendered with its owner's username, its activities in
//! canonical `(day, order, id)` order, and a day-grouped view recomputed
//! from the same rows on every read.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::routes::activities::ActivityResponse;
use domain::models::guide::{validate_audience, validate_mobility, validate_season};
use domain::services::policy;
use persistence::entities::{ActivityEntity, GuideWithOwner};
use persistence::repositories::guide::{GuideChanges, NewGuide};
use persistence::repositories::{ActivityRepository, GuideRepository};

/// Guide representation returned by the API.
#[derive(Debug, Serialize)]
pub struct GuideResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub days: i32,
    pub mobility: String,
    pub season: String,
    pub audience: String,
    pub owner: String,
    pub owner_username: String,
    pub created_at: String,
    pub updated_at: String,
    pub activities: Vec<ActivityResponse>,
    pub activities_by_day: BTreeMap<i32, Vec<ActivityResponse>>,
}

impl GuideResponse {
    /// Builds the external representation from a guide row and its
    /// activities, which must already be in canonical order.
    pub fn from_parts(guide: &GuideWithOwner, activities: &[ActivityEntity]) -> Self {
        let activities: Vec<ActivityResponse> =
            activities.iter().map(ActivityResponse::from_entity).collect();

        Self {
            id: guide.id.to_string(),
            title: guide.title.clone(),
            description: guide.description.clone(),
            days: guide.days,
            mobility: guide.mobility.clone(),
            season: guide.season.clone(),
            audience: guide.audience.clone(),
            owner: guide.owner_id.to_string(),
            owner_username: guide.owner_username.clone(),
            created_at: guide.created_at.to_rfc3339(),
            updated_at: guide.updated_at.to_rfc3339(),
            activities_by_day: group_by_day(&activities),
            activities,
        }
    }
}

/// Groups activities by day, preserving their incoming order within each
/// day. Input in canonical `(day, order, id)` order yields per-day lists
/// ordered by `order`.
pub fn group_by_day(activities: &[ActivityResponse]) -> BTreeMap<i32, Vec<ActivityResponse>> {
    let mut grouped: BTreeMap<i32, Vec<ActivityResponse>> = BTreeMap::new();
    for activity in activities {
        grouped.entry(activity.day).or_default().push(activity.clone());
    }
    grouped
}

/// Request body for creating a guide. The owner always comes from the
/// access token, never from the payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateGuideRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_days")]
    #[validate(range(min = 1, message = "Days must be at least 1"))]
    pub days: i32,

    #[validate(custom(function = "validate_mobility"))]
    pub mobility: String,

    #[validate(custom(function = "validate_season"))]
    pub season: String,

    #[validate(custom(function = "validate_audience"))]
    pub audience: String,
}

fn default_days() -> i32 {
    1
}

/// Request body for updating a guide; absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateGuideRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "Days must be at least 1"))]
    pub days: Option<i32>,

    #[validate(custom(function = "validate_mobility"))]
    pub mobility: Option<String>,

    #[validate(custom(function = "validate_season"))]
    pub season: Option<String>,

    #[validate(custom(function = "validate_audience"))]
    pub audience: Option<String>,
}

/// List guides visible to the caller, most recently created first.
///
/// GET /api/guides
pub async fn list_guides(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<GuideResponse>>, ApiError> {
    let caller = current_user.caller();

    let guides = GuideRepository::new(state.pool.clone())
        .list_visible(&caller)
        .await
        .map_err(ApiError::from)?;

    let guide_ids: Vec<Uuid> = guides.iter().map(|g| g.id).collect();
    let mut activities_by_guide = ActivityRepository::new(state.pool.clone())
        .list_for_guides(&guide_ids)
        .await
        .map_err(ApiError::from)?;

    let responses = guides
        .iter()
        .map(|guide| {
            let activities = activities_by_guide.remove(&guide.id).unwrap_or_default();
            GuideResponse::from_parts(guide, &activities)
        })
        .collect();

    Ok(Json(responses))
}

/// Create a guide owned by the caller.
///
/// POST /api/guides
pub async fn create_guide(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateGuideRequest>,
) -> Result<(StatusCode, Json<GuideResponse>), ApiError> {
    request.validate().map_err(ApiError::from)?;

    let guide = GuideRepository::new(state.pool.clone())
        .create(
            current_user.0.id,
            &NewGuide {
                title: request.title,
                description: request.description,
                days: request.days,
                mobility: request.mobility,
                season: request.season,
                audience: request.audience,
            },
        )
        .await
        .map_err(ApiError::from)?;

    info!(guide_id = %guide.id, owner_id = %guide.owner_id, "Guide created");

    Ok((
        StatusCode::CREATED,
        Json(GuideResponse::from_parts(&guide, &[])),
    ))
}

/// Get one guide if it is visible to the caller.
///
/// GET /api/guides/:guide_id
pub async fn get_guide(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(guide_id): Path<Uuid>,
) -> Result<Json<GuideResponse>, ApiError> {
    let caller = current_user.caller();

    let guide = GuideRepository::new(state.pool.clone())
        .find_visible_by_id(&caller, guide_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    let activities = ActivityRepository::new(state.pool.clone())
        .list_for_guide(guide.id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(GuideResponse::from_parts(&guide, &activities)))
}

/// Update a guide (owner or admin).
///
/// PUT/PATCH /api/guides/:guide_id
pub async fn update_guide(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(guide_id): Path<Uuid>,
    Json(request): Json<UpdateGuideRequest>,
) -> Result<Json<GuideResponse>, ApiError> {
    let caller = current_user.caller();
    let repo = GuideRepository::new(state.pool.clone());

    // Invisible guides are reported as absent, not forbidden
    let guide = repo
        .find_visible_by_id(&caller, guide_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    if !policy::can_modify_guide(&caller, guide.owner_id) {
        return Err(ApiError::Forbidden(
            "Only the guide owner may modify it".to_string(),
        ));
    }

    request.validate().map_err(ApiError::from)?;

    let updated = repo
        .update(
            guide_id,
            &GuideChanges {
                title: request.title,
                description: request.description,
                days: request.days,
                mobility: request.mobility,
                season: request.season,
                audience: request.audience,
            },
        )
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    let activities = ActivityRepository::new(state.pool.clone())
        .list_for_guide(updated.id)
        .await
        .map_err(ApiError::from)?;

    info!(guide_id = %updated.id, "Guide updated");

    Ok(Json(GuideResponse::from_parts(&updated, &activities)))
}

/// Delete a guide (owner or admin); activities and invitations cascade.
///
/// DELETE /api/guides/:guide_id
pub async fn delete_guide(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(guide_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = current_user.caller();
    let repo = GuideRepository::new(state.pool.clone());

    let guide = repo
        .find_visible_by_id(&caller, guide_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    if !policy::can_modify_guide(&caller, guide.owner_id) {
        return Err(ApiError::Forbidden(
            "Only the guide owner may delete it".to_string(),
        ));
    }

    repo.delete(guide_id).await.map_err(ApiError::from)?;

    info!(guide_id = %guide_id, "Guide deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// List one guide's activities in canonical order.
///
/// GET /api/guides/:guide_id/activities
pub async fn guide_activities(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(guide_id): Path<Uuid>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let caller = current_user.caller();

    let guide = GuideRepository::new(state.pool.clone())
        .find_visible_by_id(&caller, guide_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    let activities = ActivityRepository::new(state.pool.clone())
        .list_for_guide(guide.id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        activities.iter().map(ActivityResponse::from_entity).collect(),
    ))
}
