//! Guide invitation routes, including the accept transition.
//!
//! An invitation moves from pending (`invited_user` null) to accepted
//! (bound to an account) exactly once. The email match is checked at
//! transition time only; a later email change never unbinds an acceptance.

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
use domain::services::policy;
use persistence::entities::GuideInvitationEntity;
use persistence::repositories::{GuideInvitationRepository, GuideRepository};
use shared::validation::validate_email_format;

/// Invitation representation returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationResponse {
    pub id: String,
    pub guide: String,
    pub invited_email: String,
    pub invited_user: Option<String>,
    pub created_at: String,
}

impl InvitationResponse {
    pub fn from_entity(invitation: &GuideInvitationEntity) -> Self {
        Self {
            id: invitation.id.to_string(),
            guide: invitation.guide_id.to_string(),
            invited_email: invitation.invited_email.clone(),
            invited_user: invitation.invited_user_id.map(|id| id.to_string()),
            created_at: invitation.created_at.to_rfc3339(),
        }
    }
}

/// Request body for creating an invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    /// Guide to share
    pub guide: Uuid,

    #[validate(custom(function = "validate_email_format"))]
    pub invited_email: String,
}

/// Response for a successful accept call.
#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub status: String,
}

/// List invitations visible to the caller: all for admins, otherwise those
/// addressed to the caller plus those on the caller's own guides.
///
/// GET /api/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<Vec<InvitationResponse>>, ApiError> {
    let caller = current_user.caller();

    let invitations = GuideInvitationRepository::new(state.pool.clone())
        .list_visible(&caller)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        invitations
            .iter()
            .map(InvitationResponse::from_entity)
            .collect(),
    ))
}

/// Create an invitation (guide owner or admin). A duplicate
/// `(guide, invited_email)` pair is a conflict.
///
/// POST /api/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<InvitationResponse>), ApiError> {
    let caller = current_user.caller();

    request.validate().map_err(ApiError::from)?;

    // An invisible guide is reported as absent, not forbidden
    let guide = GuideRepository::new(state.pool.clone())
        .find_visible_by_id(&caller, request.guide)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    if !policy::can_manage_invitations(&caller, guide.owner_id) {
        return Err(ApiError::Forbidden(
            "Only the guide owner may invite people".to_string(),
        ));
    }

    // The unique (guide_id, invited_email) constraint turns a duplicate
    // into a database error mapped to 409
    let invitation = GuideInvitationRepository::new(state.pool.clone())
        .create(guide.id, &request.invited_email)
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict("This email is already invited to the guide".to_string())
            }
            other => other,
        })?;

    info!(
        invitation_id = %invitation.id,
        guide_id = %guide.id,
        "Invitation created"
    );

    Ok((
        StatusCode::CREATED,
        Json(InvitationResponse::from_entity(&invitation)),
    ))
}

/// Delete an invitation (guide owner or admin).
///
/// DELETE /api/invitations/:invitation_id
pub async fn delete_invitation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invitation_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let caller = current_user.caller();
    let repo = GuideInvitationRepository::new(state.pool.clone());

    let invitation = repo
        .find_visible_by_id(&caller, invitation_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    if !policy::can_manage_invitations(&caller, invitation.guide_owner_id) {
        return Err(ApiError::Forbidden(
            "Only the guide owner may revoke invitations".to_string(),
        ));
    }

    repo.delete(invitation_id).await.map_err(ApiError::from)?;

    info!(invitation_id = %invitation_id, "Invitation deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Accept an invitation, binding it to the caller's account.
///
/// POST /api/invitations/:invitation_id/accept
///
/// The caller's registered email must match the invited email,
/// case-insensitively. Accepting an invitation already bound to the caller
/// is a no-op success; one bound to another account is a conflict.
pub async fn accept_invitation(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<AcceptResponse>, ApiError> {
    let caller = current_user.caller();
    let repo = GuideInvitationRepository::new(state.pool.clone());

    let invitation = repo
        .find_visible_by_id(&caller, invitation_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    if !policy::can_accept_invitation(&caller, &invitation.invited_email) {
        return Err(ApiError::Forbidden(
            "This invitation does not match your email".to_string(),
        ));
    }

    match invitation.invited_user_id {
        Some(user_id) if user_id == caller.id => {
            // Already bound to this account; accept is idempotent
            return Ok(Json(AcceptResponse {
                status: "accepted".to_string(),
            }));
        }
        Some(_) => {
            return Err(ApiError::Conflict(
                "Invitation already accepted by another account".to_string(),
            ));
        }
        None => {}
    }

    let transitioned = repo
        .accept(invitation_id, caller.id)
        .await
        .map_err(ApiError::from)?;

    if !transitioned {
        // Lost a race: someone accepted between our read and update
        let current = repo
            .find_visible_by_id(&caller, invitation_id)
            .await
            .map_err(ApiError::from)?;

        match current.and_then(|inv| inv.invited_user_id) {
            Some(user_id) if user_id == caller.id => {}
            _ => {
                return Err(ApiError::Conflict(
                    "Invitation already accepted by another account".to_string(),
                ));
            }
        }
    }

    info!(
        invitation_id = %invitation_id,
        user_id = %caller.id,
        "Invitation accepted"
    );

    Ok(Json(AcceptResponse {
        status: "accepted".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_create_invitation_request_valid() {
        let request = CreateInvitationRequest {
            guide: Uuid::new_v4(),
            invited_email: "friend@example.com".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_invitation_request_rejects_malformed_email() {
        for email in ["", "not-an-email", "@x.com", "a@", "a@nodot"] {
            let request = CreateInvitationRequest {
                guide: Uuid::new_v4(),
                invited_email: email.to_string(),
            };
            assert!(request.validate().is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn test_invitation_response_pending() {
        let entity = GuideInvitationEntity {
            id: Uuid::new_v4(),
            guide_id: Uuid::new_v4(),
            invited_email: "friend@example.com".to_string(),
            invited_user_id: None,
            created_at: Utc::now(),
        };

        let response = InvitationResponse::from_entity(&entity);
        assert_eq!(response.invited_email, "friend@example.com");
        assert!(response.invited_user.is_none());

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"invited_user\":null"));
    }

    #[test]
    fn test_invitation_response_accepted() {
        let user_id = Uuid::new_v4();
        let entity = GuideInvitationEntity {
            id: Uuid::new_v4(),
            guide_id: Uuid::new_v4(),
            invited_email: "friend@example.com".to_string(),
            invited_user_id: Some(user_id),
            created_at: Utc::now(),
        };

        let response = InvitationResponse::from_entity(&entity);
        assert_eq!(response.invited_user, Some(user_id.to_string()));
    }
}
