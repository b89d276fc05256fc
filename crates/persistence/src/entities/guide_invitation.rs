//! Guide invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the guide_invitations table.
///
/// `invited_user_id` is null while pending and set exactly once on accept.
#[derive(Debug, Clone, FromRow)]
pub struct GuideInvitationEntity {
    pub id: Uuid,
    pub guide_id: Uuid,
    pub invited_email: String,
    pub invited_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl GuideInvitationEntity {
    /// Check if this invitation is still pending.
    pub fn is_pending(&self) -> bool {
        self.invited_user_id.is_none()
    }

    /// Check if this invitation has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.invited_user_id.is_some()
    }

    /// Check if this invitation addresses the given email.
    pub fn matches_email(&self, email: &str) -> bool {
        !email.is_empty() && self.invited_email.eq_ignore_ascii_case(email)
    }
}

/// Invitation row joined with the parent guide's owner, used for
/// authorization without a second round trip.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationWithGuideOwner {
    pub id: Uuid,
    pub guide_id: Uuid,
    pub invited_email: String,
    pub invited_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub guide_owner_id: Uuid,
}

impl InvitationWithGuideOwner {
    pub fn into_invitation(self) -> GuideInvitationEntity {
        GuideInvitationEntity {
            id: self.id,
            guide_id: self.guide_id,
            invited_email: self.invited_email,
            invited_user_id: self.invited_user_id,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invitation(invited_user_id: Option<Uuid>) -> GuideInvitationEntity {
        GuideInvitationEntity {
            id: Uuid::new_v4(),
            guide_id: Uuid::new_v4(),
            invited_email: "invitee@example.com".to_string(),
            invited_user_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_and_accepted() {
        let pending = invitation(None);
        assert!(pending.is_pending());
        assert!(!pending.is_accepted());

        let accepted = invitation(Some(Uuid::new_v4()));
        assert!(!accepted.is_pending());
        assert!(accepted.is_accepted());
    }

    #[test]
    fn test_matches_email_case_insensitive() {
        let inv = invitation(None);
        assert!(inv.matches_email("invitee@example.com"));
        assert!(inv.matches_email("INVITEE@EXAMPLE.COM"));
        assert!(inv.matches_email("Invitee@Example.Com"));
    }

    #[test]
    fn test_matches_email_wrong_or_empty() {
        let inv = invitation(None);
        assert!(!inv.matches_email("other@example.com"));
        assert!(!inv.matches_email(""));
    }
}
