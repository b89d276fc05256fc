//! Row-level visibility predicate.
//!
//! One canonical rule, used everywhere a read is filtered:
//! - admins see every row, checked first and short-circuiting the rest;
//! - non-admins see a guide iff they own it, hold an invitation bound to
//!   their account, or hold an invitation addressed to their email
//!   (case-insensitive; an account without an email never matches).
//!
//! Activities inherit the visibility of their parent guide. Invitations are
//! visible to the guide owner and the invitee.
//!
//! The repositories mirror this predicate as SQL; these functions are the
//! reference semantics and serve the in-memory checks and tests.

use uuid::Uuid;

use crate::models::user::Caller;

/// The facts about one invitation that visibility depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationFacts {
    pub invited_user_id: Option<Uuid>,
    pub invited_email: String,
}

/// Case-insensitive email match. An empty caller email never matches,
/// so accounts without an email cannot ride an empty-string comparison.
pub fn email_matches(caller_email: &str, invited_email: &str) -> bool {
    !caller_email.is_empty() && caller_email.eq_ignore_ascii_case(invited_email)
}

/// Whether an invitation addresses the caller, either through the bound
/// account or through the invited email.
pub fn invitation_addresses(caller: &Caller, invitation: &InvitationFacts) -> bool {
    if invitation.invited_user_id == Some(caller.id) {
        return true;
    }
    email_matches(&caller.email, &invitation.invited_email)
}

/// Whether the caller may read a guide with the given owner and invitations.
pub fn can_view_guide(caller: &Caller, owner_id: Uuid, invitations: &[InvitationFacts]) -> bool {
    if caller.is_admin() {
        return true;
    }
    if owner_id == caller.id {
        return true;
    }
    invitations.iter().any(|inv| invitation_addresses(caller, inv))
}

/// Whether the caller may read a single invitation row.
pub fn can_view_invitation(
    caller: &Caller,
    guide_owner_id: Uuid,
    invitation: &InvitationFacts,
) -> bool {
    if caller.is_admin() {
        return true;
    }
    if guide_owner_id == caller.id {
        return true;
    }
    invitation_addresses(caller, invitation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(email: &str, is_staff: bool) -> Caller {
        Caller::new(Uuid::new_v4(), email, is_staff)
    }

    fn invitation(user_id: Option<Uuid>, email: &str) -> InvitationFacts {
        InvitationFacts {
            invited_user_id: user_id,
            invited_email: email.to_string(),
        }
    }

    #[test]
    fn test_admin_sees_everything() {
        let admin = caller("", true);
        let owner = Uuid::new_v4();

        assert!(can_view_guide(&admin, owner, &[]));
        assert!(can_view_invitation(
            &admin,
            owner,
            &invitation(None, "someone@example.com")
        ));
    }

    #[test]
    fn test_owner_sees_own_guide() {
        let user = caller("owner@example.com", false);
        assert!(can_view_guide(&user, user.id, &[]));
    }

    #[test]
    fn test_stranger_sees_nothing() {
        let user = caller("stranger@example.com", false);
        let invitations = vec![invitation(None, "someone-else@example.com")];
        assert!(!can_view_guide(&user, Uuid::new_v4(), &invitations));
    }

    #[test]
    fn test_invited_by_bound_account() {
        let user = caller("any@example.com", false);
        let invitations = vec![invitation(Some(user.id), "original@example.com")];
        assert!(can_view_guide(&user, Uuid::new_v4(), &invitations));
    }

    #[test]
    fn test_invited_by_email_case_insensitive() {
        let user = caller("A@X.com", false);
        let invitations = vec![invitation(None, "a@x.com")];
        assert!(can_view_guide(&user, Uuid::new_v4(), &invitations));
    }

    #[test]
    fn test_empty_email_never_matches() {
        let user = caller("", false);
        // An invitation with an empty invited_email must not match an
        // account without an email.
        let invitations = vec![invitation(None, "")];
        assert!(!can_view_guide(&user, Uuid::new_v4(), &invitations));
    }

    #[test]
    fn test_email_matches_rules() {
        assert!(email_matches("A@X.com", "a@x.com"));
        assert!(email_matches("a@x.com", "A@X.COM"));
        assert!(!email_matches("", ""));
        assert!(!email_matches("", "a@x.com"));
        assert!(!email_matches("b@x.com", "a@x.com"));
    }

    #[test]
    fn test_invitation_visible_to_guide_owner() {
        let owner = caller("owner@example.com", false);
        let inv = invitation(None, "invitee@example.com");
        assert!(can_view_invitation(&owner, owner.id, &inv));
    }

    #[test]
    fn test_invitation_visible_to_invitee_only() {
        let invitee = caller("invitee@example.com", false);
        let bystander = caller("bystander@example.com", false);
        let guide_owner = Uuid::new_v4();
        let inv = invitation(None, "Invitee@Example.com");

        assert!(can_view_invitation(&invitee, guide_owner, &inv));
        assert!(!can_view_invitation(&bystander, guide_owner, &inv));
    }
}
