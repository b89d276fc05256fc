//! Per-entity, per-operation access-control policy.
//!
//! Read access goes through the visibility predicate; these checks cover
//! writes. Handlers must report a failed check on an *invisible* row as
//! NotFound rather than Forbidden so row existence does not leak.

use uuid::Uuid;

use crate::models::user::Caller;
use crate::services::visibility::email_matches;

/// Guides and their activities may be written by the guide owner or an admin.
pub fn can_modify_guide(caller: &Caller, owner_id: Uuid) -> bool {
    caller.is_admin() || owner_id == caller.id
}

/// Invitations on a guide are created and deleted by the guide owner or an
/// admin. The invitee never manages invitations, only accepts one.
pub fn can_manage_invitations(caller: &Caller, guide_owner_id: Uuid) -> bool {
    caller.is_admin() || guide_owner_id == caller.id
}

/// The accept transition is allowed only when the caller's registered email
/// matches the invited email, case-insensitively. There is no admin bypass:
/// acceptance binds an account to the invitation, which only the addressee
/// can do.
pub fn can_accept_invitation(caller: &Caller, invited_email: &str) -> bool {
    email_matches(&caller.email, invited_email)
}

/// A user record is readable by the account itself or an admin.
pub fn can_read_user(caller: &Caller, target_id: Uuid) -> bool {
    caller.is_admin() || caller.id == target_id
}

/// A user record is writable by the account itself or an admin; changing
/// `is_staff` additionally requires admin.
pub fn can_update_user(caller: &Caller, target_id: Uuid, changes_staff_flag: bool) -> bool {
    if caller.is_admin() {
        return true;
    }
    caller.id == target_id && !changes_staff_flag
}

/// Accounts are created and deleted by admins only.
pub fn can_administer_users(caller: &Caller) -> bool {
    caller.is_admin()
}
