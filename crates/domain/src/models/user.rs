//! Caller identity and derived role.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user, derived from the staff flag.
///
/// Never persisted and never client-settable; role changes go through the
/// admin-gated `is_staff` update path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Derives the role from the staff flag.
    pub fn from_is_staff(is_staff: bool) -> Self {
        if is_staff {
            Role::Admin
        } else {
            Role::User
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated caller as seen by authorization checks.
///
/// A projection of the user record carrying exactly what the visibility
/// predicate and access policy need. `email` may be empty for accounts
/// created without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub email: String,
    pub is_staff: bool,
}

impl Caller {
    pub fn new(id: Uuid, email: impl Into<String>, is_staff: bool) -> Self {
        Self {
            id,
            email: email.into(),
            is_staff,
        }
    }

    /// Admins bypass row-level visibility entirely.
    pub fn is_admin(&self) -> bool {
        self.is_staff
    }

    pub fn role(&self) -> Role {
        Role::from_is_staff(self.is_staff)
    }
}
