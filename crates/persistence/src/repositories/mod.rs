//! Repository implementations.
//!
//! One repository per aggregate. Visibility filtering is pushed into SQL:
//! admin callers get the unfiltered query, everyone else gets the
//! owner-or-invited predicate as a WHERE clause. The two paths are distinct
//! queries, never a union.

pub mod activity;
pub mod guide;
pub mod guide_invitation;
pub mod user;

pub use activity::ActivityRepository;
pub use guide::GuideRepository;
pub use guide_invitation::GuideInvitationRepository;
pub use user::UserRepository;
