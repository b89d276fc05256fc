//! Entity definitions (database row mappings).

pub mod activity;
pub mod guide;
pub mod guide_invitation;
pub mod user;

pub use activity::{ActivityEntity, ActivityWithGuideOwner};
pub use guide::GuideWithOwner;
pub use guide_invitation::{GuideInvitationEntity, InvitationWithGuideOwner};
pub use user::UserEntity;
