//! sea-orm entities for the directory service.

pub mod church_members;
pub mod church_stats;
pub mod churches;
pub mod events;
pub mod outbox_events;
pub mod sermons;
pub mod user_memberships;
pub mod users;
