//! Membership module - who belongs to which family space.

mod member;

pub use member::{Member, MemberRole};
