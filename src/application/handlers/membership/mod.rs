//! Membership handlers.

mod admit_line_member;

pub use admit_line_member::{AdmitLineMemberCommand, AdmitLineMemberHandler};
