//! Resolution and announcement.

pub mod announcement;
pub mod resolution;
