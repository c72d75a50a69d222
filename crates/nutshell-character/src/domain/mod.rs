//! Domain model for characters.

pub mod aggregates;
pub mod commands;
pub mod skills;
pub mod strikes;
