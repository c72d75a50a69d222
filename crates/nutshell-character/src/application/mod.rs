//! Application services for characters.

pub mod command_handlers;
pub mod store;
