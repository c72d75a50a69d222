//! Messages and results of the arbitration protocol.

pub mod commands;
pub mod request;
pub mod trigger;
