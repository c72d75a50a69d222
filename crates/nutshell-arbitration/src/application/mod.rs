//! The per-participant arbiter.

pub mod arbiter;
