//! Nutshell Core — shared abstractions for the roll-arbitration engine.
//!
//! This crate defines the identifiers, capability traits and error type
//! that every other crate depends on. The host session, the broadcast
//! channel and the GM's data-entry surface are only ever reached through
//! the traits declared here. It contains no infrastructure code.

pub mod channel;
pub mod clock;
pub mod command;
pub mod error;
pub mod participant;
pub mod prompt;
pub mod rng;
pub mod session;
