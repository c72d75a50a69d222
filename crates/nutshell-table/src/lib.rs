//! Nutshell table — an in-process host session.
//!
//! Seats players and GMs around one broadcast transport, tracks who is the
//! active GM, and drives everything from a line-oriented console.

pub mod config;
pub mod console;
pub mod error;
pub mod roster;
pub mod table;
pub mod transport;
