//! Nutshell — character skills and damage-capacity context.
//!
//! Owns the eleven skill modifiers, the derived strike envelope
//! (`max = 4 + endurance`), and the store through which the roll
//! subsystem reads characters.

pub mod application;
pub mod domain;
