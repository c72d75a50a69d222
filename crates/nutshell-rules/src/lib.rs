//! Nutshell — dice, outcome grading and result announcement.
//!
//! Rolls 2d6 plus a skill modifier against a GM-supplied target number,
//! grades the margin into strikes, and formats the result as a chat
//! record published to every participant.

pub mod application;
pub mod domain;
