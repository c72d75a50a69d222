//! Nutshell — active-GM arbitration of relayed roll requests.
//!
//! Any participant may trigger a roll, but only the single active GM
//! chooses the target number and rolls. The active GM resolves its own
//! triggers locally; everyone else publishes a `RollRequest` on the
//! broadcast channel and gets an acknowledgement back straight away. The
//! outcome reaches every participant later, through the chat announcement.

pub mod application;
pub mod domain;
