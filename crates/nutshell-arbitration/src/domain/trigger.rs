//! What a trigger hands back to the caller.

use std::fmt;

use nutshell_core::participant::{ActorRef, ParticipantId};
use nutshell_rules::application::announcement::ChatRecord;
use nutshell_rules::domain::outcome::RollOutcome;
use nutshell_rules::domain::roll::RollAction;

/// The end of one resolution attempt on the active GM's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Rolled, graded and announced.
    Resolved {
        /// The graded roll.
        outcome: RollOutcome,
        /// The chat card that was published.
        record: ChatRecord,
    },
    /// The GM declined to supply a threshold. Nothing was published and
    /// nobody is notified.
    Cancelled,
}

/// Acknowledgement that a roll request went out on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSent {
    /// Who sent it.
    pub requester: ParticipantId,
    /// The active GM at the time of sending.
    pub resolver: ParticipantId,
    /// The requested action.
    pub action: RollAction,
    /// The character to roll for.
    pub actor_ref: ActorRef,
}

impl fmt::Display for RequestSent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("roll request sent to the GM")
    }
}

/// Result of a trigger, distinguishing the two paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The caller is the active GM and resolved the roll itself.
    Local(Resolution),
    /// The request was relayed; the outcome will arrive as a chat card.
    Relayed(RequestSent),
}
