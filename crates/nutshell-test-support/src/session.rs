//! Test session — a fixed `SessionContext` view.

use nutshell_core::participant::ParticipantId;
use nutshell_core::session::SessionContext;

/// A session view whose answers never change.
#[derive(Debug, Clone, Copy)]
pub struct StaticSession {
    /// The participant this view belongs to.
    pub current: ParticipantId,
    /// Whether `current` is a GM.
    pub privileged: bool,
    /// The designated active GM, if any.
    pub active: Option<ParticipantId>,
}

impl StaticSession {
    /// A player view with `active` as the active GM.
    #[must_use]
    pub fn player(current: ParticipantId, active: Option<ParticipantId>) -> Self {
        Self {
            current,
            privileged: false,
            active,
        }
    }

    /// A GM view with `active` as the active GM (possibly someone else).
    #[must_use]
    pub fn gm(current: ParticipantId, active: Option<ParticipantId>) -> Self {
        Self {
            current,
            privileged: true,
            active,
        }
    }
}

impl SessionContext for StaticSession {
    fn current_participant(&self) -> ParticipantId {
        self.current
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn active_resolver(&self) -> Option<ParticipantId> {
        self.active
    }
}
