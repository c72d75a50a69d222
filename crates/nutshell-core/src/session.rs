//! Session capability consumed from the host.
//!
//! The host decides who is connected, who is privileged and which
//! privileged participant is the active GM. Handlers query this at the
//! start of every invocation and never cache the answers.

use crate::participant::ParticipantId;

/// One participant's view of the current connection set.
pub trait SessionContext: Send + Sync {
    /// The participant this context belongs to.
    fn current_participant(&self) -> ParticipantId;

    /// Whether the current participant holds GM privilege.
    fn is_privileged(&self) -> bool;

    /// The participant the host currently designates as the active GM.
    fn active_resolver(&self) -> Option<ParticipantId>;

    /// True only when the current participant is privileged *and* is the
    /// designated active GM. A second connected GM fails this check.
    fn is_active_resolver(&self) -> bool {
        self.is_privileged() && self.active_resolver() == Some(self.current_participant())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct View {
        me: ParticipantId,
        privileged: bool,
        active: Option<ParticipantId>,
    }

    impl SessionContext for View {
        fn current_participant(&self) -> ParticipantId {
            self.me
        }

        fn is_privileged(&self) -> bool {
            self.privileged
        }

        fn active_resolver(&self) -> Option<ParticipantId> {
            self.active
        }
    }

    #[test]
    fn test_active_gm_is_active_resolver() {
        let me = ParticipantId::new();
        let view = View { me, privileged: true, active: Some(me) };
        assert!(view.is_active_resolver());
    }

    #[test]
    fn test_second_gm_is_not_active_resolver() {
        let view = View {
            me: ParticipantId::new(),
            privileged: true,
            active: Some(ParticipantId::new()),
        };
        assert!(!view.is_active_resolver());
    }

    #[test]
    fn test_unprivileged_participant_named_active_is_not_resolver() {
        let me = ParticipantId::new();
        let view = View { me, privileged: false, active: Some(me) };
        assert!(!view.is_active_resolver());
    }
}
