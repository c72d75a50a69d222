//! Who is at the table, and which GM is active.
//!
//! The active GM is the earliest-connected privileged participant that is
//! still connected, unless `activate` named another connected GM. That
//! override lasts until the named GM disconnects. The answer is recomputed
//! on every query.

use std::sync::{Arc, PoisonError, RwLock};

use nutshell_core::error::DomainError;
use nutshell_core::participant::ParticipantId;
use nutshell_core::session::SessionContext;

#[derive(Debug, Clone)]
struct Member {
    id: ParticipantId,
    name: String,
    privileged: bool,
    connected_at: Option<u64>,
}

#[derive(Debug, Default)]
struct RosterState {
    members: Vec<Member>,
    active_override: Option<ParticipantId>,
    next_tick: u64,
}

impl RosterState {
    fn member(&self, id: ParticipantId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    fn member_mut(&mut self, id: ParticipantId) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    fn active_resolver(&self) -> Option<ParticipantId> {
        let overridden = self
            .active_override
            .and_then(|id| self.member(id))
            .filter(|m| m.privileged && m.connected_at.is_some());
        if let Some(member) = overridden {
            return Some(member.id);
        }
        self.members
            .iter()
            .filter(|m| m.privileged)
            .filter_map(|m| m.connected_at.map(|at| (at, m.id)))
            .min_by_key(|(at, _)| *at)
            .map(|(_, id)| id)
    }
}

/// The set of participants known to this table.
#[derive(Debug, Default)]
pub struct Roster {
    state: RwLock<RosterState>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers and connects a participant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is already taken.
    pub fn join(&self, name: &str, privileged: bool) -> Result<ParticipantId, DomainError> {
        let mut state = self.write()?;
        if state.members.iter().any(|m| m.name == name) {
            return Err(DomainError::Validation(format!(
                "participant {name} already joined"
            )));
        }
        let id = ParticipantId::new();
        let tick = state.next_tick;
        state.next_tick += 1;
        state.members.push(Member {
            id,
            name: name.to_owned(),
            privileged,
            connected_at: Some(tick),
        });
        Ok(id)
    }

    /// Marks a participant connected or disconnected. Reconnecting moves
    /// the participant to the back of the connection order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `id` is not on the roster.
    pub fn set_connected(&self, id: ParticipantId, connected: bool) -> Result<(), DomainError> {
        let mut state = self.write()?;
        let tick = state.next_tick;
        let member = state
            .member_mut(id)
            .ok_or_else(|| DomainError::Validation(format!("no participant {id}")))?;
        match (connected, member.connected_at) {
            (true, None) => {
                member.connected_at = Some(tick);
                state.next_tick += 1;
            }
            (false, Some(_)) => {
                member.connected_at = None;
                if state.active_override == Some(id) {
                    state.active_override = None;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Designates `id` as the active GM until it disconnects.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `id` is unknown, unprivileged
    /// or disconnected.
    pub fn activate(&self, id: ParticipantId) -> Result<(), DomainError> {
        let mut state = self.write()?;
        let member = state
            .member(id)
            .ok_or_else(|| DomainError::Validation(format!("no participant {id}")))?;
        if !member.privileged {
            return Err(DomainError::Validation(format!(
                "{} is not a GM",
                member.name
            )));
        }
        if member.connected_at.is_none() {
            return Err(DomainError::Validation(format!(
                "{} is not connected",
                member.name
            )));
        }
        state.active_override = Some(id);
        Ok(())
    }

    /// The currently designated active GM, if any is connected.
    #[must_use]
    pub fn active_resolver(&self) -> Option<ParticipantId> {
        self.read().active_resolver()
    }

    /// Looks a participant up by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<ParticipantId> {
        self.read()
            .members
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.id)
    }

    /// Whether `id` is privileged.
    #[must_use]
    pub fn is_privileged(&self, id: ParticipantId) -> bool {
        self.read().member(id).is_some_and(|m| m.privileged)
    }

    /// Whether `id` is currently connected.
    #[must_use]
    pub fn is_connected(&self, id: ParticipantId) -> bool {
        self.read()
            .member(id)
            .is_some_and(|m| m.connected_at.is_some())
    }

    /// The session view handed to `id`'s arbiter.
    #[must_use]
    pub fn session_for(self: &Arc<Self>, id: ParticipantId) -> ParticipantSession {
        ParticipantSession {
            roster: Arc::clone(self),
            participant: id,
        }
    }

    // Read-only queries cannot fail, so a poisoned lock still yields the
    // last written state.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, RosterState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, RosterState>, DomainError> {
        self.state
            .write()
            .map_err(|e| DomainError::Infrastructure(format!("roster lock poisoned: {e}")))
    }
}

/// One participant's live view of the roster.
#[derive(Debug, Clone)]
pub struct ParticipantSession {
    roster: Arc<Roster>,
    participant: ParticipantId,
}

impl SessionContext for ParticipantSession {
    fn current_participant(&self) -> ParticipantId {
        self.participant
    }

    fn is_privileged(&self) -> bool {
        self.roster.is_privileged(self.participant)
    }

    fn active_resolver(&self) -> Option<ParticipantId> {
        self.roster.active_resolver()
    }
}
