//! The arbiter: one per participant, wired to that participant's session
//! view, the shared broadcast channel, the character store and the local
//! GM prompt.
//!
//! Triggers take one of two paths. If the caller is the active GM the
//! roll is resolved in place. Otherwise a `RollRequest` is published and
//! the caller is acknowledged immediately. On the receiving side only a
//! participant that is privileged *and* currently designated active acts
//! on a request; every other receiver drops it. There is no request id and
//! no deduplication beyond that filter.
//!
//! Resolution is two-phase: [`Arbiter::request_threshold`] suspends until
//! the GM answers or cancels, then [`Arbiter::resolve_with`] rolls, grades
//! and announces.

use std::sync::{Arc, Mutex};

use nutshell_character::application::store::CharacterStore;
use nutshell_character::domain::aggregates::Character;
use nutshell_character::domain::skills::SkillKey;
use nutshell_core::channel::{BroadcastChannel, Envelope, ROLL_REQUEST_TOPIC};
use nutshell_core::clock::Clock;
use nutshell_core::command::Command;
use nutshell_core::error::DomainError;
use nutshell_core::participant::ActorRef;
use nutshell_core::prompt::ThresholdPrompt;
use nutshell_core::rng::DeterministicRng;
use nutshell_core::session::SessionContext;
use nutshell_rules::application::announcement::announce;
use nutshell_rules::application::resolution;
use nutshell_rules::domain::roll::RollKind;
use tracing::{debug, info, instrument, warn};

use crate::domain::commands::TriggerRoll;
use crate::domain::request::RollRequest;
use crate::domain::trigger::{RequestSent, Resolution, TriggerOutcome};

/// Roll entry points and request handler for one participant.
pub struct Arbiter {
    session: Arc<dyn SessionContext>,
    channel: Arc<dyn BroadcastChannel>,
    characters: Arc<dyn CharacterStore>,
    prompt: Arc<dyn ThresholdPrompt>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Arbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arbiter")
            .field("participant", &self.session.current_participant())
            .finish_non_exhaustive()
    }
}

impl Arbiter {
    /// Wires an arbiter to its collaborators.
    #[must_use]
    pub fn new(
        session: Arc<dyn SessionContext>,
        channel: Arc<dyn BroadcastChannel>,
        characters: Arc<dyn CharacterStore>,
        prompt: Arc<dyn ThresholdPrompt>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            session,
            channel,
            characters,
            prompt,
            rng,
            clock,
        }
    }

    /// Generic skill roll for `actor_ref`.
    ///
    /// # Errors
    ///
    /// See [`Arbiter::trigger`].
    pub async fn trigger_skill_roll(
        &self,
        actor_ref: &ActorRef,
        skill: SkillKey,
    ) -> Result<TriggerOutcome, DomainError> {
        self.trigger(&TriggerRoll::new(RollKind::Skill(skill), actor_ref.clone()))
            .await
    }

    /// Ranged attack for `actor_ref`.
    ///
    /// # Errors
    ///
    /// See [`Arbiter::trigger`].
    pub async fn trigger_ranged_attack(
        &self,
        actor_ref: &ActorRef,
    ) -> Result<TriggerOutcome, DomainError> {
        self.trigger(&TriggerRoll::new(RollKind::RangedAttack, actor_ref.clone()))
            .await
    }

    /// Close-combat-opposed roll for `actor_ref`.
    ///
    /// # Errors
    ///
    /// See [`Arbiter::trigger`].
    pub async fn trigger_close_combat_opposed(
        &self,
        actor_ref: &ActorRef,
    ) -> Result<TriggerOutcome, DomainError> {
        self.trigger(&TriggerRoll::new(
            RollKind::CloseCombatOpposed,
            actor_ref.clone(),
        ))
        .await
    }

    /// Resolves locally if this participant is the active GM, otherwise
    /// relays. Never waits for the outcome of a relayed request.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NoAuthority` if no GM is active (nothing is
    /// published), `DomainError::ChannelUnavailable` if the relay cannot be
    /// sent, and on the local path any error from [`Arbiter::resolve`].
    #[instrument(
        skip(self, command),
        fields(
            command = command.command_type(),
            correlation_id = %command.correlation_id(),
            actor = %command.actor_ref,
        )
    )]
    pub async fn trigger(&self, command: &TriggerRoll) -> Result<TriggerOutcome, DomainError> {
        let me = self.session.current_participant();
        let Some(resolver) = self.session.active_resolver() else {
            warn!(participant = %me, "no active GM; roll aborted");
            return Err(DomainError::NoAuthority);
        };

        if self.session.is_privileged() && resolver == me {
            let resolution = self.resolve(command.kind, &command.actor_ref).await?;
            return Ok(TriggerOutcome::Local(resolution));
        }

        let request = RollRequest::new(command.kind, command.actor_ref.clone(), me);
        self.channel
            .publish(Envelope::new(ROLL_REQUEST_TOPIC, &request)?)
            .await?;

        info!(participant = %me, resolver = %resolver, "roll request relayed");
        Ok(TriggerOutcome::Relayed(RequestSent {
            requester: me,
            resolver,
            action: request.action,
            actor_ref: request.actor_ref,
        }))
    }

    /// Subscriber handler for every envelope delivered to this participant.
    ///
    /// Returns `Ok(None)` when the envelope is not a roll request, is
    /// malformed, or this participant is not the active GM.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTarget` if the requested character does
    /// not exist here; the requester is not told.
    pub async fn handle_envelope(
        &self,
        envelope: &Envelope,
    ) -> Result<Option<Resolution>, DomainError> {
        if envelope.topic != ROLL_REQUEST_TOPIC {
            return Ok(None);
        }
        let Some(request) = envelope.decode::<RollRequest>() else {
            debug!(payload = %envelope.payload, "ignoring malformed roll request");
            return Ok(None);
        };
        let Some(kind) = request.kind() else {
            debug!(action = request.action.tag(), "ignoring skill roll without skill key");
            return Ok(None);
        };
        if !self.session.is_active_resolver() {
            debug!(
                participant = %self.session.current_participant(),
                requester = %request.requester_id,
                "not the active GM; ignoring roll request"
            );
            return Ok(None);
        }

        info!(
            requester = %request.requester_id,
            actor = %request.actor_ref,
            action = request.action.tag(),
            "resolving relayed roll request"
        );
        self.resolve(kind, &request.actor_ref)
            .await
            .inspect_err(|e| warn!(actor = %request.actor_ref, error = %e, "relayed roll dropped"))
            .map(Some)
    }

    /// Runs both phases for `kind` on `actor_ref`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTarget` if the character cannot be
    /// loaded, or any error from [`Arbiter::resolve_with`].
    pub async fn resolve(
        &self,
        kind: RollKind,
        actor_ref: &ActorRef,
    ) -> Result<Resolution, DomainError> {
        let character = self
            .characters
            .load(actor_ref)
            .await?
            .ok_or_else(|| DomainError::UnknownTarget(actor_ref.clone()))?;

        let Some(target_number) = self.request_threshold(kind).await else {
            info!(actor = %actor_ref, "GM cancelled the threshold prompt");
            return Ok(Resolution::Cancelled);
        };

        self.resolve_with(kind, &character, target_number).await
    }

    /// Phase one: asks the GM for the threshold. `None` means cancelled.
    /// Answers outside a fixed option set fall back to its default.
    pub async fn request_threshold(&self, kind: RollKind) -> Option<i32> {
        let request = kind.threshold_request();
        self.prompt
            .request_threshold(&request)
            .await
            .map(|answer| request.accept(answer))
    }

    /// Phase two: rolls, grades and announces against `target_number`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the RNG lock is poisoned,
    /// or any error from publishing the announcement.
    pub async fn resolve_with(
        &self,
        kind: RollKind,
        character: &Character,
        target_number: i32,
    ) -> Result<Resolution, DomainError> {
        // Lock RNG only for the synchronous roll; never across an await.
        let outcome = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
            resolution::resolve_with(kind, character, target_number, &mut *rng)
        };

        let record = announce(&outcome, character, &*self.channel, &*self.clock).await?;
        Ok(Resolution::Resolved { outcome, record })
    }
}
