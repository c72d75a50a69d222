//! The host session: one arbiter per seat on a shared transport.
//!
//! Everything runs on one task. A trigger publishes, then [`Table::pump`]
//! hands each seat's queued envelopes to its arbiter one at a time until
//! every inbox is empty. A GM prompt suspends the pump until answered.

use std::sync::{Arc, Mutex};

use nutshell_arbitration::application::arbiter::Arbiter;
use nutshell_arbitration::domain::trigger::{Resolution, TriggerOutcome};
use nutshell_character::application::command_handlers::{
    handle_record_strikes_taken, handle_set_skill,
};
use nutshell_character::application::store::{CharacterStore, InMemoryCharacterStore};
use nutshell_character::domain::aggregates::Character;
use nutshell_character::domain::commands::{RecordStrikesTaken, SetSkill};
use nutshell_character::domain::skills::SkillKey;
use nutshell_core::channel::{CHAT_TOPIC, Envelope};
use nutshell_core::clock::Clock;
use nutshell_core::error::DomainError;
use nutshell_core::participant::{ActorRef, ParticipantId};
use nutshell_core::prompt::ThresholdPrompt;
use nutshell_core::rng::DeterministicRng;
use nutshell_rules::application::announcement::ChatRecord;
use nutshell_rules::domain::roll::RollKind;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::TableConfig;
use crate::console::{ConsoleCommand, HELP};
use crate::error::{ConsoleError, TableError};
use crate::roster::Roster;
use crate::transport::TokioBroadcastChannel;

/// A participant's place at the table.
#[derive(Debug)]
pub struct Seat {
    /// Roster identity.
    pub id: ParticipantId,
    /// Console name.
    pub name: String,
    arbiter: Arbiter,
    inbox: Option<broadcast::Receiver<Envelope>>,
}

/// What one seat's arbiter did with a delivered envelope.
#[derive(Debug)]
pub struct Delivery {
    /// Name of the seat that handled it.
    pub seat: String,
    /// The resolution, or why it was dropped.
    pub result: Result<Resolution, DomainError>,
}

/// A running table session.
pub struct Table {
    roster: Arc<Roster>,
    channel: Arc<TokioBroadcastChannel>,
    characters: Arc<InMemoryCharacterStore>,
    prompt: Arc<dyn ThresholdPrompt>,
    rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    clock: Arc<dyn Clock>,
    seats: Vec<Seat>,
    chat_log: broadcast::Receiver<Envelope>,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("roster", &self.roster)
            .field("seats", &self.seats)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Creates an empty table over a fresh broadcast channel.
    #[must_use]
    pub fn new(
        channel_capacity: usize,
        characters: Vec<Character>,
        prompt: Arc<dyn ThresholdPrompt>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let channel = Arc::new(TokioBroadcastChannel::new(channel_capacity));
        let chat_log = channel.subscribe();
        Self {
            roster: Arc::new(Roster::new()),
            channel,
            characters: Arc::new(InMemoryCharacterStore::with_characters(characters)),
            prompt,
            rng,
            clock,
            seats: Vec::new(),
            chat_log,
        }
    }

    /// Builds a table from `config`, seating the GMs first and then the
    /// players.
    ///
    /// # Errors
    ///
    /// Returns `TableError` if the character roster cannot be loaded or a
    /// seat cannot be added.
    pub fn from_config(
        config: &TableConfig,
        prompt: Arc<dyn ThresholdPrompt>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TableError> {
        let characters = config.load_characters()?;
        let mut table = Self::new(
            config.channel_capacity,
            characters,
            prompt,
            config.rng(),
            clock,
        );
        for gm in &config.gms {
            table.add_seat(gm, true)?;
        }
        for player in &config.players {
            table.add_seat(player, false)?;
        }
        Ok(table)
    }

    /// Seats and connects a new participant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is taken.
    pub fn add_seat(&mut self, name: &str, privileged: bool) -> Result<ParticipantId, DomainError> {
        let id = self.roster.join(name, privileged)?;
        let arbiter = Arbiter::new(
            Arc::new(self.roster.session_for(id)),
            self.channel.clone(),
            self.characters.clone(),
            Arc::clone(&self.prompt),
            Arc::clone(&self.rng),
            Arc::clone(&self.clock),
        );
        self.seats.push(Seat {
            id,
            name: name.to_owned(),
            arbiter,
            inbox: Some(self.channel.subscribe()),
        });
        info!(participant = %id, name, privileged, "seat added");
        Ok(id)
    }

    /// The roster backing this table.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The shared transport.
    #[must_use]
    pub fn channel(&self) -> &TokioBroadcastChannel {
        &self.channel
    }

    /// The seat named `who`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if nobody by that name is seated.
    pub fn seat(&self, who: &str) -> Result<&Seat, DomainError> {
        self.seats
            .iter()
            .find(|s| s.name == who)
            .ok_or_else(|| DomainError::Validation(format!("nobody named {who} is seated")))
    }

    fn seat_index(&self, who: &str) -> Result<usize, DomainError> {
        self.seats
            .iter()
            .position(|s| s.name == who)
            .ok_or_else(|| DomainError::Validation(format!("nobody named {who} is seated")))
    }

    /// Triggers `kind` for `actor_ref` from `who`'s seat.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `who` is unknown or
    /// disconnected, otherwise whatever the arbiter's trigger returns.
    pub async fn trigger(
        &self,
        who: &str,
        kind: RollKind,
        actor_ref: &ActorRef,
    ) -> Result<TriggerOutcome, DomainError> {
        let seat = self.seat(who)?;
        if !self.roster.is_connected(seat.id) {
            return Err(DomainError::Validation(format!("{who} is not connected")));
        }
        match kind {
            RollKind::Skill(skill) => seat.arbiter.trigger_skill_roll(actor_ref, skill).await,
            RollKind::RangedAttack => seat.arbiter.trigger_ranged_attack(actor_ref).await,
            RollKind::CloseCombatOpposed => {
                seat.arbiter.trigger_close_combat_opposed(actor_ref).await
            }
        }
    }

    /// Reconnects `who`. Envelopes published while away are not replayed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `who` is not seated.
    pub fn connect(&mut self, who: &str) -> Result<(), DomainError> {
        let index = self.seat_index(who)?;
        self.roster.set_connected(self.seats[index].id, true)?;
        if self.seats[index].inbox.is_none() {
            self.seats[index].inbox = Some(self.channel.subscribe());
        }
        info!(name = who, "participant connected");
        Ok(())
    }

    /// Disconnects `who`, dropping anything queued for it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `who` is not seated.
    pub fn disconnect(&mut self, who: &str) -> Result<(), DomainError> {
        let index = self.seat_index(who)?;
        self.roster.set_connected(self.seats[index].id, false)?;
        self.seats[index].inbox = None;
        info!(name = who, "participant disconnected");
        Ok(())
    }

    /// Makes `who` the active GM.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `who` is not a connected GM.
    pub fn activate(&self, who: &str) -> Result<(), DomainError> {
        let seat = self.seat(who)?;
        self.roster.activate(seat.id)?;
        info!(name = who, "active GM changed");
        Ok(())
    }

    /// Delivers queued envelopes to each connected seat, one per seat per
    /// round, until no inbox has anything left.
    pub async fn pump(&mut self) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        loop {
            let mut delivered = false;
            for index in 0..self.seats.len() {
                let Some(inbox) = self.seats[index].inbox.as_mut() else {
                    continue;
                };
                let envelope = match inbox.try_recv() {
                    Ok(envelope) => envelope,
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!(seat = %self.seats[index].name, skipped, "inbox overflowed");
                        delivered = true;
                        continue;
                    }
                    Err(TryRecvError::Empty | TryRecvError::Closed) => continue,
                };
                delivered = true;

                let seat = &self.seats[index];
                let result = match seat.arbiter.handle_envelope(&envelope).await {
                    Ok(None) => continue,
                    Ok(Some(resolution)) => Ok(resolution),
                    Err(e) => Err(e),
                };
                deliveries.push(Delivery {
                    seat: seat.name.clone(),
                    result,
                });
            }
            if !delivered {
                return deliveries;
            }
        }
    }

    /// Chat cards announced since the last call.
    pub fn drain_chat(&mut self) -> Vec<ChatRecord> {
        let mut records = Vec::new();
        loop {
            match self.chat_log.try_recv() {
                Ok(envelope) if envelope.topic == CHAT_TOPIC => {
                    if let Some(record) = envelope.decode::<ChatRecord>() {
                        records.push(record);
                    }
                }
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "chat log overflowed");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return records,
            }
        }
    }

    /// Looks up a character sheet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTarget` if `actor_ref` does not resolve.
    pub async fn sheet(&self, actor_ref: &ActorRef) -> Result<Character, DomainError> {
        self.characters
            .load(actor_ref)
            .await?
            .ok_or_else(|| DomainError::UnknownTarget(actor_ref.clone()))
    }

    /// Overwrites the damage taken by `actor_ref`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTarget` if `actor_ref` does not resolve.
    pub async fn record_damage(
        &self,
        actor_ref: &ActorRef,
        taken: i32,
    ) -> Result<Character, DomainError> {
        let command = RecordStrikesTaken {
            correlation_id: Uuid::new_v4(),
            actor_ref: actor_ref.clone(),
            taken,
        };
        handle_record_strikes_taken(&command, self.characters.as_ref()).await
    }

    /// Changes one skill modifier of `actor_ref`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownTarget` if `actor_ref` does not resolve.
    pub async fn set_skill(
        &self,
        actor_ref: &ActorRef,
        skill: SkillKey,
        value: i32,
    ) -> Result<Character, DomainError> {
        let command = SetSkill {
            correlation_id: Uuid::new_v4(),
            actor_ref: actor_ref.clone(),
            skill,
            value,
        };
        handle_set_skill(&command, self.characters.as_ref()).await
    }

    /// Runs one console command and returns the lines to print. `Quit` is
    /// left to the caller and prints nothing.
    pub async fn execute(&mut self, command: ConsoleCommand) -> Vec<String> {
        let mut lines = Vec::new();
        match command {
            ConsoleCommand::Roll {
                who,
                kind,
                actor_ref,
            } => match self.trigger(&who, kind, &actor_ref).await {
                Ok(TriggerOutcome::Relayed(sent)) => lines.push(format!("{who}: {sent}")),
                Ok(TriggerOutcome::Local(Resolution::Cancelled)) => {
                    lines.push(format!("{who}: roll cancelled"));
                }
                Ok(TriggerOutcome::Local(Resolution::Resolved { .. })) => {}
                Err(e) => lines.push(format!("{who}: {}", ConsoleError(e))),
            },
            ConsoleCommand::Connect(who) => {
                lines.push(report(&who, self.connect(&who), "connected"));
            }
            ConsoleCommand::Disconnect(who) => {
                lines.push(report(&who, self.disconnect(&who), "disconnected"));
            }
            ConsoleCommand::Activate(who) => {
                lines.push(report(&who, self.activate(&who), "is now the active GM"));
            }
            ConsoleCommand::Channel(up) => {
                self.channel.set_available(up);
                lines.push(format!("channel {}", if up { "up" } else { "down" }));
            }
            ConsoleCommand::Characters => match self.characters.actor_refs() {
                Ok(refs) => lines.extend(refs.iter().map(ToString::to_string)),
                Err(e) => lines.push(ConsoleError(e).to_string()),
            },
            ConsoleCommand::Sheet(actor_ref) => {
                lines.push(render_sheet(self.sheet(&actor_ref).await));
            }
            ConsoleCommand::Damage { actor_ref, taken } => {
                lines.push(render_sheet(self.record_damage(&actor_ref, taken).await));
            }
            ConsoleCommand::SetSkill {
                actor_ref,
                skill,
                value,
            } => {
                lines.push(render_sheet(self.set_skill(&actor_ref, skill, value).await));
            }
            ConsoleCommand::Help => lines.push(HELP.to_owned()),
            ConsoleCommand::Quit => return lines,
        }
        lines.extend(self.settle().await);
        lines
    }

    /// Pumps until quiet and renders what happened: resolver-side errors
    /// and cancellations, then every new chat card.
    pub async fn settle(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for delivery in self.pump().await {
            match delivery.result {
                Ok(Resolution::Cancelled) => {
                    lines.push(format!("{}: roll cancelled", delivery.seat));
                }
                Ok(Resolution::Resolved { .. }) => {}
                Err(e) => lines.push(format!("{}: {}", delivery.seat, ConsoleError(e))),
            }
        }
        lines.extend(
            self.drain_chat()
                .iter()
                .map(|record| record.to_string().trim_end().to_owned()),
        );
        lines
    }
}

fn report(who: &str, result: Result<(), DomainError>, done: &str) -> String {
    match result {
        Ok(()) => format!("{who} {done}"),
        Err(e) => ConsoleError(e).to_string(),
    }
}

fn render_sheet(result: Result<Character, DomainError>) -> String {
    let character = match result {
        Ok(character) => character,
        Err(e) => return ConsoleError(e).to_string(),
    };
    let mut lines = vec![format!(
        "{} ({})  strikes {}/{} taken {}{}",
        character.name,
        character.actor_ref,
        character.strikes.remaining,
        character.strikes.max,
        character.strikes.taken,
        if character.strikes.is_down() { "  DOWN" } else { "" }
    )];
    for (label, text) in [("Power Theme", &character.power_theme), ("Gear", &character.gear)] {
        if !text.is_empty() {
            lines.push(format!("  {label:<14}{text}"));
        }
    }
    lines.extend(
        SkillKey::ALL
            .iter()
            .map(|skill| format!("  {:<14}{:+}", skill.label(), character.skill(*skill))),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use nutshell_core::channel::ROLL_REQUEST_TOPIC;
    use nutshell_test_support::{FixedClock, ScriptedPrompt, SequenceRng};

    use super::*;
    use crate::config::default_characters;

    fn vale() -> ActorRef {
        ActorRef::new("Actor.vale")
    }

    fn table(answers: Vec<Option<i32>>, dice: Vec<u32>) -> (Table, Arc<ScriptedPrompt>) {
        let prompt = Arc::new(ScriptedPrompt::new(answers));
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 19, 30, 0).unwrap());
        let mut table = Table::new(
            16,
            default_characters(),
            prompt.clone(),
            Arc::new(Mutex::new(SequenceRng::new(dice))),
            Arc::new(clock),
        );
        table.add_seat("gm", true).unwrap();
        table.add_seat("alice", false).unwrap();
        (table, prompt)
    }

    #[tokio::test]
    async fn test_player_roll_resolves_through_the_gm() {
        let (mut table, prompt) = table(vec![Some(8)], vec![4, 5]);

        let lines = table
            .execute(ConsoleCommand::Roll {
                who: "alice".into(),
                kind: RollKind::RangedAttack,
                actor_ref: vale(),
            })
            .await;

        assert_eq!(lines[0], "alice: roll request sent to the GM");
        assert_eq!(prompt.requests().len(), 1);
        let card = &lines[1];
        assert!(card.starts_with("Vale | Ranged Attack"));
        assert!(card.contains("Total"));
        assert!(card.contains("Strikes"));
    }

    #[tokio::test]
    async fn test_gm_roll_resolves_locally() {
        let (mut table, prompt) = table(vec![Some(6)], vec![3, 3]);

        let lines = table
            .execute(ConsoleCommand::Roll {
                who: "gm".into(),
                kind: RollKind::Skill(SkillKey::Perception),
                actor_ref: vale(),
            })
            .await;

        assert_eq!(prompt.requests().len(), 1);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Vale | Perception Roll"));
    }

    #[tokio::test]
    async fn test_cancel_prints_locally_and_announces_nothing() {
        let (mut table, _prompt) = table(vec![None], vec![]);

        let lines = table
            .execute(ConsoleCommand::Roll {
                who: "alice".into(),
                kind: RollKind::CloseCombatOpposed,
                actor_ref: vale(),
            })
            .await;

        assert_eq!(
            lines,
            vec![
                "alice: roll request sent to the GM".to_owned(),
                "gm: roll cancelled".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_gm_connected_reports_no_authority() {
        let (mut table, prompt) = table(vec![], vec![]);
        table.disconnect("gm").unwrap();

        let lines = table
            .execute(ConsoleCommand::Roll {
                who: "alice".into(),
                kind: RollKind::RangedAttack,
                actor_ref: vale(),
            })
            .await;

        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("no_authority"));
        assert!(prompt.requests().is_empty());
    }

    #[tokio::test]
    async fn test_disconnected_seat_cannot_roll() {
        let (mut table, _prompt) = table(vec![], vec![]);
        table.disconnect("alice").unwrap();

        let result = table.trigger("alice", RollKind::RangedAttack, &vale()).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_target_is_reported_on_the_gm_seat() {
        let (mut table, prompt) = table(vec![], vec![]);

        let lines = table
            .execute(ConsoleCommand::Roll {
                who: "alice".into(),
                kind: RollKind::RangedAttack,
                actor_ref: ActorRef::new("Actor.ghost"),
            })
            .await;

        assert_eq!(lines[0], "alice: roll request sent to the GM");
        assert!(lines[1].starts_with("gm: error [unknown_target]"));
        assert!(prompt.requests().is_empty());
    }

    #[tokio::test]
    async fn test_channel_down_rejects_relay() {
        let (mut table, _prompt) = table(vec![], vec![]);
        table.execute(ConsoleCommand::Channel(false)).await;

        let lines = table
            .execute(ConsoleCommand::Roll {
                who: "alice".into(),
                kind: RollKind::RangedAttack,
                actor_ref: vale(),
            })
            .await;

        assert!(lines[0].contains("channel_unavailable"));
    }

    #[tokio::test]
    async fn test_pump_skips_disconnected_seats() {
        let (mut table, _prompt) = table(vec![], vec![]);
        table.disconnect("gm").unwrap();
        let envelope = Envelope {
            topic: ROLL_REQUEST_TOPIC.to_owned(),
            payload: serde_json::json!({"action": "rangedAttack"}),
        };
        nutshell_core::channel::BroadcastChannel::publish(table.channel(), envelope)
            .await
            .unwrap();

        assert!(table.pump().await.is_empty());
    }

    #[tokio::test]
    async fn test_damage_and_set_skill_update_the_sheet() {
        let (mut table, _prompt) = table(vec![], vec![]);

        table
            .execute(ConsoleCommand::Damage {
                actor_ref: vale(),
                taken: 4,
            })
            .await;
        let character = table.sheet(&vale()).await.unwrap();
        assert_eq!(character.strikes.remaining, 2);

        table
            .execute(ConsoleCommand::SetSkill {
                actor_ref: vale(),
                skill: SkillKey::Endurance,
                value: 4,
            })
            .await;
        let character = table.sheet(&vale()).await.unwrap();
        assert_eq!(character.strikes.max, 8);
        assert_eq!(character.strikes.remaining, 4);
    }

    #[tokio::test]
    async fn test_sheet_renders_strikes_and_skills() {
        let (mut table, _prompt) = table(vec![], vec![]);

        let lines = table.execute(ConsoleCommand::Sheet(vale())).await;

        let sheet: Vec<&str> = lines[0].lines().collect();
        assert_eq!(sheet[0], "Vale (Actor.vale)  strikes 6/6 taken 0");
        assert_eq!(sheet[1], "  Power Theme   Storm-touched");
        assert_eq!(sheet[2], "  Gear          longbow, hooded cloak");
        assert!(sheet.contains(&"  Ranged Combat +3"));
    }

    #[tokio::test]
    async fn test_sheet_marks_a_character_with_no_strikes_left() {
        let (mut table, _prompt) = table(vec![], vec![]);

        let lines = table
            .execute(ConsoleCommand::Damage {
                actor_ref: vale(),
                taken: 6,
            })
            .await;

        assert!(lines[0].starts_with("Vale (Actor.vale)  strikes 0/6 taken 6  DOWN"));
    }

    #[tokio::test]
    async fn test_sheet_omits_empty_text_fields() {
        let (mut table, _prompt) = table(vec![], vec![]);

        let lines = table
            .execute(ConsoleCommand::Sheet(ActorRef::new("Actor.rook")))
            .await;

        assert!(!lines[0].contains("Power Theme"));
        assert!(!lines[0].contains("Gear"));
    }

    #[tokio::test]
    async fn test_characters_lists_actor_refs() {
        let (mut table, _prompt) = table(vec![], vec![]);

        let lines = table.execute(ConsoleCommand::Characters).await;

        assert_eq!(lines, vec!["Actor.brin", "Actor.rook", "Actor.vale"]);
    }

    #[tokio::test]
    async fn test_unknown_seat_is_reported() {
        let (mut table, _prompt) = table(vec![], vec![]);

        let lines = table.execute(ConsoleCommand::Activate("zed".into())).await;

        assert!(lines[0].contains("validation_error"));
    }
}
