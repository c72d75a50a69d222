//! Command handlers for the character context.
//!
//! Each handler loads the character, applies the mutation, lets the
//! derived strike envelope refresh, and saves the result.

use nutshell_core::command::Command;
use nutshell_core::error::DomainError;
use tracing::info;

use crate::application::store::CharacterStore;
use crate::domain::aggregates::Character;
use crate::domain::commands::{RecordStrikesTaken, SetSkill};

/// Handles the `SetSkill` command.
///
/// # Errors
///
/// Returns `DomainError::UnknownTarget` if the character does not exist,
/// or any error raised by the store.
pub async fn handle_set_skill(
    command: &SetSkill,
    store: &dyn CharacterStore,
) -> Result<Character, DomainError> {
    let mut character = store
        .load(&command.actor_ref)
        .await?
        .ok_or_else(|| DomainError::UnknownTarget(command.actor_ref.clone()))?;

    character.set_skill(command.skill, command.value);
    store.save(character.clone()).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        actor = %command.actor_ref,
        skill = command.skill.key(),
        value = command.value,
        max_strikes = character.strikes.max,
        "skill updated"
    );
    Ok(character)
}

/// Handles the `RecordStrikesTaken` command.
///
/// # Errors
///
/// Returns `DomainError::UnknownTarget` if the character does not exist,
/// or any error raised by the store.
pub async fn handle_record_strikes_taken(
    command: &RecordStrikesTaken,
    store: &dyn CharacterStore,
) -> Result<Character, DomainError> {
    let mut character = store
        .load(&command.actor_ref)
        .await?
        .ok_or_else(|| DomainError::UnknownTarget(command.actor_ref.clone()))?;

    character.set_strikes_taken(command.taken);
    store.save(character.clone()).await?;

    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        actor = %command.actor_ref,
        taken = character.strikes.taken,
        remaining = character.strikes.remaining,
        "strikes recorded"
    );
    Ok(character)
}

#[cfg(test)]
mod tests {
    use nutshell_core::error::DomainError;
    use nutshell_core::participant::ActorRef;
    use uuid::Uuid;

    use crate::application::command_handlers::{handle_record_strikes_taken, handle_set_skill};
    use crate::application::store::{CharacterStore, InMemoryCharacterStore};
    use crate::domain::aggregates::Character;
    use crate::domain::commands::{RecordStrikesTaken, SetSkill};
    use crate::domain::skills::{SkillKey, Skills};

    fn store_with_brin() -> InMemoryCharacterStore {
        InMemoryCharacterStore::with_characters([Character::new(
            ActorRef::new("Actor.brin"),
            "Brin",
            Skills {
                endurance: 2,
                ..Skills::default()
            },
        )])
    }

    #[tokio::test]
    async fn test_handle_record_strikes_taken_persists_derived_fields() {
        let store = store_with_brin();
        let command = RecordStrikesTaken {
            correlation_id: Uuid::new_v4(),
            actor_ref: ActorRef::new("Actor.brin"),
            taken: 3,
        };

        let updated = handle_record_strikes_taken(&command, &store).await.unwrap();
        assert_eq!(updated.strikes.max, 6);
        assert_eq!(updated.strikes.remaining, 3);

        let reloaded = store
            .load(&ActorRef::new("Actor.brin"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.strikes.taken, 3);
        assert_eq!(reloaded.strikes.remaining, 3);
    }

    #[tokio::test]
    async fn test_handle_record_strikes_taken_clamps_negative_input() {
        let store = store_with_brin();
        let command = RecordStrikesTaken {
            correlation_id: Uuid::new_v4(),
            actor_ref: ActorRef::new("Actor.brin"),
            taken: -2,
        };

        let updated = handle_record_strikes_taken(&command, &store).await.unwrap();
        assert_eq!(updated.strikes.taken, 0);
        assert_eq!(updated.strikes.remaining, 6);
    }

    #[tokio::test]
    async fn test_handle_set_skill_endurance_recomputes_max() {
        let store = store_with_brin();
        let command = SetSkill {
            correlation_id: Uuid::new_v4(),
            actor_ref: ActorRef::new("Actor.brin"),
            skill: SkillKey::Endurance,
            value: -1,
        };

        let updated = handle_set_skill(&command, &store).await.unwrap();
        assert_eq!(updated.strikes.max, 3);
        assert_eq!(updated.strikes.remaining, 3);
    }

    #[tokio::test]
    async fn test_handle_set_skill_unknown_character_returns_error() {
        let store = InMemoryCharacterStore::new();
        let command = SetSkill {
            correlation_id: Uuid::new_v4(),
            actor_ref: ActorRef::new("Actor.ghost"),
            skill: SkillKey::Power,
            value: 1,
        };

        let result = handle_set_skill(&command, &store).await;
        match result.unwrap_err() {
            DomainError::UnknownTarget(actor) => assert_eq!(actor.as_str(), "Actor.ghost"),
            other => panic!("expected UnknownTarget, got {other:?}"),
        }
    }
}
