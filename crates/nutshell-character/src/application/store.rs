//! Character store abstraction and the in-memory implementation used by
//! the host session.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use nutshell_core::error::DomainError;
use nutshell_core::participant::ActorRef;

use crate::domain::aggregates::{Character, recompute};

/// Read/write access to character records.
///
/// Implementations must hand out characters whose derived strike fields
/// are current, so `load` recomputes before returning.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Loads a character, or `None` if the reference does not resolve.
    async fn load(&self, actor_ref: &ActorRef) -> Result<Option<Character>, DomainError>;

    /// Inserts or replaces a character record.
    async fn save(&self, character: Character) -> Result<(), DomainError>;
}

/// Character store held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryCharacterStore {
    characters: RwLock<HashMap<ActorRef, Character>>,
}

impl InMemoryCharacterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `characters`.
    pub fn with_characters(characters: impl IntoIterator<Item = Character>) -> Self {
        let characters = characters
            .into_iter()
            .map(|mut character| {
                recompute(&mut character);
                (character.actor_ref.clone(), character)
            })
            .collect();
        Self {
            characters: RwLock::new(characters),
        }
    }

    /// References of every stored character, sorted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the lock is poisoned.
    pub fn actor_refs(&self) -> Result<Vec<ActorRef>, DomainError> {
        let guard = self
            .characters
            .read()
            .map_err(|e| DomainError::Infrastructure(format!("character store poisoned: {e}")))?;
        let mut refs: Vec<ActorRef> = guard.keys().cloned().collect();
        refs.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        Ok(refs)
    }
}

#[async_trait]
impl CharacterStore for InMemoryCharacterStore {
    async fn load(&self, actor_ref: &ActorRef) -> Result<Option<Character>, DomainError> {
        let guard = self
            .characters
            .read()
            .map_err(|e| DomainError::Infrastructure(format!("character store poisoned: {e}")))?;
        Ok(guard.get(actor_ref).cloned().map(|mut character| {
            recompute(&mut character);
            character
        }))
    }

    async fn save(&self, mut character: Character) -> Result<(), DomainError> {
        recompute(&mut character);
        self.characters
            .write()
            .map_err(|e| DomainError::Infrastructure(format!("character store poisoned: {e}")))?
            .insert(character.actor_ref.clone(), character);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::skills::Skills;
    use crate::domain::strikes::Strikes;

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let store = InMemoryCharacterStore::new();
        let loaded = store.load(&ActorRef::new("Actor.nobody")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_recomputes_stale_fields() {
        let store = InMemoryCharacterStore::new();
        let mut character = Character::new(
            ActorRef::new("Actor.rook"),
            "Rook",
            Skills {
                endurance: 1,
                ..Skills::default()
            },
        );
        character.strikes = Strikes {
            max: 40,
            taken: 2,
            remaining: 40,
        };

        store.save(character).await.unwrap();
        let loaded = store
            .load(&ActorRef::new("Actor.rook"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(loaded.strikes.max, 5);
        assert_eq!(loaded.strikes.remaining, 3);
    }

    #[test]
    fn test_actor_refs_are_sorted() {
        let store = InMemoryCharacterStore::with_characters([
            Character::new(ActorRef::new("b"), "B", Skills::default()),
            Character::new(ActorRef::new("a"), "A", Skills::default()),
        ]);
        let refs = store.actor_refs().unwrap();
        assert_eq!(refs, vec![ActorRef::new("a"), ActorRef::new("b")]);
    }
}
