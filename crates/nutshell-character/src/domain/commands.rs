//! Commands for the character context.

use nutshell_core::command::Command;
use nutshell_core::participant::ActorRef;
use uuid::Uuid;

use super::skills::SkillKey;

/// Command to change one skill modifier.
#[derive(Debug, Clone)]
pub struct SetSkill {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character to change.
    pub actor_ref: ActorRef,
    /// The skill to change.
    pub skill: SkillKey,
    /// The new modifier.
    pub value: i32,
}

impl Command for SetSkill {
    fn command_type(&self) -> &'static str {
        "character.set_skill"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to overwrite the damage-taken counter.
#[derive(Debug, Clone)]
pub struct RecordStrikesTaken {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character that took damage.
    pub actor_ref: ActorRef,
    /// Total strikes now taken. Negative values are clamped to zero.
    pub taken: i32,
}

impl Command for RecordStrikesTaken {
    fn command_type(&self) -> &'static str {
        "character.record_strikes_taken"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
