//! The roll trigger command.

use nutshell_core::command::Command;
use nutshell_core::participant::ActorRef;
use nutshell_rules::domain::roll::RollKind;
use uuid::Uuid;

/// Command to roll for a character, issued from the UI layer.
#[derive(Debug, Clone)]
pub struct TriggerRoll {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character to roll for.
    pub actor_ref: ActorRef,
    /// Which roll.
    pub kind: RollKind,
}

impl TriggerRoll {
    /// Creates a trigger with a fresh correlation id.
    #[must_use]
    pub fn new(kind: RollKind, actor_ref: ActorRef) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            actor_ref,
            kind,
        }
    }
}

impl Command for TriggerRoll {
    fn command_type(&self) -> &'static str {
        match self.kind {
            RollKind::Skill(_) => "rules.skill_roll",
            RollKind::RangedAttack => "rules.ranged_attack",
            RollKind::CloseCombatOpposed => "rules.close_combat_opposed",
        }
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
