//! The roll request relayed to the active GM.

use nutshell_character::domain::skills::SkillKey;
use nutshell_core::participant::{ActorRef, ParticipantId};
use nutshell_rules::domain::roll::{RollAction, RollKind};
use serde::{Deserialize, Serialize};

/// A roll request in transit. There is no reply message: the outcome
/// travels only as a chat announcement.
///
/// Wire shape:
/// `{ "action": "skillRoll" | "rangedAttack" | "closeCombatOpposed",
///    "actorRef": string, "skillKey"?: string, "requesterId": string }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    /// Which roll to make.
    pub action: RollAction,
    /// The character to roll for.
    pub actor_ref: ActorRef,
    /// The skill, for generic skill rolls only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_key: Option<SkillKey>,
    /// Who asked.
    pub requester_id: ParticipantId,
}

impl RollRequest {
    /// Builds the request for `kind`.
    #[must_use]
    pub fn new(kind: RollKind, actor_ref: ActorRef, requester_id: ParticipantId) -> Self {
        Self {
            action: kind.action(),
            actor_ref,
            skill_key: kind.skill_key(),
            requester_id,
        }
    }

    /// The roll this request describes, or `None` if it is incomplete.
    #[must_use]
    pub fn kind(&self) -> Option<RollKind> {
        RollKind::from_parts(self.action, self.skill_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn requester() -> ParticipantId {
        ParticipantId::from_uuid(Uuid::nil())
    }

    #[test]
    fn test_skill_roll_wire_shape() {
        let request = RollRequest::new(
            RollKind::Skill(SkillKey::Perception),
            ActorRef::new("Actor.ash"),
            requester(),
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "action": "skillRoll",
                "actorRef": "Actor.ash",
                "skillKey": "perception",
                "requesterId": "00000000-0000-0000-0000-000000000000"
            })
        );
    }

    #[test]
    fn test_attack_wire_shape_omits_skill_key() {
        let request = RollRequest::new(
            RollKind::CloseCombatOpposed,
            ActorRef::new("Actor.ash"),
            requester(),
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "action": "closeCombatOpposed",
                "actorRef": "Actor.ash",
                "requesterId": "00000000-0000-0000-0000-000000000000"
            })
        );
    }

    #[test]
    fn test_kind_round_trips_through_the_wire() {
        for kind in [
            RollKind::Skill(SkillKey::Operate),
            RollKind::RangedAttack,
            RollKind::CloseCombatOpposed,
        ] {
            let request = RollRequest::new(kind, ActorRef::new("a"), requester());
            let json = serde_json::to_string(&request).unwrap();
            let back: RollRequest = serde_json::from_str(&json).unwrap();
            assert_eq!(back.kind(), Some(kind));
        }
    }

    #[test]
    fn test_unknown_action_tag_is_rejected() {
        let parsed = serde_json::from_value::<RollRequest>(serde_json::json!({
            "action": "fireball",
            "actorRef": "Actor.ash",
            "requesterId": "00000000-0000-0000-0000-000000000000"
        }));
        assert!(parsed.is_err());
    }
}
