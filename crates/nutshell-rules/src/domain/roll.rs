//! The three roll actions and what each one needs.

use nutshell_character::domain::skills::SkillKey;
use nutshell_core::prompt::ThresholdRequest;
use serde::{Deserialize, Serialize};

/// Wire tag naming a roll action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RollAction {
    /// Generic skill check against a GM-chosen target number.
    SkillRoll,
    /// Ranged attack against a free-form target number.
    RangedAttack,
    /// Close combat against the defender's total.
    CloseCombatOpposed,
}

impl RollAction {
    /// Wire tag, e.g. `rangedAttack`.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::SkillRoll => "skillRoll",
            Self::RangedAttack => "rangedAttack",
            Self::CloseCombatOpposed => "closeCombatOpposed",
        }
    }
}

/// A fully specified roll: the action plus its skill when it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RollKind {
    /// Generic skill roll.
    Skill(SkillKey),
    /// Ranged attack, rolled with `rangedCombat`.
    RangedAttack,
    /// Close combat, rolled with `closeCombat`.
    CloseCombatOpposed,
}

impl RollKind {
    /// Reassembles a kind from a wire tag and optional skill key. A skill
    /// roll without a skill key is incomplete and yields `None`; a stray
    /// skill key on the other actions is ignored.
    #[must_use]
    pub fn from_parts(action: RollAction, skill_key: Option<SkillKey>) -> Option<Self> {
        match action {
            RollAction::SkillRoll => skill_key.map(Self::Skill),
            RollAction::RangedAttack => Some(Self::RangedAttack),
            RollAction::CloseCombatOpposed => Some(Self::CloseCombatOpposed),
        }
    }

    /// The wire tag for this kind.
    #[must_use]
    pub fn action(self) -> RollAction {
        match self {
            Self::Skill(_) => RollAction::SkillRoll,
            Self::RangedAttack => RollAction::RangedAttack,
            Self::CloseCombatOpposed => RollAction::CloseCombatOpposed,
        }
    }

    /// The `skillKey` carried on the wire (generic skill rolls only).
    #[must_use]
    pub fn skill_key(self) -> Option<SkillKey> {
        match self {
            Self::Skill(skill) => Some(skill),
            Self::RangedAttack | Self::CloseCombatOpposed => None,
        }
    }

    /// The skill whose modifier is added to the dice.
    #[must_use]
    pub fn modifier_skill(self) -> SkillKey {
        match self {
            Self::Skill(skill) => skill,
            Self::RangedAttack => SkillKey::RangedCombat,
            Self::CloseCombatOpposed => SkillKey::CloseCombat,
        }
    }

    /// Chat card and prompt title.
    #[must_use]
    pub fn title(self) -> String {
        match self {
            Self::Skill(skill) => format!("{} Roll", skill.label()),
            Self::RangedAttack => "Ranged Attack".to_owned(),
            Self::CloseCombatOpposed => "Close Combat Opposed".to_owned(),
        }
    }

    /// Whether the outcome carries a strike count. Generic skill rolls never do.
    #[must_use]
    pub fn carries_strikes(self) -> bool {
        !matches!(self, Self::Skill(_))
    }

    /// The prompt the resolving GM answers before the dice are rolled.
    #[must_use]
    pub fn threshold_request(self) -> ThresholdRequest {
        match self {
            Self::Skill(_) => ThresholdRequest::skill_target(self.title()),
            Self::RangedAttack => ThresholdRequest::number(self.title(), "Target Number"),
            Self::CloseCombatOpposed => ThresholdRequest::number(self.title(), "Defender Total"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_tags_match_wire_names() {
        for action in [
            RollAction::SkillRoll,
            RollAction::RangedAttack,
            RollAction::CloseCombatOpposed,
        ] {
            let json = serde_json::to_value(action).unwrap();
            assert_eq!(json, serde_json::json!(action.tag()));
        }
    }

    #[test]
    fn test_skill_roll_without_key_is_incomplete() {
        assert_eq!(RollKind::from_parts(RollAction::SkillRoll, None), None);
        assert_eq!(
            RollKind::from_parts(RollAction::SkillRoll, Some(SkillKey::Survival)),
            Some(RollKind::Skill(SkillKey::Survival))
        );
    }

    #[test]
    fn test_attack_kinds_ignore_stray_skill_key() {
        assert_eq!(
            RollKind::from_parts(RollAction::RangedAttack, Some(SkillKey::Power)),
            Some(RollKind::RangedAttack)
        );
    }

    #[test]
    fn test_modifier_skill_per_kind() {
        assert_eq!(RollKind::RangedAttack.modifier_skill(), SkillKey::RangedCombat);
        assert_eq!(RollKind::CloseCombatOpposed.modifier_skill(), SkillKey::CloseCombat);
        assert_eq!(RollKind::Skill(SkillKey::Fitness).modifier_skill(), SkillKey::Fitness);
    }

    #[test]
    fn test_titles() {
        assert_eq!(RollKind::Skill(SkillKey::CloseCombat).title(), "Close Combat Roll");
        assert_eq!(RollKind::RangedAttack.title(), "Ranged Attack");
        assert_eq!(RollKind::CloseCombatOpposed.title(), "Close Combat Opposed");
    }

    #[test]
    fn test_threshold_requests() {
        match RollKind::Skill(SkillKey::Perception).threshold_request() {
            ThresholdRequest::Choice { options, default, .. } => {
                assert_eq!(options, vec![4, 6, 8, 10, 12, 14]);
                assert_eq!(default, 8);
            }
            other @ ThresholdRequest::Number { .. } => panic!("expected Choice, got {other:?}"),
        }
        assert_eq!(
            RollKind::CloseCombatOpposed.threshold_request().label(),
            "Defender Total"
        );
        assert_eq!(RollKind::RangedAttack.threshold_request().label(), "Target Number");
    }

    #[test]
    fn test_only_attacks_carry_strikes() {
        assert!(!RollKind::Skill(SkillKey::Power).carries_strikes());
        assert!(RollKind::RangedAttack.carries_strikes());
        assert!(RollKind::CloseCombatOpposed.carries_strikes());
    }
}
