//! The eleven named skills and their modifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of one of the eleven skills.
///
/// Serialized in camelCase (`closeCombat`, `rangedCombat`, ...) to match
/// the `skillKey` field of a relayed roll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillKey {
    /// Melee fighting.
    CloseCombat,
    /// Shooting and throwing.
    RangedCombat,
    /// Noticing things.
    Perception,
    /// Living off the land.
    Survival,
    /// Toughness; drives maximum strikes.
    Endurance,
    /// Athletics and agility.
    Fitness,
    /// Talking people round.
    Persuasion,
    /// Trained knowledge.
    Expertise,
    /// The character's power theme.
    Power,
    /// Stealth and trickery.
    Skulduggery,
    /// Vehicles and machinery.
    Operate,
}

impl SkillKey {
    /// Every skill, in sheet order.
    pub const ALL: [Self; 11] = [
        Self::CloseCombat,
        Self::RangedCombat,
        Self::Perception,
        Self::Survival,
        Self::Endurance,
        Self::Fitness,
        Self::Persuasion,
        Self::Expertise,
        Self::Power,
        Self::Skulduggery,
        Self::Operate,
    ];

    /// Wire key, e.g. `closeCombat`.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::CloseCombat => "closeCombat",
            Self::RangedCombat => "rangedCombat",
            Self::Perception => "perception",
            Self::Survival => "survival",
            Self::Endurance => "endurance",
            Self::Fitness => "fitness",
            Self::Persuasion => "persuasion",
            Self::Expertise => "expertise",
            Self::Power => "power",
            Self::Skulduggery => "skulduggery",
            Self::Operate => "operate",
        }
    }

    /// Display label, e.g. `Close Combat`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CloseCombat => "Close Combat",
            Self::RangedCombat => "Ranged Combat",
            Self::Perception => "Perception",
            Self::Survival => "Survival",
            Self::Endurance => "Endurance",
            Self::Fitness => "Fitness",
            Self::Persuasion => "Persuasion",
            Self::Expertise => "Expertise",
            Self::Power => "Power",
            Self::Skulduggery => "Skulduggery",
            Self::Operate => "Operate",
        }
    }
}

impl fmt::Display for SkillKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SkillKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|skill| skill.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown skill: {s}"))
    }
}

/// Skill modifiers. Any integer is allowed, negative included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skills {
    pub close_combat: i32,
    pub ranged_combat: i32,
    pub perception: i32,
    pub survival: i32,
    pub endurance: i32,
    pub fitness: i32,
    pub persuasion: i32,
    pub expertise: i32,
    pub power: i32,
    pub skulduggery: i32,
    pub operate: i32,
}

impl Skills {
    /// Returns the modifier for `skill`.
    #[must_use]
    pub fn get(&self, skill: SkillKey) -> i32 {
        match skill {
            SkillKey::CloseCombat => self.close_combat,
            SkillKey::RangedCombat => self.ranged_combat,
            SkillKey::Perception => self.perception,
            SkillKey::Survival => self.survival,
            SkillKey::Endurance => self.endurance,
            SkillKey::Fitness => self.fitness,
            SkillKey::Persuasion => self.persuasion,
            SkillKey::Expertise => self.expertise,
            SkillKey::Power => self.power,
            SkillKey::Skulduggery => self.skulduggery,
            SkillKey::Operate => self.operate,
        }
    }

    /// Sets the modifier for `skill`.
    pub fn set(&mut self, skill: SkillKey, value: i32) {
        let slot = match skill {
            SkillKey::CloseCombat => &mut self.close_combat,
            SkillKey::RangedCombat => &mut self.ranged_combat,
            SkillKey::Perception => &mut self.perception,
            SkillKey::Survival => &mut self.survival,
            SkillKey::Endurance => &mut self.endurance,
            SkillKey::Fitness => &mut self.fitness,
            SkillKey::Persuasion => &mut self.persuasion,
            SkillKey::Expertise => &mut self.expertise,
            SkillKey::Power => &mut self.power,
            SkillKey::Skulduggery => &mut self.skulduggery,
            SkillKey::Operate => &mut self.operate,
        };
        *slot = value;
    }
}
