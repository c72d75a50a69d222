//! The character record as seen by the roll subsystem.

use nutshell_core::participant::ActorRef;
use serde::{Deserialize, Serialize};

use super::skills::{SkillKey, Skills};
use super::strikes::Strikes;

/// A player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Reference used by roll requests to address this character.
    pub actor_ref: ActorRef,
    /// Display name; used as the speaker of announcements.
    pub name: String,
    /// Skill modifiers.
    #[serde(default)]
    pub skills: Skills,
    /// Damage capacity. Derived fields are refreshed by [`recompute`].
    #[serde(default)]
    pub strikes: Strikes,
    /// Free-text power theme from the sheet.
    #[serde(default)]
    pub power_theme: String,
    /// Free-text gear list from the sheet.
    #[serde(default)]
    pub gear: String,
}

impl Character {
    /// Creates a character with no damage taken.
    pub fn new(actor_ref: ActorRef, name: impl Into<String>, skills: Skills) -> Self {
        let mut character = Self {
            actor_ref,
            name: name.into(),
            skills,
            strikes: Strikes::default(),
            power_theme: String::new(),
            gear: String::new(),
        };
        recompute(&mut character);
        character
    }

    /// Fills in the free-text sheet fields.
    #[must_use]
    pub fn with_sheet_text(
        mut self,
        power_theme: impl Into<String>,
        gear: impl Into<String>,
    ) -> Self {
        self.power_theme = power_theme.into();
        self.gear = gear.into();
        self
    }

    /// Returns the modifier for `skill`.
    #[must_use]
    pub fn skill(&self, skill: SkillKey) -> i32 {
        self.skills.get(skill)
    }

    /// Sets a skill modifier and refreshes the strike envelope.
    pub fn set_skill(&mut self, skill: SkillKey, value: i32) {
        self.skills.set(skill, value);
        recompute(self);
    }

    /// Overwrites the damage-taken counter and refreshes the envelope.
    pub fn set_strikes_taken(&mut self, taken: i32) {
        self.strikes.taken = taken;
        recompute(self);
    }
}

/// Refreshes `strikes.max` and `strikes.remaining` from the character's
/// endurance and damage taken. Must run after any change to either and
/// before either derived field is read.
pub fn recompute(character: &mut Character) {
    character.strikes.recompute(character.skills.endurance);
}
