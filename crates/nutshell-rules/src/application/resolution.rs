//! Second phase of resolution: the threshold is known, roll and grade.

use nutshell_character::domain::aggregates::Character;
use nutshell_core::rng::DeterministicRng;

use crate::domain::dice::{DiceRoll, roll_total};
use crate::domain::grading::{grade, strikes_for_difference};
use crate::domain::outcome::RollOutcome;
use crate::domain::roll::RollKind;

/// Rolls `kind` for `character` against `target_number`.
///
/// The modifier is the character's skill for the kind. Attacks carry a
/// strike count (zero on failure); generic skill rolls carry none.
pub fn resolve_with(
    kind: RollKind,
    character: &Character,
    target_number: i32,
    rng: &mut dyn DeterministicRng,
) -> RollOutcome {
    let roll = roll_total(character.skill(kind.modifier_skill()), rng);
    outcome_for(kind, roll, target_number)
}

/// Grades an already-rolled set of dice.
#[must_use]
pub fn outcome_for(kind: RollKind, roll: DiceRoll, target_number: i32) -> RollOutcome {
    let graded = grade(roll.total, target_number);
    let strikes = kind.carries_strikes().then(|| {
        if graded.success {
            strikes_for_difference(graded.difference)
        } else {
            0
        }
    });

    RollOutcome {
        title: kind.title(),
        dice_results: roll.dice_results,
        modifier: roll.modifier,
        total: roll.total,
        target_number,
        success: graded.success,
        difference: graded.difference,
        strikes,
    }
}
