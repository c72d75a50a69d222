//! Dice engine: 2d6 plus a modifier.

use nutshell_core::rng::DeterministicRng;

/// Dice rolled per check.
pub const DICE_PER_ROLL: usize = 2;

/// Faces on each die.
pub const DIE_SIDES: u32 = 6;

/// Raw dice plus the modifier they were rolled with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    /// Face values, each in `[1, DIE_SIDES]`.
    pub dice_results: Vec<u32>,
    /// Modifier added to the dice.
    pub modifier: i32,
    /// Sum of the dice plus the modifier.
    pub total: i32,
}

impl DiceRoll {
    /// Builds a roll from known face values.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_results(dice_results: Vec<u32>, modifier: i32) -> Self {
        let pips: i32 = dice_results.iter().map(|&face| face as i32).sum();
        Self {
            total: pips.saturating_add(modifier),
            dice_results,
            modifier,
        }
    }
}

/// Draws two independent d6 from `rng` and adds `modifier`.
pub fn roll_total(modifier: i32, rng: &mut dyn DeterministicRng) -> DiceRoll {
    let dice_results = (0..DICE_PER_ROLL)
        .map(|_| rng.next_u32_range(1, DIE_SIDES))
        .collect();
    DiceRoll::from_results(dice_results, modifier)
}
