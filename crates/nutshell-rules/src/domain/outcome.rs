//! The result of one resolved roll.

use serde::{Deserialize, Serialize};

/// Ephemeral result of one resolution. Published once, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollOutcome {
    /// Card title, e.g. `Ranged Attack`.
    pub title: String,
    /// Face values of the two dice.
    pub dice_results: Vec<u32>,
    /// Skill modifier added to the dice.
    pub modifier: i32,
    /// Dice plus modifier.
    pub total: i32,
    /// Threshold supplied by the resolving GM.
    pub target_number: i32,
    /// `difference >= 0`.
    pub success: bool,
    /// `total - target_number`.
    pub difference: i32,
    /// Strikes dealt. Absent for generic skill rolls; zero on a failed attack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikes: Option<u32>,
}
