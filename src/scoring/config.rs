use serde::{Deserialize, Serialize};

/// Point values used when scoring finalized predictables.
///
/// Every field is optional in YAML; missing fields fall back to the defaults.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   exact_score: 5
///   correct_result: 3
///   league_pick: 5
///   award_winner: 10
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringRules {
    /// Match prediction with both scores right
    pub exact_score: u32,

    /// Match prediction with the right winner (or draw) but not the exact score
    pub correct_result: u32,

    /// Each of the four league picks (champion, top scorer, top assist, MVP)
    pub league_pick: u32,

    /// Award prediction naming the winner
    pub award_winner: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            exact_score: 5,
            correct_result: 3,
            league_pick: 5,
            award_winner: 10,
        }
    }
}
