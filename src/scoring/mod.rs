pub mod config;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod types;
pub mod validation;

pub use config::ScoringRules;
pub use engine::{apply_scoring, score_award, score_league, score_match, score_outcome};
pub use error::ScoringError;
pub use leaderboard::{build_leaderboard, rank_of};
pub use types::*;
pub use validation::{parse_score, require_pick, validate_rules, MAX_LEAGUE_PICK};
