use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::achievements::{default_achievements, Achievement};
use crate::scoring::ScoringRules;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the season is stored (defaults to ~/.config/vega-score/season.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringRules>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<Achievement>>,
}

impl Config {
    /// Scoring rules in effect, falling back to the defaults
    pub fn rules(&self) -> ScoringRules {
        self.scoring.unwrap_or_default()
    }

    /// Achievement definitions in effect, falling back to the built-in set
    pub fn achievements(&self) -> Vec<Achievement> {
        self.achievements
            .clone()
            .unwrap_or_else(default_achievements)
    }
}
