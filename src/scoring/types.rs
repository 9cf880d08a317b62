use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A registered player and their running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub predictions_count: u32,
    #[serde(default)]
    pub correct_count: u32,
}

impl Participant {
    /// New participant with all counters at zero
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            points: 0,
            predictions_count: 0,
            correct_count: 0,
        }
    }
}

/// Final (or forecast) goals for a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub home: u32,
    pub away: u32,
}

impl MatchScore {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// -1 for an away win, 0 for a draw, 1 for a home win
    pub fn direction(&self) -> i8 {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        }
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// Number of independently scored picks in a league prediction.
pub const LEAGUE_FIELDS: u32 = 4;

/// End-of-season picks for a league.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaguePicks {
    pub champion: String,
    pub top_scorer: String,
    pub top_assist: String,
    pub mvp: String,
}

/// Winner of an individual award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardPick {
    pub winner: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictableKind {
    Match,
    League,
    Award,
}

impl fmt::Display for PredictableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PredictableKind::Match => "match",
            PredictableKind::League => "league",
            PredictableKind::Award => "award",
        };
        f.pad(s)
    }
}

/// Ground truth attached to a predictable when it is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome {
    Match(MatchScore),
    League(LeaguePicks),
    Award(AwardPick),
}

/// A forecast has exactly the shape of the outcome it targets.
pub type Forecast = Outcome;

impl Outcome {
    pub fn kind(&self) -> PredictableKind {
        match self {
            Outcome::Match(_) => PredictableKind::Match,
            Outcome::League(_) => PredictableKind::League,
            Outcome::Award(_) => PredictableKind::Award,
        }
    }

    /// One-line summary, e.g. "2-1" or "champion: Real Madrid, ..."
    pub fn summary(&self) -> String {
        match self {
            Outcome::Match(score) => score.to_string(),
            Outcome::League(picks) => format!(
                "champion: {}, top scorer: {}, top assist: {}, mvp: {}",
                picks.champion, picks.top_scorer, picks.top_assist, picks.mvp
            ),
            Outcome::Award(pick) => format!("winner: {}", pick.winner),
        }
    }
}

/// A participant's forecast against one predictable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub participant_id: String,
    pub predictable_id: String,
    pub forecast: Forecast,
    pub submitted_at: DateTime<Utc>,
    /// Set once the predictable has been finalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_earned: Option<u32>,
}

/// Points and correctness for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionScore {
    pub points: u32,
    pub correct: bool,
}

impl PredictionScore {
    pub const MISS: PredictionScore = PredictionScore {
        points: 0,
        correct: false,
    };
}

/// Per-participant results for a single finalized predictable.
pub type ScoreSheet = BTreeMap<String, PredictionScore>;
