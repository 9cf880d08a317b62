use serde::{Deserialize, Serialize};

use crate::scoring::Participant;

/// Participant statistic an achievement is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requirement {
    Points,
    Predictions,
    Correct,
}

/// A badge unlocked once a participant statistic reaches `value`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub requirement: Requirement,
    pub value: u32,
}

impl Achievement {
    fn current(&self, participant: &Participant) -> u32 {
        match self.requirement {
            Requirement::Points => participant.points,
            Requirement::Predictions => participant.predictions_count,
            Requirement::Correct => participant.correct_count,
        }
    }

    pub fn is_unlocked(&self, participant: &Participant) -> bool {
        self.current(participant) >= self.value
    }

    /// Progress toward the threshold as a percentage, capped at 100
    pub fn progress(&self, participant: &Participant) -> u32 {
        if self.value == 0 {
            return 100;
        }
        let pct = self.current(participant) as u64 * 100 / self.value as u64;
        pct.min(100) as u32
    }
}

/// Achievements shipped when the config file defines none.
pub fn default_achievements() -> Vec<Achievement> {
    vec![
        Achievement {
            id: "first-whistle".to_string(),
            name: "First Whistle".to_string(),
            description: Some("Have a prediction scored".to_string()),
            requirement: Requirement::Predictions,
            value: 1,
        },
        Achievement {
            id: "sharpshooter".to_string(),
            name: "Sharpshooter".to_string(),
            description: Some("Get 10 predictions right".to_string()),
            requirement: Requirement::Correct,
            value: 10,
        },
        Achievement {
            id: "century".to_string(),
            name: "Century".to_string(),
            description: Some("Reach 100 points".to_string()),
            requirement: Requirement::Points,
            value: 100,
        },
    ]
}

/// Achievements the participant qualifies for that are not yet in `unlocked`,
/// in definition order.
pub fn newly_unlocked<'a>(
    achievements: &'a [Achievement],
    participant: &Participant,
    unlocked: &[String],
) -> Vec<&'a Achievement> {
    achievements
        .iter()
        .filter(|a| !unlocked.contains(&a.id) && a.is_unlocked(participant))
        .collect()
}
