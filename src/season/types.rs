use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{
    apply_scoring, score_outcome, Forecast, Outcome, Participant, PredictableKind, Prediction,
    ScoreSheet, ScoringRules,
};

pub const SEASON_VERSION: u32 = 1;

/// Something participants can predict: a match, a league or an award.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictable {
    pub id: String,
    pub title: String,
    pub kind: PredictableKind,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Present once finalized
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

impl Predictable {
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Whether predictions are still accepted at `now`
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        !self.is_finished() && self.deadline.map_or(true, |deadline| now <= deadline)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonState {
    pub version: u32,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub predictables: Vec<Predictable>,
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl Default for SeasonState {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonState {
    /// Create a new empty season with the current version
    pub fn new() -> Self {
        Self {
            version: SEASON_VERSION,
            participants: Vec::new(),
            predictables: Vec::new(),
            predictions: Vec::new(),
        }
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn predictable(&self, id: &str) -> Option<&Predictable> {
        self.predictables.iter().find(|p| p.id == id)
    }

    /// Predictions submitted by one participant, in submission order
    pub fn predictions_by(&self, participant_id: &str) -> Vec<&Prediction> {
        self.predictions
            .iter()
            .filter(|p| p.participant_id == participant_id)
            .collect()
    }

    /// Predictions submitted against one predictable
    pub fn predictions_for(&self, predictable_id: &str) -> Vec<Prediction> {
        self.predictions
            .iter()
            .filter(|p| p.predictable_id == predictable_id)
            .cloned()
            .collect()
    }

    /// Add a new participant. Fails if the id is taken.
    pub fn register(&mut self, id: &str, name: &str) -> Result<&Participant> {
        if self.participant(id).is_some() {
            bail!("Participant '{}' already exists", id);
        }
        self.participants.push(Participant::new(id, name));
        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Fetch a participant, creating a fresh profile on first login.
    /// Returns the profile and whether it was just created.
    pub fn login(&mut self, id: &str, name: Option<&str>) -> (&Participant, bool) {
        if let Some(idx) = self.participants.iter().position(|p| p.id == id) {
            return (&self.participants[idx], false);
        }
        self.participants.push(Participant::new(id, name.unwrap_or(id)));
        (&self.participants[self.participants.len() - 1], true)
    }

    pub fn add_predictable(
        &mut self,
        id: &str,
        title: &str,
        kind: PredictableKind,
        deadline: Option<DateTime<Utc>>,
    ) -> Result<&Predictable> {
        if self.predictable(id).is_some() {
            bail!("Predictable '{}' already exists", id);
        }
        self.predictables.push(Predictable {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            deadline,
            outcome: None,
        });
        Ok(&self.predictables[self.predictables.len() - 1])
    }

    /// Store a participant's forecast, replacing any earlier one for the
    /// same predictable. Returns true when an earlier forecast was replaced.
    pub fn submit_prediction(
        &mut self,
        participant_id: &str,
        predictable_id: &str,
        forecast: Forecast,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if self.participant(participant_id).is_none() {
            bail!("Unknown participant '{}'", participant_id);
        }
        let Some(predictable) = self.predictable(predictable_id) else {
            bail!("Unknown predictable '{}'", predictable_id);
        };
        if predictable.is_finished() {
            bail!("'{}' is already finished", predictable_id);
        }
        if !predictable.is_open(now) {
            bail!("Predictions for '{}' are closed", predictable_id);
        }
        if forecast.kind() != predictable.kind {
            bail!(
                "'{}' is a {}, not a {}",
                predictable_id,
                predictable.kind,
                forecast.kind()
            );
        }

        let prediction = Prediction {
            participant_id: participant_id.to_string(),
            predictable_id: predictable_id.to_string(),
            forecast,
            submitted_at: now,
            points_earned: None,
        };

        match self
            .predictions
            .iter_mut()
            .find(|p| p.participant_id == participant_id && p.predictable_id == predictable_id)
        {
            Some(existing) => {
                *existing = prediction;
                Ok(true)
            }
            None => {
                self.predictions.push(prediction);
                Ok(false)
            }
        }
    }

    /// Close a pending predictable with its outcome and credit the
    /// participants. Nothing changes if any step fails.
    ///
    /// A finished predictable is never scored again.
    pub fn finalize(
        &mut self,
        predictable_id: &str,
        outcome: Outcome,
        rules: &ScoringRules,
    ) -> Result<ScoreSheet> {
        let Some(idx) = self.predictables.iter().position(|p| p.id == predictable_id) else {
            bail!("Unknown predictable '{}'", predictable_id);
        };
        let predictable = &self.predictables[idx];
        if predictable.is_finished() {
            bail!("'{}' is already finished", predictable_id);
        }
        if outcome.kind() != predictable.kind {
            bail!(
                "'{}' is a {}, got a {} result",
                predictable_id,
                predictable.kind,
                outcome.kind()
            );
        }

        let predictions = self.predictions_for(predictable_id);
        let sheet = score_outcome(rules, &outcome, &predictions)?;
        let participants = apply_scoring(&self.participants, &sheet)?;

        self.participants = participants;
        for prediction in self
            .predictions
            .iter_mut()
            .filter(|p| p.predictable_id == predictable_id)
        {
            prediction.points_earned = sheet.get(&prediction.participant_id).map(|s| s.points);
        }
        self.predictables[idx].outcome = Some(outcome);

        Ok(sheet)
    }
}
