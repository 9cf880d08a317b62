use std::collections::HashSet;

use super::config::ScoringRules;
use super::error::ScoringError;
use super::types::{
    AwardPick, LeaguePicks, MatchScore, Outcome, Participant, Prediction, PredictionScore,
    ScoreSheet,
};

/// Score match predictions against the final result.
///
/// Exact score beats correct direction (home win, draw, away win); the two
/// never stack. Input is assumed to hold at most one prediction per
/// participant; a repeated id keeps the last entry.
pub fn score_match<'a, I>(rules: &ScoringRules, outcome: &MatchScore, predictions: I) -> ScoreSheet
where
    I: IntoIterator<Item = (&'a str, &'a MatchScore)>,
{
    let outcome_direction = outcome.direction();

    predictions
        .into_iter()
        .map(|(participant_id, predicted)| {
            let score = if predicted == outcome {
                PredictionScore {
                    points: rules.exact_score,
                    correct: true,
                }
            } else if predicted.direction() == outcome_direction {
                PredictionScore {
                    points: rules.correct_result,
                    correct: true,
                }
            } else {
                PredictionScore::MISS
            };
            (participant_id.to_string(), score)
        })
        .collect()
}

/// Score league predictions: each of the four picks that matches earns
/// `league_pick` points on its own. `rules` must have passed `validate_rules`,
/// which bounds `league_pick` so four hits fit a `u32`.
pub fn score_league<'a, I>(
    rules: &ScoringRules,
    outcome: &LeaguePicks,
    predictions: I,
) -> ScoreSheet
where
    I: IntoIterator<Item = (&'a str, &'a LeaguePicks)>,
{
    predictions
        .into_iter()
        .map(|(participant_id, predicted)| {
            let hits = [
                (&predicted.champion, &outcome.champion),
                (&predicted.top_scorer, &outcome.top_scorer),
                (&predicted.top_assist, &outcome.top_assist),
                (&predicted.mvp, &outcome.mvp),
            ]
            .into_iter()
            .filter(|(guess, actual)| same_name(guess, actual))
            .count() as u32;

            let points = hits * rules.league_pick;
            (
                participant_id.to_string(),
                PredictionScore {
                    points,
                    correct: points > 0,
                },
            )
        })
        .collect()
}

/// Score award predictions: naming the winner earns `award_winner` points.
pub fn score_award<'a, I>(rules: &ScoringRules, outcome: &AwardPick, predictions: I) -> ScoreSheet
where
    I: IntoIterator<Item = (&'a str, &'a AwardPick)>,
{
    predictions
        .into_iter()
        .map(|(participant_id, predicted)| {
            let points = if same_name(&predicted.winner, &outcome.winner) {
                rules.award_winner
            } else {
                0
            };
            (
                participant_id.to_string(),
                PredictionScore {
                    points,
                    correct: points > 0,
                },
            )
        })
        .collect()
}

/// Score stored predictions of one predictable, picking the scorer from the
/// outcome's variant. Every forecast must have the outcome's shape, and no
/// name pick on either side may be blank.
pub fn score_outcome(
    rules: &ScoringRules,
    outcome: &Outcome,
    predictions: &[Prediction],
) -> Result<ScoreSheet, ScoringError> {
    outcome.check_picks()?;
    let expected = outcome.kind();
    if let Some(bad) = predictions
        .iter()
        .find(|p| p.forecast.kind() != expected)
    {
        return Err(ScoringError::KindMismatch {
            participant_id: bad.participant_id.clone(),
            expected,
            found: bad.forecast.kind(),
        });
    }
    for prediction in predictions {
        prediction.forecast.check_picks()?;
    }

    let sheet = match outcome {
        Outcome::Match(actual) => score_match(
            rules,
            actual,
            predictions.iter().filter_map(|p| match &p.forecast {
                Outcome::Match(s) => Some((p.participant_id.as_str(), s)),
                _ => None,
            }),
        ),
        Outcome::League(actual) => score_league(
            rules,
            actual,
            predictions.iter().filter_map(|p| match &p.forecast {
                Outcome::League(s) => Some((p.participant_id.as_str(), s)),
                _ => None,
            }),
        ),
        Outcome::Award(actual) => score_award(
            rules,
            actual,
            predictions.iter().filter_map(|p| match &p.forecast {
                Outcome::Award(s) => Some((p.participant_id.as_str(), s)),
                _ => None,
            }),
        ),
    };
    Ok(sheet)
}

/// Fold one score sheet into the participant totals.
///
/// Returns the updated set in the same order. Participants without an entry
/// are unchanged. An entry for an id not in `participants` rejects the whole
/// fold, as does a total that would overflow. Not idempotent: applying the
/// same sheet twice counts it twice.
pub fn apply_scoring(
    participants: &[Participant],
    sheet: &ScoreSheet,
) -> Result<Vec<Participant>, ScoringError> {
    let known: HashSet<&str> = participants.iter().map(|p| p.id.as_str()).collect();
    if let Some(unknown) = sheet.keys().find(|id| !known.contains(id.as_str())) {
        return Err(ScoringError::UnknownParticipant(unknown.clone()));
    }

    participants
        .iter()
        .map(|participant| match sheet.get(&participant.id) {
            Some(score) => add_score(participant, score),
            None => Ok(participant.clone()),
        })
        .collect()
}

fn add_score(
    participant: &Participant,
    score: &PredictionScore,
) -> Result<Participant, ScoringError> {
    let overflow = || ScoringError::TotalsOverflow(participant.id.clone());
    let correct = u32::from(score.correct);
    Ok(Participant {
        points: participant.points.checked_add(score.points).ok_or_else(overflow)?,
        predictions_count: participant.predictions_count.checked_add(1).ok_or_else(overflow)?,
        correct_count: participant.correct_count.checked_add(correct).ok_or_else(overflow)?,
        ..participant.clone()
    })
}

/// Case-insensitive name comparison. No trimming or accent folding.
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rules() -> ScoringRules {
        ScoringRules::default()
    }

    fn score_one(outcome: MatchScore, predicted: MatchScore) -> PredictionScore {
        let sheet = score_match(&rules(), &outcome, [("ana", &predicted)]);
        sheet["ana"]
    }

    fn picks(champion: &str, top_scorer: &str, top_assist: &str, mvp: &str) -> LeaguePicks {
        LeaguePicks {
            champion: champion.to_string(),
            top_scorer: top_scorer.to_string(),
            top_assist: top_assist.to_string(),
            mvp: mvp.to_string(),
        }
    }

    fn participant(id: &str, points: u32, predictions: u32, correct: u32) -> Participant {
        Participant {
            id: id.to_string(),
            name: id.to_uppercase(),
            points,
            predictions_count: predictions,
            correct_count: correct,
        }
    }

    fn sheet(entries: &[(&str, u32, bool)]) -> ScoreSheet {
        entries
            .iter()
            .map(|(id, points, correct)| {
                (
                    id.to_string(),
                    PredictionScore {
                        points: *points,
                        correct: *correct,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_match_exact_score() {
        let result = score_one(MatchScore::new(2, 1), MatchScore::new(2, 1));
        assert_eq!(result, PredictionScore { points: 5, correct: true });
    }

    #[test]
    fn test_match_correct_direction() {
        let result = score_one(MatchScore::new(2, 1), MatchScore::new(3, 0));
        assert_eq!(result, PredictionScore { points: 3, correct: true });
    }

    #[test]
    fn test_match_wrong_direction() {
        let result = score_one(MatchScore::new(2, 1), MatchScore::new(1, 2));
        assert_eq!(result, PredictionScore { points: 0, correct: false });
    }

    #[test]
    fn test_match_goalless_draw_vs_score_draw() {
        // Both are draws, so the direction matches even though the score doesn't
        let result = score_one(MatchScore::new(0, 0), MatchScore::new(1, 1));
        assert_eq!(result, PredictionScore { points: 3, correct: true });
    }

    #[test]
    fn test_match_draw_predicted_for_win() {
        let result = score_one(MatchScore::new(1, 0), MatchScore::new(0, 0));
        assert_eq!(result, PredictionScore::MISS);
    }

    #[test]
    fn test_match_points_always_in_allowed_set() {
        for oh in 0..4 {
            for oa in 0..4 {
                let outcome = MatchScore::new(oh, oa);
                for ph in 0..4 {
                    for pa in 0..4 {
                        let predicted = MatchScore::new(ph, pa);
                        let result = score_one(outcome, predicted);
                        assert!([0, 3, 5].contains(&result.points));
                        assert_eq!(result.correct, result.points > 0);
                        if result.points == 5 {
                            assert_eq!(predicted, outcome);
                        }
                        if predicted != outcome && predicted.direction() == outcome.direction() {
                            assert_eq!(result.points, 3);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_match_every_participant_once() {
        let a = MatchScore::new(1, 0);
        let b = MatchScore::new(0, 2);
        let c = MatchScore::new(3, 3);
        let sheet = score_match(
            &rules(),
            &MatchScore::new(1, 0),
            [("ana", &a), ("ben", &b), ("cam", &c)],
        );
        assert_eq!(sheet.len(), 3);
        assert_eq!(sheet["ana"].points, 5);
        assert_eq!(sheet["ben"].points, 0);
        assert_eq!(sheet["cam"].points, 0);
    }

    #[test]
    fn test_match_empty_predictions() {
        let sheet = score_match(&rules(), &MatchScore::new(1, 0), std::iter::empty());
        assert!(sheet.is_empty());
    }

    #[test]
    fn test_match_custom_rules() {
        let custom = ScoringRules {
            exact_score: 10,
            correct_result: 4,
            ..ScoringRules::default()
        };
        let exact = MatchScore::new(2, 2);
        let close = MatchScore::new(0, 0);
        let sheet = score_match(&custom, &MatchScore::new(2, 2), [("ana", &exact), ("ben", &close)]);
        assert_eq!(sheet["ana"].points, 10);
        assert_eq!(sheet["ben"].points, 4);
    }

    #[test]
    fn test_league_champion_only_case_insensitive() {
        let outcome = picks("Real Madrid", "X", "Y", "Z");
        let predicted = picks("real madrid", "A", "B", "C");
        let sheet = score_league(&rules(), &outcome, [("ana", &predicted)]);
        assert_eq!(sheet["ana"], PredictionScore { points: 5, correct: true });
    }

    #[test]
    fn test_league_all_fields() {
        let outcome = picks("Real Madrid", "Mbappe", "Bellingham", "Vinicius");
        let predicted = picks("REAL MADRID", "mbappe", "Bellingham", "vinicius");
        let sheet = score_league(&rules(), &outcome, [("ana", &predicted)]);
        assert_eq!(sheet["ana"].points, 20);
    }

    #[test]
    fn test_league_no_hits() {
        let outcome = picks("Real Madrid", "X", "Y", "Z");
        let predicted = picks("Barcelona", "A", "B", "C");
        let sheet = score_league(&rules(), &outcome, [("ana", &predicted)]);
        assert_eq!(sheet["ana"], PredictionScore::MISS);
    }

    #[test]
    fn test_league_whitespace_not_trimmed() {
        let outcome = picks("Real Madrid", "X", "Y", "Z");
        let predicted = picks("Real Madrid ", "A", "B", "C");
        let sheet = score_league(&rules(), &outcome, [("ana", &predicted)]);
        assert_eq!(sheet["ana"].points, 0);
    }

    #[test]
    fn test_award_case_insensitive_match() {
        let outcome = AwardPick { winner: "Rodri".to_string() };
        let hit = AwardPick { winner: "RODRI".to_string() };
        let miss = AwardPick { winner: "Vinicius".to_string() };
        let sheet = score_award(&rules(), &outcome, [("ana", &hit), ("ben", &miss)]);
        assert_eq!(sheet["ana"], PredictionScore { points: 10, correct: true });
        assert_eq!(sheet["ben"], PredictionScore::MISS);
    }

    #[test]
    fn test_award_accents_not_folded() {
        let outcome = AwardPick { winner: "Modrić".to_string() };
        let predicted = AwardPick { winner: "Modric".to_string() };
        let sheet = score_award(&rules(), &outcome, [("ana", &predicted)]);
        assert_eq!(sheet["ana"].points, 0);
    }

    #[test]
    fn test_score_outcome_dispatches_by_kind() {
        let predictions = vec![Prediction {
            participant_id: "ana".to_string(),
            predictable_id: "ballon-dor".to_string(),
            forecast: Outcome::Award(AwardPick { winner: "rodri".to_string() }),
            submitted_at: Utc::now(),
            points_earned: None,
        }];
        let outcome = Outcome::Award(AwardPick { winner: "Rodri".to_string() });
        let sheet = score_outcome(&rules(), &outcome, &predictions).unwrap();
        assert_eq!(sheet["ana"].points, 10);
    }

    #[test]
    fn test_score_outcome_rejects_mismatched_forecast() {
        let predictions = vec![Prediction {
            participant_id: "ana".to_string(),
            predictable_id: "final".to_string(),
            forecast: Outcome::Award(AwardPick { winner: "Rodri".to_string() }),
            submitted_at: Utc::now(),
            points_earned: None,
        }];
        let outcome = Outcome::Match(MatchScore::new(1, 0));
        let err = score_outcome(&rules(), &outcome, &predictions).unwrap_err();
        assert!(matches!(err, ScoringError::KindMismatch { ref participant_id, .. } if participant_id == "ana"));
    }

    #[test]
    fn test_score_outcome_rejects_blank_pick() {
        let predictions = vec![Prediction {
            participant_id: "ana".to_string(),
            predictable_id: "liga".to_string(),
            forecast: Outcome::League(picks("", "", "", "")),
            submitted_at: Utc::now(),
            points_earned: None,
        }];
        let outcome = Outcome::League(picks("Real Madrid", "Mbappe", "Olmo", "Pedri"));
        let err = score_outcome(&rules(), &outcome, &predictions).unwrap_err();
        assert_eq!(err, ScoringError::MissingField { field: "champion" });

        let blank_outcome = Outcome::League(picks("", "", "", ""));
        assert!(score_outcome(&rules(), &blank_outcome, &[]).is_err());
    }

    #[test]
    fn test_league_largest_valid_pick_fits() {
        let custom = ScoringRules {
            league_pick: crate::scoring::MAX_LEAGUE_PICK,
            ..rules()
        };
        let actual = picks("A", "B", "C", "D");
        let sheet = score_league(&custom, &actual, [("ana", &actual)]);
        assert_eq!(sheet["ana"].points, crate::scoring::MAX_LEAGUE_PICK * 4);
    }

    #[test]
    fn test_apply_scoring_rejects_overflow() {
        let participants = vec![participant("ana", 0, 0, 0), participant("ben", u32::MAX - 2, 9, 9)];
        let result = apply_scoring(&participants, &sheet(&[("ana", 5, true), ("ben", 5, true)]));
        assert_eq!(result, Err(ScoringError::TotalsOverflow("ben".to_string())));

        let at_max = vec![participant("ana", u32::MAX - 5, 1, 1)];
        let updated = apply_scoring(&at_max, &sheet(&[("ana", 5, true)])).unwrap();
        assert_eq!(updated[0].points, u32::MAX);
    }

    #[test]
    fn test_apply_scoring_updates_present_participants() {
        let participants = vec![participant("ana", 0, 0, 0), participant("ben", 10, 4, 2)];
        let updated = apply_scoring(&participants, &sheet(&[("ana", 5, true)])).unwrap();

        assert_eq!(updated[0], participant("ana", 5, 1, 1));
        assert_eq!(updated[1], participants[1]); // No prediction, unchanged
    }

    #[test]
    fn test_apply_scoring_miss_counts_prediction() {
        let participants = vec![participant("ana", 3, 1, 1)];
        let updated = apply_scoring(&participants, &sheet(&[("ana", 0, false)])).unwrap();
        assert_eq!(updated[0], participant("ana", 3, 2, 1));
    }

    #[test]
    fn test_apply_scoring_unknown_participant() {
        let participants = vec![participant("ana", 0, 0, 0)];
        let result = apply_scoring(&participants, &sheet(&[("ana", 5, true), ("zed", 3, true)]));
        assert_eq!(result, Err(ScoringError::UnknownParticipant("zed".to_string())));
    }

    #[test]
    fn test_apply_scoring_empty_sheet() {
        let participants = vec![participant("ana", 7, 3, 2)];
        let updated = apply_scoring(&participants, &ScoreSheet::new()).unwrap();
        assert_eq!(updated, participants);
    }

    #[test]
    fn test_apply_scoring_composes() {
        let participants = vec![participant("ana", 0, 0, 0), participant("ben", 0, 0, 0)];
        let first = sheet(&[("ana", 5, true), ("ben", 0, false)]);
        let second = sheet(&[("ben", 10, true)]);

        let stepwise = apply_scoring(&apply_scoring(&participants, &first).unwrap(), &second).unwrap();
        let reversed = apply_scoring(&apply_scoring(&participants, &second).unwrap(), &first).unwrap();

        assert_eq!(stepwise, reversed);
        assert_eq!(stepwise[0], participant("ana", 5, 1, 1));
        assert_eq!(stepwise[1], participant("ben", 10, 2, 1));
    }

    #[test]
    fn test_apply_scoring_twice_double_counts() {
        let participants = vec![participant("ana", 0, 0, 0)];
        let results = sheet(&[("ana", 5, true)]);
        let once = apply_scoring(&participants, &results).unwrap();
        let twice = apply_scoring(&once, &results).unwrap();
        assert_eq!(twice[0], participant("ana", 10, 2, 2));
    }

    #[test]
    fn test_correct_never_exceeds_predictions() {
        let mut participants = vec![participant("ana", 0, 0, 0), participant("ben", 0, 0, 0)];
        let outcomes = [MatchScore::new(1, 0), MatchScore::new(0, 0), MatchScore::new(2, 3)];
        let ana_guess = MatchScore::new(1, 0);
        let ben_guess = MatchScore::new(2, 2);

        for outcome in &outcomes {
            let results = score_match(&rules(), outcome, [("ana", &ana_guess), ("ben", &ben_guess)]);
            participants = apply_scoring(&participants, &results).unwrap();
            for p in &participants {
                assert!(p.correct_count <= p.predictions_count);
            }
        }
        assert_eq!(participants[0], participant("ana", 5, 3, 1));
        assert_eq!(participants[1], participant("ben", 3, 3, 1));
    }
}
