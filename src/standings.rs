use clap::ValueEnum;
use serde::Serialize;

use crate::scoring::{build_leaderboard, Participant};

/// Column a standings table is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortKey {
    #[default]
    Points,
    Accuracy,
    Predictions,
}

/// A participant together with their place on the points leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub position: usize,
    pub participant: Participant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalStats {
    pub total_participants: usize,
    pub total_predictions: u64,
    pub total_points: u64,
    pub average_accuracy: u32,
}

/// Share of correct predictions as a whole percentage (0 with no predictions)
pub fn accuracy(participant: &Participant) -> u32 {
    if participant.predictions_count == 0 {
        return 0;
    }
    let ratio = participant.correct_count as f64 / participant.predictions_count as f64;
    (ratio * 100.0).round() as u32
}

fn accuracy_ratio(participant: &Participant) -> f64 {
    if participant.predictions_count == 0 {
        0.0
    } else {
        participant.correct_count as f64 / participant.predictions_count as f64
    }
}

/// Build the standings table.
///
/// Positions always come from the points leaderboard, so a participant keeps
/// their rank when the table is re-sorted, searched or cut to the top N.
/// `top` keeps the first N rows left after the search, before re-sorting.
pub fn standings(
    participants: &[Participant],
    sort: SortKey,
    search: Option<&str>,
    top: Option<usize>,
) -> Vec<Standing> {
    let board = build_leaderboard(participants);
    let limit = top.unwrap_or(board.len());
    let needle = search.map(str::to_lowercase);

    let mut rows: Vec<Standing> = board
        .into_iter()
        .enumerate()
        .map(|(idx, participant)| Standing {
            position: idx + 1,
            participant,
        })
        .filter(|row| match &needle {
            Some(needle) => row.participant.name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .take(limit)
        .collect();

    // Stable sorts over the points order, so ties fall back to points rank
    match sort {
        SortKey::Points => {}
        SortKey::Accuracy => rows.sort_by(|a, b| {
            accuracy_ratio(&b.participant)
                .partial_cmp(&accuracy_ratio(&a.participant))
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::Predictions => rows.sort_by(|a, b| {
            b.participant
                .predictions_count
                .cmp(&a.participant.predictions_count)
        }),
    }

    rows
}

pub fn global_stats(participants: &[Participant]) -> GlobalStats {
    if participants.is_empty() {
        return GlobalStats::default();
    }

    let total_predictions = participants
        .iter()
        .map(|p| p.predictions_count as u64)
        .sum();
    let total_points = participants.iter().map(|p| p.points as u64).sum();
    let accuracy_sum: f64 = participants.iter().map(|p| accuracy_ratio(p) * 100.0).sum();

    GlobalStats {
        total_participants: participants.len(),
        total_predictions,
        total_points,
        average_accuracy: (accuracy_sum / participants.len() as f64).round() as u32,
    }
}
