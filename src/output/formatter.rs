use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::achievements::Achievement;
use crate::scoring::{Outcome, Participant, Prediction, ScoreSheet};
use crate::season::Predictable;
use crate::standings::{accuracy, GlobalStats, Standing};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format points in compact notation (1.5k, 2.3M, 847)
pub fn format_points(points: u32) -> String {
    let points = points as f64;
    let formatted = if points >= 1_000_000.0 {
        format!("{:.1}M", points / 1_000_000.0)
    } else if points >= 1_000.0 {
        format!("{:.1}k", points / 1_000.0)
    } else {
        format!("{:.0}", points)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    formatted.replace(".0M", "M").replace(".0k", "k")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format standings as a table: position, points, name, accuracy.
/// No headers. Podium positions are highlighted when colors are on.
pub fn format_leaderboard(rows: &[Standing], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No participants found.".to_string();
    }

    let term_width = get_terminal_width();

    // Position column: 3 chars ("99."), points: 7 chars, accuracy tail ~20
    let position_width = 3;
    let points_width = 7;
    let separator = "  ";

    rows.iter()
        .map(|row| {
            let p = &row.participant;
            let position_str = format!("{:>2}.", row.position);
            let points_padded = format!("{:>width$}", format_points(p.points), width = points_width);
            let stats = format!(
                "{:>3}% ({}/{})",
                accuracy(p),
                p.correct_count,
                p.predictions_count
            );

            let fixed_width =
                position_width + 1 + points_width + separator.len() * 2 + stats.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_name(&p.name, width - fixed_width),
                Some(_) => truncate_name(&p.name, 20),
                None => p.name.clone(),
            };

            if use_colors {
                let position_str = match row.position {
                    1 => position_str.yellow().bold().to_string(),
                    2 | 3 => position_str.bold().to_string(),
                    _ => position_str.dimmed().to_string(),
                };
                format!(
                    "{} {}{}{}{}{}",
                    position_str,
                    points_padded.bold(),
                    separator,
                    name,
                    separator,
                    stats.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    position_str, points_padded, separator, name, separator, stats
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format standings as tab-separated values for scripting
/// Columns: position, id, name, points, predictions, correct, accuracy
pub fn format_tsv(rows: &[Standing]) -> String {
    rows.iter()
        .map(|row| {
            let p = &row.participant;
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.position,
                p.id,
                p.name,
                p.points,
                p.predictions_count,
                p.correct_count,
                accuracy(p)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the result of finalizing one predictable, best scores first.
pub fn format_score_sheet(
    sheet: &ScoreSheet,
    participants: &[Participant],
    use_colors: bool,
) -> String {
    if sheet.is_empty() {
        return "No predictions to score.".to_string();
    }

    let mut entries: Vec<_> = sheet.iter().collect();
    entries.sort_by(|a, b| b.1.points.cmp(&a.1.points));

    entries
        .into_iter()
        .map(|(id, score)| {
            let name = participants
                .iter()
                .find(|p| &p.id == id)
                .map(|p| p.name.as_str())
                .unwrap_or(id.as_str());
            let points = format!("+{:<3}", score.points);
            let mark = if score.correct { "correct" } else { "miss" };

            if use_colors {
                if score.correct {
                    format!("{} {}  {}", points.green().bold(), name, mark.green())
                } else {
                    format!("{} {}  {}", points.dimmed(), name, mark.red())
                }
            } else {
                format!("{} {}  {}", points, name, mark)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line summary after finalizing. Match results split exact hits from
/// correct results; other kinds report a single correct count.
pub fn format_finalize_summary(
    predictable_id: &str,
    outcome: &Outcome,
    predictions: &[Prediction],
    sheet: &ScoreSheet,
) -> String {
    let correct = sheet.values().filter(|s| s.correct).count();
    match outcome {
        Outcome::Match(_) => {
            let exact = predictions
                .iter()
                .filter(|p| sheet.contains_key(&p.participant_id) && &p.forecast == outcome)
                .count();
            format!(
                "Finalized {}: {} predictions, {} exact, {} correct result",
                predictable_id,
                sheet.len(),
                exact,
                correct.saturating_sub(exact)
            )
        }
        Outcome::League(_) | Outcome::Award(_) => format!(
            "Finalized {}: {} predictions, {} correct",
            predictable_id,
            sheet.len(),
            correct
        ),
    }
}

/// Format a participant's predictions: predictable, forecast, and the points
/// earned once scored.
pub fn format_prediction_history(predictions: &[&Prediction], use_colors: bool) -> String {
    if predictions.is_empty() {
        return "  No predictions yet.".to_string();
    }

    let mut lines = vec!["  History:".to_string()];
    for prediction in predictions {
        let earned = match prediction.points_earned {
            Some(points) => format!("+{}", points),
            None => "pending".to_string(),
        };
        let earned = if use_colors {
            match prediction.points_earned {
                Some(0) => earned.red().to_string(),
                Some(_) => earned.green().to_string(),
                None => earned.dimmed().to_string(),
            }
        } else {
            earned
        };
        lines.push(format!(
            "    {}  {}  {}",
            prediction.predictable_id,
            prediction.forecast.summary(),
            earned
        ));
    }
    lines.join("\n")
}

/// Format one participant with rank, totals and achievement progress
pub fn format_participant_detail(
    participant: &Participant,
    rank: usize,
    total: usize,
    achievements: &[Achievement],
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();

    if use_colors {
        lines.push(format!("{} ({})", participant.name.bold(), participant.id.dimmed()));
    } else {
        lines.push(format!("{} ({})", participant.name, participant.id));
    }
    lines.push(format!("  Rank: #{} of {}", rank, total));
    lines.push(format!("  Points: {}", participant.points));
    lines.push(format!(
        "  Predictions: {} scored, {} correct ({}%)",
        participant.predictions_count,
        participant.correct_count,
        accuracy(participant)
    ));

    if !achievements.is_empty() {
        lines.push("  Achievements:".to_string());
        for achievement in achievements {
            let unlocked = achievement.is_unlocked(participant);
            let marker = if unlocked { "[x]" } else { "[ ]" };
            let progress = format!("{}%", achievement.progress(participant));
            if use_colors && unlocked {
                lines.push(format!("    {} {}", marker.green(), achievement.name.green()));
            } else {
                lines.push(format!("    {} {} {}", marker, achievement.name, progress));
            }
        }
    }

    lines.join("\n")
}

/// Format global statistics for the whole season
pub fn format_global_stats(stats: &GlobalStats) -> String {
    format!(
        "Participants: {}\nPredictions scored: {}\nPoints awarded: {}\nAverage accuracy: {}%",
        stats.total_participants,
        stats.total_predictions,
        stats.total_points,
        stats.average_accuracy
    )
}

/// Format predictables one per line: id, kind, title, status
pub fn format_predictables(
    predictables: &[Predictable],
    now: DateTime<Utc>,
    use_colors: bool,
) -> String {
    if predictables.is_empty() {
        return "Nothing to predict yet.".to_string();
    }

    predictables
        .iter()
        .map(|p| {
            let status = match (&p.outcome, p.deadline) {
                (Some(outcome), _) => format!("finished: {}", outcome.summary()),
                (None, Some(deadline)) if now > deadline => "closed".to_string(),
                (None, Some(deadline)) => format!("open, closes in {}", format_remaining(deadline - now)),
                (None, None) => "open".to_string(),
            };

            if use_colors {
                format!("{} {:<7} {}  {}", p.id.bold(), p.kind.cyan(), p.title, status.dimmed())
            } else {
                format!("{} {:<7} {}  {}", p.id, p.kind, p.title, status)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a short human-readable string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_remaining(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "<1m".to_string()
        }
    }
}
