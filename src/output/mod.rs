pub mod formatter;

pub use formatter::{
    format_finalize_summary, format_global_stats, format_leaderboard, format_participant_detail,
    format_points, format_prediction_history, format_predictables, format_remaining,
    format_score_sheet, format_tsv, should_use_colors,
};
