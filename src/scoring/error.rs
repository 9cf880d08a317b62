use thiserror::Error;

use super::types::PredictableKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("{field}: missing required value")]
    MissingField { field: &'static str },

    #[error("{field}: expected a non-negative whole number, got '{value}'")]
    InvalidScore { field: &'static str, value: String },

    #[error("unknown participant '{0}'")]
    UnknownParticipant(String),

    #[error("totals for participant '{0}' would overflow")]
    TotalsOverflow(String),

    #[error("participant '{participant_id}' sent a {found} forecast for a {expected} outcome")]
    KindMismatch {
        participant_id: String,
        expected: PredictableKind,
        found: PredictableKind,
    },
}
