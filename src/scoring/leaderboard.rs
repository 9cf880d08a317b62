use super::types::Participant;

/// Order participants by points, highest first.
///
/// The sort is stable and has no secondary key: tied participants keep the
/// order they had in `participants`.
pub fn build_leaderboard(participants: &[Participant]) -> Vec<Participant> {
    let mut board = participants.to_vec();
    board.sort_by(|a, b| b.points.cmp(&a.points));
    board
}

/// 1-based rank of a participant on an already built leaderboard.
/// Tied participants do not share a rank; the earlier one ranks higher.
pub fn rank_of(leaderboard: &[Participant], participant_id: &str) -> Option<usize> {
    leaderboard
        .iter()
        .position(|p| p.id == participant_id)
        .map(|idx| idx + 1)
}
