use std::collections::HashMap;

use super::strategy::{Mode, TieMap};
use crate::records::ScoreRecord;

/// Ascending sort key; equal keys mean a tie.
///
/// Scores are widened before negation, so `i64::MIN` sorts last instead of
/// overflowing.
pub(super) type RankKey = (i128, i128);

pub(super) fn rank_key(mode: Mode, record: &ScoreRecord) -> RankKey {
    let player = i128::from(record.player_score);
    let player2 = i128::from(record.player_score2);
    let team = i128::from(record.team_score);
    match mode {
        Mode::Rounds | Mode::Cup | Mode::Mixed => (-player, 0),
        Mode::TimeAttack => (-i128::from(record.count), player),
        Mode::TimeAttackAuthorPenalty => (player, 0),
        Mode::Laps => (-player2, player),
        Mode::Fallback => (-team, -player),
    }
}

/// Standard competition ranking ("1224"): a record tied with the one before
/// it takes the same placement, otherwise its 1-based position.
pub(super) fn update_placements(mode: Mode, records: &mut [ScoreRecord]) {
    let mut previous: Option<(RankKey, u32)> = None;
    for (i, record) in records.iter_mut().enumerate() {
        let key = rank_key(mode, record);
        record.placement = match previous {
            Some((prev_key, prev_placement)) if prev_key == key => prev_placement,
            _ => i as u32 + 1,
        };
        previous = Some((key, record.placement));
    }
}

/// Group records by placement; only logins with at least one partner appear.
pub(super) fn get_ties(records: &[ScoreRecord]) -> TieMap {
    let mut groups: HashMap<u32, Vec<&ScoreRecord>> = HashMap::new();
    for record in records {
        groups.entry(record.placement).or_default().push(record);
    }

    let mut ties = TieMap::new();
    for group in groups.values().filter(|g| g.len() > 1) {
        for record in group {
            let others = group
                .iter()
                .filter(|other| other.login != record.login)
                .map(|other| (*other).clone())
                .collect();
            ties.insert(record.login.clone(), others);
        }
    }
    ties
}
