use crate::modes::{Mode, ModeSelector, ScoreColumns, TieMap};
use crate::records::{MatchMetadata, ScoreRecord};

/// Ranked standings for one request.
#[derive(Debug, Clone)]
pub struct Standings {
    pub mode: Mode,
    pub columns: ScoreColumns,
    pub records: Vec<ScoreRecord>, // Best first, placements set
    pub ties: TieMap,
}

impl Standings {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Other records sharing `login`'s placement (empty if untied)
    pub fn tied_with(&self, login: &str) -> &[ScoreRecord] {
        self.ties.get(login).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records placed within the top `n` placements, ties included
    pub fn podium(&self, n: u32) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter().take_while(move |r| r.placement <= n)
    }
}

/// Rank per-map score lists using the mode named by their metadata.
pub fn rank(score_lists: &[Vec<ScoreRecord>], metadata: &[MatchMetadata]) -> Standings {
    rank_with(&ModeSelector::default(), score_lists, metadata)
}

/// Rank per-map score lists with explicit request options.
///
/// `metadata` should be positionally aligned with `score_lists`.
pub fn rank_with(
    selector: &ModeSelector,
    score_lists: &[Vec<ScoreRecord>],
    metadata: &[MatchMetadata],
) -> Standings {
    let mut strategy = selector.strategy_for(metadata);

    let mut records = strategy.combine(score_lists, metadata);
    strategy.sort(&mut records);
    strategy.update_placements(&mut records);
    let ties = strategy.get_ties(&records);

    Standings {
        mode: strategy.mode(),
        columns: strategy.columns(),
        records,
        ties,
    }
}
