use std::collections::HashMap;

use super::combine;
use super::placement;
use crate::records::{MatchMetadata, ScoreRecord};

/// Penalty added on top of a map's author time when a player has no time there
pub const DEFAULT_AUTHOR_PENALTY_MS: i64 = 15_000;

/// Login -> the other records sharing that login's placement.
pub type TieMap = HashMap<String, Vec<ScoreRecord>>;

/// Competition modes the engine knows how to rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Rounds,
    TimeAttack,
    TimeAttackAuthorPenalty,
    Laps,
    Cup,
    Fallback,
    Mixed,
}

/// A displayed score column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub is_time: bool,
}

impl Column {
    const fn points(name: &'static str) -> Self {
        Column { name, is_time: false }
    }

    const fn time(name: &'static str) -> Self {
        Column { name, is_time: true }
    }
}

/// Which scores a mode shows, and how. `None` means the score is not relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreColumns {
    pub team: Option<Column>,
    pub primary: Column,
    pub secondary: Option<Column>,
}

impl ScoreColumns {
    /// Stamp the display flags onto a record
    pub fn apply_formats(&self, record: &mut ScoreRecord) {
        record.team_score_is_time = self.team.is_some_and(|c| c.is_time);
        record.player_score_is_time = self.primary.is_time;
        record.player_score2_is_time = self.secondary.is_some_and(|c| c.is_time);
    }
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Rounds => "rounds",
            Mode::TimeAttack => "timeattack",
            Mode::TimeAttackAuthorPenalty => "timeattack-author-penalty",
            Mode::Laps => "laps",
            Mode::Cup => "cup",
            Mode::Fallback => "fallback",
            Mode::Mixed => "mixed",
        }
    }

    pub fn columns(self) -> ScoreColumns {
        match self {
            Mode::Rounds => ScoreColumns {
                team: None,
                primary: Column::points("Points"),
                secondary: None,
            },
            Mode::TimeAttack | Mode::TimeAttackAuthorPenalty => ScoreColumns {
                team: None,
                primary: Column::time("Total time"),
                secondary: None,
            },
            Mode::Laps => ScoreColumns {
                team: None,
                primary: Column::time("Time"),
                secondary: Some(Column::points("Checkpoints")),
            },
            Mode::Cup => ScoreColumns {
                team: None,
                primary: Column::points("Match points"),
                secondary: None,
            },
            Mode::Fallback => ScoreColumns {
                team: Some(Column::points("Team score")),
                primary: Column::points("Score"),
                secondary: None,
            },
            Mode::Mixed => ScoreColumns {
                team: None,
                primary: Column::points("Placement points"),
                secondary: None,
            },
        }
    }

    /// Whether the number of maps played decides the ranking before the score does
    pub fn ranks_by_maps_played(self) -> bool {
        matches!(self, Mode::TimeAttack)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Ranking rules for one request.
///
/// Build a fresh `Strategy` per ranking request: `combine` may hide the team
/// score column for the rest of the request, and that must not leak into
/// other requests.
#[derive(Debug, Clone)]
pub struct Strategy {
    mode: Mode,
    team_score_relevant: bool,
    author_penalty_ms: i64,
}

impl Strategy {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            team_score_relevant: mode.columns().team.is_some(),
            author_penalty_ms: DEFAULT_AUTHOR_PENALTY_MS,
        }
    }

    pub fn with_author_penalty(mut self, penalty_ms: i64) -> Self {
        self.author_penalty_ms = penalty_ms;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn author_penalty_ms(&self) -> i64 {
        self.author_penalty_ms
    }

    /// Columns as they should be displayed for this request
    pub fn columns(&self) -> ScoreColumns {
        let mut columns = self.mode.columns();
        if !self.team_score_relevant {
            columns.team = None;
        }
        columns
    }

    /// Merge one score list per map into one record per player.
    ///
    /// `metadata` is positionally aligned with `score_lists`; it is only read
    /// by the author-penalty and mixed modes.
    pub fn combine(
        &mut self,
        score_lists: &[Vec<ScoreRecord>],
        metadata: &[MatchMetadata],
    ) -> Vec<ScoreRecord> {
        let mut merged = match self.mode {
            Mode::Rounds | Mode::TimeAttack => combine::merge_by_login(score_lists, |acc, rec| {
                acc.player_score = acc.player_score.saturating_add(rec.player_score);
            }),
            Mode::TimeAttackAuthorPenalty => {
                combine::with_author_penalty(score_lists, metadata, self.author_penalty_ms)
            }
            Mode::Laps => combine::merge_by_login(score_lists, |acc, rec| {
                acc.player_score = acc.player_score.saturating_add(rec.player_score);
                acc.player_score2 = acc.player_score2.saturating_add(rec.player_score2);
            }),
            // Cup reports cumulative match points, so summing would double count
            Mode::Cup => combine::merge_by_login(score_lists, |acc, rec| {
                acc.player_score = acc.player_score.max(rec.player_score);
            }),
            Mode::Fallback => {
                let merged = combine::merge_by_login(score_lists, |acc, rec| {
                    acc.team_score = acc.team_score.saturating_add(rec.team_score);
                    acc.player_score = acc.player_score.saturating_add(rec.player_score);
                });
                if merged.iter().all(|r| r.team_score == 0) {
                    self.team_score_relevant = false;
                }
                merged
            }
            Mode::Mixed => combine::by_placement_points(score_lists, metadata),
        };

        let columns = self.columns();
        for record in &mut merged {
            columns.apply_formats(record);
        }
        merged
    }

    /// Order records best first. Stable for records with equal keys.
    pub fn sort(&self, records: &mut [ScoreRecord]) {
        records.sort_by_key(|r| placement::rank_key(self.mode, r));
    }

    /// Assign standard competition ranks to already sorted records
    pub fn update_placements(&self, records: &mut [ScoreRecord]) {
        placement::update_placements(self.mode, records);
    }

    pub fn get_ties(&self, records: &[ScoreRecord]) -> TieMap {
        placement::get_ties(records)
    }
}
