use serde::{Deserialize, Serialize};

use super::strategy::{Mode, Strategy, DEFAULT_AUTHOR_PENALTY_MS};
use crate::records::MatchMetadata;

/// Mode-script keywords, in match priority order.
const KEYWORDS: &[(&str, Mode)] = &[
    ("timeattack", Mode::TimeAttack),
    ("laps", Mode::Laps),
    ("rounds", Mode::Rounds),
    ("cup", Mode::Cup),
];

/// Every variant, by registered name.
pub const VARIANTS: &[(&str, Mode)] = &[
    ("rounds", Mode::Rounds),
    ("timeattack", Mode::TimeAttack),
    ("timeattack-author-penalty", Mode::TimeAttackAuthorPenalty),
    ("laps", Mode::Laps),
    ("cup", Mode::Cup),
    ("fallback", Mode::Fallback),
    ("mixed", Mode::Mixed),
];

/// Pick the mode for a single mode-script name.
///
/// Case-insensitive substring match against the known keywords, so
/// `Trackmania/TM_TimeAttack_Online.Script.txt` selects TimeAttack.
/// Unknown names fall back to [`Mode::Fallback`].
pub fn select(mode_script: &str) -> Mode {
    let name = mode_script.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|&(_, mode)| mode)
        .unwrap_or(Mode::Fallback)
}

/// Pick the mode for a set of maps. More than one distinct mode script means
/// the maps can only be compared by placement, so that is always Mixed.
pub fn select_many<S: AsRef<str>>(mode_scripts: &[S]) -> Mode {
    let mut distinct: Vec<&str> = Vec::new();
    for name in mode_scripts {
        let name = name.as_ref();
        if !distinct.contains(&name) {
            distinct.push(name);
        }
    }

    match distinct.as_slice() {
        [] => Mode::Fallback,
        [single] => select(single),
        _ => Mode::Mixed,
    }
}

/// Look up a variant by its registered name (case-insensitive, exact)
pub fn mode_by_name(name: &str) -> Option<Mode> {
    let name = name.trim();
    VARIANTS
        .iter()
        .find(|(registered, _)| registered.eq_ignore_ascii_case(name))
        .map(|&(_, mode)| mode)
}

/// How multi-map TimeAttack results are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeAttackRule {
    /// More maps finished ranks first, then lower total time
    #[default]
    MapsPlayed,
    /// Missing maps cost the author time plus a penalty
    AuthorPenalty,
}

/// Request options that turn match metadata into a [`Strategy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSelector {
    pub forced: Option<Mode>,
    pub time_attack_rule: TimeAttackRule,
    pub author_penalty_ms: i64,
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self {
            forced: None,
            time_attack_rule: TimeAttackRule::default(),
            author_penalty_ms: DEFAULT_AUTHOR_PENALTY_MS,
        }
    }
}

impl ModeSelector {
    pub fn resolve(&self, metadata: &[MatchMetadata]) -> Mode {
        if let Some(mode) = self.forced {
            return mode;
        }
        let names: Vec<&str> = metadata.iter().map(|m| m.mode_script.as_str()).collect();
        match (select_many(&names), self.time_attack_rule) {
            (Mode::TimeAttack, TimeAttackRule::AuthorPenalty) => Mode::TimeAttackAuthorPenalty,
            (mode, _) => mode,
        }
    }

    /// A fresh strategy for one ranking request
    pub fn strategy_for(&self, metadata: &[MatchMetadata]) -> Strategy {
        Strategy::new(self.resolve(metadata)).with_author_penalty(self.author_penalty_ms)
    }
}
