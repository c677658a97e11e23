use serde::{Deserialize, Serialize};

/// Team id carried by players that are not on a team.
pub const NO_TEAM: i32 = -1;

/// One player's score, either for a single map or aggregated over several.
///
/// What `player_score` and `player_score2` mean (milliseconds or points) is
/// decided by the active mode, never by the record. The `*_is_time` flags only
/// drive display formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub login: String,
    pub nickname: String,
    pub country: String,
    pub team_id: i32,
    pub team_name: String,
    pub team_score: i64,
    pub player_score: i64,
    pub player_score2: i64,
    pub team_score_is_time: bool,
    pub player_score_is_time: bool,
    pub player_score2_is_time: bool,
    pub count: u32,     // Maps contributing to this record
    pub placement: u32, // 0 until placements are computed
}

impl ScoreRecord {
    pub fn new(login: impl Into<String>, nickname: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            nickname: nickname.into(),
            country: country.into(),
            team_id: NO_TEAM,
            team_name: String::new(),
            team_score: 0,
            player_score: 0,
            player_score2: 0,
            team_score_is_time: false,
            player_score_is_time: false,
            player_score2_is_time: false,
            count: 1,
            placement: 0,
        }
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.player_score = score;
        self
    }

    pub fn with_score2(mut self, score2: i64) -> Self {
        self.player_score2 = score2;
        self
    }

    pub fn with_team(mut self, id: i32, name: impl Into<String>, score: i64) -> Self {
        self.team_id = id;
        self.team_name = name.into();
        self.team_score = score;
        self
    }

    pub fn has_team(&self) -> bool {
        self.team_id != NO_TEAM
    }
}

/// Medal thresholds for a map, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalTimes {
    pub author: i64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub silver: i64,
    #[serde(default)]
    pub bronze: i64,
}

/// Per-map context needed when several maps are combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchMetadata {
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub mode_script: String,
    #[serde(default)]
    pub medals: Option<MedalTimes>,
}

impl MatchMetadata {
    pub fn new(mode_script: impl Into<String>) -> Self {
        Self {
            map: None,
            mode_script: mode_script.into(),
            medals: None,
        }
    }

    pub fn with_medals(mut self, medals: MedalTimes) -> Self {
        self.medals = Some(medals);
        self
    }

    pub fn author_time(&self) -> Option<i64> {
        self.medals.map(|m| m.author)
    }

    /// Label used in diagnostics: the map name if known, else the mode script
    pub fn label(&self) -> &str {
        self.map.as_deref().unwrap_or(&self.mode_script)
    }
}

/// A ranked record and the amount it is owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoutAssignment {
    pub record: ScoreRecord,
    pub amount: u64,
}
