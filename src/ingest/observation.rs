use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::buffered_eprintln;
use crate::records::ScoreRecord;

/// A score entry as reported by the game server.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    pub login: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub country: String,
    pub score: i64,
    #[serde(default)]
    pub score2: i64,
    #[serde(default)]
    pub team: Option<RawTeam>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: i64,
}

impl RawObservation {
    pub fn into_record(self) -> Result<ScoreRecord> {
        let login = self.login.trim().to_string();
        if login.is_empty() {
            bail!("login is empty");
        }

        let nickname = self.nickname.unwrap_or_else(|| login.clone());
        let mut record = ScoreRecord::new(login, nickname, self.country)
            .with_score(self.score)
            .with_score2(self.score2);
        if let Some(team) = self.team {
            record = record.with_team(team.id, team.name, team.score);
        }
        Ok(record)
    }
}

/// Records parsed from one map, plus how many entries were thrown away.
#[derive(Debug, Clone, Default)]
pub struct ParsedScores {
    pub records: Vec<ScoreRecord>,
    pub rejected: usize,
}

fn parse_entry(entry: serde_json::Value) -> Result<ScoreRecord> {
    let raw: RawObservation = serde_json::from_value(entry).context("malformed score entry")?;
    raw.into_record()
}

/// Convert raw score entries one by one. A broken entry only drops that
/// player's contribution; it is reported and the rest of the map is kept.
pub fn parse_observations(map_label: &str, entries: Vec<serde_json::Value>) -> ParsedScores {
    let mut parsed = ParsedScores::default();

    for (i, entry) in entries.into_iter().enumerate() {
        let login = entry
            .get("login")
            .and_then(|l| l.as_str())
            .unwrap_or("?")
            .to_string();

        match parse_entry(entry) {
            Ok(record) => parsed.records.push(record),
            Err(e) => {
                buffered_eprintln!(
                    "Warning: skipping score #{} ({}) on {}: {:#}",
                    i + 1,
                    login,
                    map_label,
                    e
                );
                parsed.rejected += 1;
            }
        }
    }

    parsed
}
