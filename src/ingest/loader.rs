use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::observation::parse_observations;
use crate::records::{MatchMetadata, MedalTimes, ScoreRecord};

/// One map's results as stored in a score file.
#[derive(Debug, Deserialize)]
struct RawMap {
    #[serde(default)]
    map: Option<String>,
    #[serde(default)]
    mode_script: String,
    #[serde(default)]
    medals: Option<MedalTimes>,
    #[serde(default)]
    scores: Vec<serde_json::Value>,
}

/// Score lists and metadata for every loaded map, positionally aligned.
#[derive(Debug, Clone, Default)]
pub struct LoadedMaps {
    pub score_lists: Vec<Vec<ScoreRecord>>,
    pub metadata: Vec<MatchMetadata>,
    pub rejected: usize,
}

impl LoadedMaps {
    pub fn map_count(&self) -> usize {
        self.metadata.len()
    }

    pub fn observation_count(&self) -> usize {
        self.score_lists.iter().map(Vec::len).sum()
    }

    fn push(&mut self, raw: RawMap, source: &str) {
        let metadata = MatchMetadata {
            map: raw.map,
            mode_script: raw.mode_script,
            medals: raw.medals,
        };
        let label = match &metadata.map {
            Some(name) => format!("{} ({})", name, source),
            None => source.to_string(),
        };
        let parsed = parse_observations(&label, raw.scores);
        self.rejected += parsed.rejected;
        self.score_lists.push(parsed.records);
        self.metadata.push(metadata);
    }

    fn extend(&mut self, other: LoadedMaps) {
        self.score_lists.extend(other.score_lists);
        self.metadata.extend(other.metadata);
        self.rejected += other.rejected;
    }
}

/// Parse a score document: either a single map object or an array of them.
///
/// `source` names the document in diagnostics.
pub fn parse_maps(source: &str, json: &str) -> Result<LoadedMaps> {
    let document: serde_json::Value =
        serde_json::from_str(json).with_context(|| format!("Invalid JSON in {}", source))?;

    let maps: Vec<RawMap> = if document.is_array() {
        serde_json::from_value::<Vec<RawMap>>(document)
    } else {
        serde_json::from_value::<RawMap>(document).map(|map| vec![map])
    }
    .with_context(|| format!("Invalid map data in {}", source))?;

    let mut loaded = LoadedMaps::default();
    for raw in maps {
        loaded.push(raw, source);
    }
    Ok(loaded)
}

pub fn load_file(path: &Path) -> Result<LoadedMaps> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read score file at {}", path.display()))?;
    parse_maps(&path.display().to_string(), &content)
}

/// Load every score file in order; maps keep the order they appear in.
pub fn load_files(paths: &[PathBuf]) -> Result<LoadedMaps> {
    let mut loaded = LoadedMaps::default();
    for path in paths {
        loaded.extend(load_file(path)?);
    }
    Ok(loaded)
}
