use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::modes::{mode_by_name, ModeSelector, TimeAttackRule};

/// Top-level configuration, loaded from `config.yaml`.
///
/// Example YAML:
/// ```yaml
/// ranking:
///   time_attack: author-penalty
///   author_penalty: 15s
/// payouts:
///   schedule: [1000, 700, 500, 400, 300]
/// output:
///   announce_top: 3
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ranking: RankingConfig,
    pub payouts: PayoutConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RankingConfig {
    /// Registered variant name that overrides mode detection (e.g. "cup")
    pub mode: Option<String>,

    /// How multi-map TimeAttack results are combined
    pub time_attack: TimeAttackRule,

    /// Charged on top of the author time for a missing map, e.g. "15s"
    pub author_penalty: String,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            mode: None,
            time_attack: TimeAttackRule::MapsPlayed,
            author_penalty: "15s".to_string(),
        }
    }
}

impl RankingConfig {
    pub fn author_penalty_ms(&self) -> Result<i64> {
        let duration = humantime::parse_duration(self.author_penalty.trim())
            .with_context(|| format!("invalid duration '{}'", self.author_penalty))?;
        i64::try_from(duration.as_millis())
            .with_context(|| format!("duration '{}' is too large", self.author_penalty))
    }

    /// Build the selector for a ranking request. `mode_override` (from the
    /// command line) takes precedence over the configured mode.
    pub fn selector(&self, mode_override: Option<&str>) -> Result<ModeSelector> {
        let forced = match mode_override.or(self.mode.as_deref()) {
            Some(name) => Some(
                mode_by_name(name).with_context(|| format!("unknown ranking mode '{}'", name))?,
            ),
            None => None,
        };
        Ok(ModeSelector {
            forced,
            time_attack_rule: self.time_attack,
            author_penalty_ms: self.author_penalty_ms()?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PayoutConfig {
    /// Amount paid per placement; the first entry goes to placement 1
    pub schedule: Vec<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Placements included in the announcement line
    pub announce_top: u32,

    pub colors: ColorChoice,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            announce_top: 3,
            colors: ColorChoice::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn resolve(self) -> bool {
        match self {
            ColorChoice::Auto => crate::output::should_use_colors(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}
