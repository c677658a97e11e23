use super::schema::Config;
use crate::modes::mode_by_name;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref mode) = config.ranking.mode {
        if mode_by_name(mode).is_none() {
            errors.push(format!("ranking.mode: unknown mode '{}'", mode));
        }
    }

    if let Err(e) = config.ranking.author_penalty_ms() {
        errors.push(format!("ranking.author_penalty: {:#}", e));
    }

    if config.output.announce_top == 0 {
        errors.push("output.announce_top: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
