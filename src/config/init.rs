use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, save_config, Config, PayoutConfig, RankingConfig};
use crate::modes::TimeAttackRule;

/// Schedule suggested when creating a config
pub const SUGGESTED_SCHEDULE: [u64; 5] = [1000, 700, 500, 400, 300];

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a payout schedule written as "1000, 700, 500" (commas or spaces).
pub fn parse_schedule(input: &str) -> Result<Vec<u64>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>()
                .with_context(|| format!("'{}' is not a whole, non-negative amount", part))
        })
        .collect()
}

fn format_schedule(schedule: &[u64]) -> String {
    schedule
        .iter()
        .map(|amount| amount.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Config written by `init` when no questions are asked
pub fn suggested_config() -> Config {
    Config {
        payouts: PayoutConfig {
            schedule: SUGGESTED_SCHEDULE.to_vec(),
        },
        ..Default::default()
    }
}

/// Create a config file, asking for the payout schedule and TimeAttack rules
/// unless `accept_defaults` is set.
pub fn run_init(path: Option<PathBuf>, accept_defaults: bool, force: bool) -> Result<PathBuf> {
    let config_path = path.unwrap_or_else(get_config_path);

    if config_path.exists() && !force {
        if accept_defaults {
            bail!(
                "Config already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = prompt_yes_no(
            &format!("Config already exists at {}. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            bail!("Aborted, existing config left untouched");
        }
    }

    let config = if accept_defaults {
        suggested_config()
    } else {
        prompt_config()?
    };

    save_config(&config_path, &config)?;
    Ok(config_path)
}

fn prompt_config() -> Result<Config> {
    println!();
    println!("Standings configuration");
    println!("=======================");
    println!();

    println!("Prize amounts are paid by placement; tied players split the pooled amounts.");
    let schedule = loop {
        let input = prompt_with_default("Payout schedule", &format_schedule(&SUGGESTED_SCHEDULE))?;
        match parse_schedule(&input) {
            Ok(schedule) => break schedule,
            Err(e) => println!("  Invalid: {:#}. Try again.", e),
        }
    };

    println!();
    println!("Over several TimeAttack maps, players can be ranked by maps finished first,");
    println!("or charged the author time plus a penalty for every map they skipped.");
    let penalize = prompt_yes_no("Charge a penalty for missing maps?", false)?;
    let mut ranking = RankingConfig::default();
    if penalize {
        ranking.time_attack = TimeAttackRule::AuthorPenalty;
        ranking.author_penalty = loop {
            let input = prompt_with_default("Penalty on top of the author time", "15s")?;
            match humantime::parse_duration(&input) {
                Ok(_) => break input,
                Err(e) => println!("  Invalid: {}. Try again.", e),
            }
        };
    }

    Ok(Config {
        ranking,
        payouts: PayoutConfig { schedule },
        ..Default::default()
    })
}
