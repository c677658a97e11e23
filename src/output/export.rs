use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::Utc;
use clap::ValueEnum;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::formatter::{format_csv, format_standings_table, format_text_export, format_tsv};
use crate::ranking::Standings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Aligned table for the terminal
    #[default]
    Table,
    /// Tab-separated, no header
    Tsv,
    /// Comma-separated with a header row
    Csv,
    /// Plain table with a title and timestamp
    Text,
}

pub fn render(standings: &Standings, format: ExportFormat, use_colors: bool) -> String {
    match format {
        ExportFormat::Table => format_standings_table(standings, use_colors),
        ExportFormat::Tsv => format_tsv(standings),
        ExportFormat::Csv => format_csv(standings),
        ExportFormat::Text => format_text_export(standings, Utc::now()),
    }
}

/// Write rendered standings to `path` atomically. Readers never observe a
/// half-written file.
pub fn write_export(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    file.write_all(contents.as_bytes())
        .context("Failed to write standings")?;
    if !contents.ends_with('\n') {
        file.write_all(b"\n").context("Failed to write standings")?;
    }
    file.commit()
        .with_context(|| format!("Failed to save standings to {}", path.display()))?;

    Ok(())
}
