use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::modes::{Column, VARIANTS};
use crate::ranking::Standings;
use crate::records::{PayoutAssignment, ScoreRecord};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format milliseconds the way race clocks show them: "0:41.890", "1:02:03.004"
pub fn format_time(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{}{}:{:02}:{:02}.{:03}", sign, hours, mins, secs, millis)
    } else {
        format!("{}{}:{:02}.{:03}", sign, mins, secs, millis)
    }
}

pub fn format_value(value: i64, is_time: bool) -> String {
    if is_time {
        format_time(value)
    } else {
        value.to_string()
    }
}

/// Remove `$` formatting codes from an in-game nickname.
///
/// Handles colors (`$f00`), single-letter styles (`$o`, `$i`, `$z`, ...),
/// links (`$l[url]text$l`) and the `$$` escape.
pub fn strip_styles(nickname: &str) -> String {
    let mut out = String::with_capacity(nickname.len());
    let mut chars = nickname.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('$') => out.push('$'),
            Some(h) if h.is_ascii_hexdigit() => {
                // Colors take up to three hex digits
                for _ in 0..2 {
                    if chars.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        chars.next();
                    }
                }
            }
            Some('l' | 'L' | 'h' | 'H' | 'p' | 'P') => {
                if chars.peek() == Some(&'[') {
                    for skipped in chars.by_ref() {
                        if skipped == ']' {
                            break;
                        }
                    }
                }
            }
            // Any other code letter is a style toggle
            Some(_) | None => {}
        }
    }

    out.trim().to_string()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", " ".repeat(width.saturating_sub(len)), s)
}

/// "3." for a clear placement, "=3." when shared
fn placement_label(standings: &Standings, record: &ScoreRecord) -> String {
    if standings.tied_with(&record.login).is_empty() {
        format!("{}.", record.placement)
    } else {
        format!("={}.", record.placement)
    }
}

/// Score columns shown for a set of standings, each with how to read it
fn score_cells(standings: &Standings, record: &ScoreRecord) -> Vec<(Column, String)> {
    let columns = standings.columns;
    let mut cells = Vec::new();
    if let Some(team) = columns.team {
        cells.push((team, format_value(record.team_score, record.team_score_is_time)));
    }
    cells.push((
        columns.primary,
        format_value(record.player_score, record.player_score_is_time),
    ));
    if let Some(secondary) = columns.secondary {
        cells.push((
            secondary,
            format_value(record.player_score2, record.player_score2_is_time),
        ));
    }
    if standings.mode.ranks_by_maps_played() {
        cells.push((
            Column {
                name: "Maps",
                is_time: false,
            },
            record.count.to_string(),
        ));
    }
    cells
}

/// Format standings as an aligned table with a header row:
/// placement, player, optional team name, then the mode's score columns.
pub fn format_standings_table(standings: &Standings, use_colors: bool) -> String {
    if standings.is_empty() {
        return "No scores to rank.".to_string();
    }

    let show_team = standings.records.iter().any(ScoreRecord::has_team);
    let names: Vec<String> = standings
        .records
        .iter()
        .map(|r| strip_styles(&r.nickname))
        .collect();
    let placements: Vec<String> = standings
        .records
        .iter()
        .map(|r| placement_label(standings, r))
        .collect();
    let scores: Vec<Vec<(Column, String)>> = standings
        .records
        .iter()
        .map(|r| score_cells(standings, r))
        .collect();

    let header_scores: Vec<&str> = scores[0].iter().map(|(c, _)| c.name).collect();
    let score_widths: Vec<usize> = header_scores
        .iter()
        .enumerate()
        .map(|(i, name)| {
            scores
                .iter()
                .map(|row| row[i].1.chars().count())
                .max()
                .unwrap_or(0)
                .max(name.chars().count())
        })
        .collect();
    let place_width = placements.iter().map(|p| p.len()).max().unwrap_or(2).max(2);
    let team_width = if show_team {
        standings
            .records
            .iter()
            .map(|r| r.team_name.chars().count())
            .max()
            .unwrap_or(0)
            .max(4)
    } else {
        0
    };

    // Whatever the fixed columns leave over goes to the player name
    let fixed_width = place_width
        + 2
        + if show_team { team_width + 2 } else { 0 }
        + score_widths.iter().map(|w| w + 2).sum::<usize>();
    let longest_name = names.iter().map(|n| n.chars().count()).max().unwrap_or(0).max(6);
    let name_width = match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => longest_name.min(width - fixed_width),
        Some(_) => longest_name.min(20),
        None => longest_name,
    };

    let mut lines = Vec::with_capacity(standings.records.len() + 1);

    let mut header = format!("{}  {}", pad_left("#", place_width), pad_right("Player", name_width));
    if show_team {
        header.push_str(&format!("  {}", pad_right("Team", team_width)));
    }
    for (name, width) in header_scores.iter().zip(&score_widths) {
        header.push_str(&format!("  {}", pad_left(name, *width)));
    }
    let header = header.trim_end().to_string();
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (i, record) in standings.records.iter().enumerate() {
        let place = pad_left(&placements[i], place_width);
        let name = pad_right(&truncate_name(&names[i], name_width), name_width);
        let mut line = if use_colors {
            let place = if record.placement <= 3 {
                place.yellow().bold().to_string()
            } else {
                place.dimmed().to_string()
            };
            format!("{}  {}", place, name.bold())
        } else {
            format!("{}  {}", place, name)
        };

        if show_team {
            let team = pad_right(&record.team_name, team_width);
            if use_colors {
                line.push_str(&format!("  {}", team.cyan()));
            } else {
                line.push_str(&format!("  {}", team));
            }
        }
        for ((_, value), width) in scores[i].iter().zip(&score_widths) {
            line.push_str(&format!("  {}", pad_left(value, *width)));
        }
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

fn raw_score_fields(standings: &Standings, record: &ScoreRecord) -> Vec<String> {
    let mut fields = Vec::new();
    if standings.columns.team.is_some() {
        fields.push(record.team_score.to_string());
    }
    fields.push(record.player_score.to_string());
    if standings.columns.secondary.is_some() {
        fields.push(record.player_score2.to_string());
    }
    fields
}

/// Format standings as tab-separated values for scripting
/// Columns: placement, login, nickname, team, raw scores..., maps (no headers, no colors)
pub fn format_tsv(standings: &Standings) -> String {
    standings
        .records
        .iter()
        .map(|r| {
            let mut fields = vec![
                r.placement.to_string(),
                r.login.clone(),
                strip_styles(&r.nickname),
                r.team_name.clone(),
            ];
            fields.extend(raw_score_fields(standings, r));
            fields.push(r.count.to_string());
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Format standings as CSV with a header row, raw numeric scores
pub fn format_csv(standings: &Standings) -> String {
    let columns = standings.columns;
    let mut header = vec!["placement", "login", "nickname", "country", "team"];
    if let Some(team) = columns.team {
        header.push(team.name);
    }
    header.push(columns.primary.name);
    if let Some(secondary) = columns.secondary {
        header.push(secondary.name);
    }
    header.push("maps");

    let mut lines = vec![header
        .iter()
        .map(|h| csv_field(h))
        .collect::<Vec<_>>()
        .join(",")];

    for r in &standings.records {
        let mut fields = vec![
            r.placement.to_string(),
            r.login.clone(),
            strip_styles(&r.nickname),
            r.country.clone(),
            r.team_name.clone(),
        ];
        fields.extend(raw_score_fields(standings, r));
        fields.push(r.count.to_string());
        lines.push(
            fields
                .iter()
                .map(|f| csv_field(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

/// Plain-text export: a title line, the generation time, then the table
pub fn format_text_export(standings: &Standings, generated_at: DateTime<Utc>) -> String {
    format!(
        "Standings ({} mode, {} players)\nGenerated {}\n\n{}",
        standings.mode,
        standings.records.len(),
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        format_standings_table(standings, false)
    )
}

/// One chat line announcing the top placements, ties included
pub fn format_announcement(standings: &Standings, top: u32) -> String {
    if standings.is_empty() {
        return "No standings yet.".to_string();
    }

    let entries: Vec<String> = standings
        .podium(top)
        .map(|r| {
            format!(
                "{}. {} ({})",
                r.placement,
                strip_styles(&r.nickname),
                format_value(r.player_score, r.player_score_is_time)
            )
        })
        .collect();
    format!("Final standings: {}", entries.join(" | "))
}

/// List payments, one per line: placement, player, amount
pub fn format_payouts(assignments: &[PayoutAssignment], use_colors: bool) -> String {
    if assignments.is_empty() {
        return "No payouts.".to_string();
    }

    let name_width = assignments
        .iter()
        .map(|a| strip_styles(&a.record.nickname).chars().count())
        .max()
        .unwrap_or(0);
    let amount_width = assignments
        .iter()
        .map(|a| a.amount.to_string().len())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = assignments
        .iter()
        .map(|a| {
            let place = format!("{:>3}.", a.record.placement);
            let name = pad_right(&strip_styles(&a.record.nickname), name_width);
            let amount = pad_left(&a.amount.to_string(), amount_width);
            if use_colors {
                format!("{} {}  {}", place.dimmed(), name, amount.green().bold())
            } else {
                format!("{} {}  {}", place, name, amount)
            }
        })
        .collect();

    let total: u64 = assignments.iter().map(|a| a.amount).sum();
    lines.push(format!("Total: {}", total));
    lines.join("\n")
}

/// Registered ranking modes and their score columns
pub fn format_mode_list() -> String {
    VARIANTS
        .iter()
        .map(|&(name, mode)| {
            let columns = mode.columns();
            let mut described = Vec::new();
            if let Some(team) = columns.team {
                described.push(describe_column(team));
            }
            described.push(describe_column(columns.primary));
            if let Some(secondary) = columns.secondary {
                described.push(describe_column(secondary));
            }
            format!("{:<27}{}", name, described.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_column(column: Column) -> String {
    if column.is_time {
        format!("{} (time)", column.name)
    } else {
        column.name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::compute_payouts;
    use crate::ranking::rank;
    use crate::records::MatchMetadata;
    use chrono::TimeZone;

    fn rec(login: &str, nickname: &str, score: i64) -> ScoreRecord {
        ScoreRecord::new(login, nickname, "FRA").with_score(score)
    }

    fn rounds() -> Standings {
        rank(
            &[vec![
                rec("p1", "$f00Red$zRacer", 20),
                rec("p2", "Blue", 30),
                rec("p3", "Green", 20),
            ]],
            &[MatchMetadata::new("TM_Rounds_Online")],
        )
    }

    fn time_attack() -> Standings {
        rank(
            &[vec![rec("p1", "Quick", 41_890), rec("p2", "Slow", 62_005)]],
            &[MatchMetadata::new("TM_TimeAttack_Online")],
        )
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(41_890), "0:41.890");
        assert_eq!(format_time(62_005), "1:02.005");
        assert_eq!(format_time(3_723_004), "1:02:03.004");
        assert_eq!(format_time(0), "0:00.000");
        assert_eq!(format_time(-1_500), "-0:01.500");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1500, true), "0:01.500");
        assert_eq!(format_value(1500, false), "1500");
    }

    #[test]
    fn test_strip_styles() {
        assert_eq!(strip_styles("$f00Red$zRacer"), "RedRacer");
        assert_eq!(strip_styles("$o$iBold"), "Bold");
        assert_eq!(strip_styles("Cash$$Money"), "Cash$Money");
        assert_eq!(strip_styles("$l[https://example.org]Link$l"), "Link");
        assert_eq!(strip_styles("$0fGreen"), "Green");
        assert_eq!(strip_styles("Plain"), "Plain");
        assert_eq!(strip_styles("Trailing$"), "Trailing");
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Short", 10), "Short");
        assert_eq!(truncate_name("A very long name", 8), "A ver...");
        assert_eq!(truncate_name("Name", 2), "Na");
    }

    #[test]
    fn test_table_marks_ties_and_strips_styles() {
        let table = format_standings_table(&rounds(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Player"));
        assert!(lines[0].contains("Points"));
        assert!(lines[1].contains("1."));
        assert!(lines[1].contains("Blue"));
        assert!(lines[2].contains("=2."));
        assert!(lines[2].contains("RedRacer"));
        assert!(lines[3].contains("=2."));
    }

    #[test]
    fn test_table_time_attack_shows_times_and_maps() {
        let table = format_standings_table(&time_attack(), false);
        assert!(table.contains("Total time"));
        assert!(table.contains("Maps"));
        assert!(table.contains("0:41.890"));
        assert!(table.contains("1:02.005"));
    }

    #[test]
    fn test_table_empty() {
        let standings = rank(&[], &[]);
        assert_eq!(format_standings_table(&standings, false), "No scores to rank.");
    }

    #[test]
    fn test_tsv() {
        let tsv = format_tsv(&time_attack());
        let first: Vec<&str> = tsv.lines().next().unwrap().split('\t').collect();
        assert_eq!(first, vec!["1", "p1", "Quick", "", "41890", "1"]);
    }

    #[test]
    fn test_csv_quotes_fields() {
        let standings = rank(
            &[vec![rec("p1", "Smith, \"Speedy\"", 10)]],
            &[MatchMetadata::new("TM_Rounds_Online")],
        );
        let csv = format_csv(&standings);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "placement,login,nickname,country,team,Points,maps");
        assert_eq!(lines[1], "1,p1,\"Smith, \"\"Speedy\"\"\",FRA,,10,1");
    }

    #[test]
    fn test_text_export_header() {
        let generated = Utc.with_ymd_and_hms(2026, 10, 18, 20, 30, 0).unwrap();
        let text = format_text_export(&rounds(), generated);
        assert!(text.starts_with("Standings (rounds mode, 3 players)"));
        assert!(text.contains("Generated 2026-10-18 20:30 UTC"));
    }

    #[test]
    fn test_announcement() {
        assert_eq!(
            format_announcement(&rounds(), 2),
            "Final standings: 1. Blue (30) | 2. RedRacer (20) | 2. Green (20)"
        );
        assert_eq!(
            format_announcement(&time_attack(), 1),
            "Final standings: 1. Quick (0:41.890)"
        );
    }

    #[test]
    fn test_payout_listing() {
        let standings = rounds();
        let payouts = compute_payouts(&standings.records, &standings.ties, &[100, 50, 20]);
        let listing = format_payouts(&payouts, false);
        let lines: Vec<&str> = listing.lines().collect();
        assert!(lines[0].ends_with("100"));
        assert!(lines[1].ends_with("35"));
        assert!(lines[2].ends_with("35"));
        assert_eq!(lines[3], "Total: 170");
        assert_eq!(format_payouts(&[], false), "No payouts.");
    }

    #[test]
    fn test_mode_list_covers_variants() {
        let list = format_mode_list();
        assert_eq!(list.lines().count(), VARIANTS.len());
        assert!(list.contains("laps"));
        assert!(list.contains("Checkpoints"));
        assert!(list.contains("Total time (time)"));
    }
}
