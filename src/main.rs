use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use standings::ingest::LoadedMaps;
use standings::output::ExportFormat;

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank players across one or more score files
    Rank {
        /// Score files (JSON), in map order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Force a ranking mode instead of detecting it (see `standings modes`)
        #[arg(short, long)]
        mode: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Table)]
        format: ExportFormat,

        /// Write the standings to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also list payouts from the configured schedule
        #[arg(long)]
        payouts: bool,

        /// Also print a one-line announcement of the top placements
        #[arg(long)]
        announce: bool,
    },
    /// Compute prize payments for the ranked players
    Payout {
        /// Score files (JSON), in map order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Force a ranking mode instead of detecting it
        #[arg(short, long)]
        mode: Option<String>,

        /// Amounts per placement, overriding the config (e.g. "1000,700,500")
        #[arg(short, long)]
        schedule: Option<String>,
    },
    /// List the ranking modes and the scores each one shows
    Modes,
    /// Create the config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,

        /// Write the suggested config without asking questions
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "standings")]
#[command(about = "Rank players across maps and split prize pools between ties", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/standings/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Print warnings held back while output was being written
fn flush_warnings() {
    for message in standings::stderr_buffer::drain() {
        eprintln!("{}", message);
    }
}

fn fail(message: String, code: i32) -> ! {
    flush_warnings();
    eprintln!("{}", message);
    std::process::exit(code);
}

fn load_maps(files: &[PathBuf], verbose: bool) -> LoadedMaps {
    let load_start = Instant::now();
    let maps = match standings::ingest::load_files(files) {
        Ok(maps) => maps,
        Err(e) => fail(format!("Input error: {:#}", e), EXIT_INPUT),
    };

    if verbose {
        eprintln!(
            "Loaded {} maps ({} scores) from {} files in {:?}",
            maps.map_count(),
            maps.observation_count(),
            files.len(),
            load_start.elapsed()
        );
        for meta in &maps.metadata {
            eprintln!("  {}", meta.label());
        }
    }
    if maps.rejected > 0 {
        standings::buffered_eprintln!("Skipped {} malformed score entries", maps.rejected);
    }
    maps
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading: the config may not exist yet, or be the thing being replaced
    if let Commands::Init { force, yes } = cli.command {
        match standings::config::init::run_init(config_path, yes, force) {
            Ok(path) => {
                println!("Config written to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => fail(format!("Init failed: {:#}", e), EXIT_CONFIG),
        }
    }

    let config = match standings::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => fail(format!("Config error: {:#}", e), EXIT_CONFIG),
    };

    if let Err(errors) = standings::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!(
            "TimeAttack rule: {:?}, payout schedule: {} places",
            config.ranking.time_attack,
            config.payouts.schedule.len()
        );
    }

    match cli.command {
        Commands::Modes => {
            println!("{}", standings::output::format_mode_list());
        }
        Commands::Rank {
            files,
            mode,
            format,
            output,
            payouts,
            announce,
        } => {
            let selector = match config.ranking.selector(mode.as_deref()) {
                Ok(s) => s,
                Err(e) => fail(format!("Config error: {:#}", e), EXIT_CONFIG),
            };

            // Warnings would interleave with the table otherwise
            standings::stderr_buffer::activate();
            let maps = load_maps(&files, cli.verbose);
            let ranked = standings::ranking::rank_with(&selector, &maps.score_lists, &maps.metadata);

            if cli.verbose {
                eprintln!(
                    "Ranked {} players with {} mode ({} tied)",
                    ranked.records.len(),
                    ranked.mode,
                    ranked.ties.len()
                );
            }

            let use_colors = output.is_none() && config.output.colors.resolve();
            let rendered = standings::output::render(&ranked, format, use_colors);
            match output {
                Some(ref path) => {
                    if let Err(e) = standings::output::write_export(path, &rendered) {
                        fail(format!("Export failed: {:#}", e), EXIT_INPUT);
                    }
                    println!("Standings written to {}", path.display());
                }
                None => println!("{}", rendered),
            }

            if payouts {
                let assignments = standings::payout::compute_payouts(
                    &ranked.records,
                    &ranked.ties,
                    &config.payouts.schedule,
                );
                println!();
                println!(
                    "{}",
                    standings::output::format_payouts(&assignments, config.output.colors.resolve())
                );
            }

            if announce {
                println!();
                println!(
                    "{}",
                    standings::output::format_announcement(&ranked, config.output.announce_top)
                );
            }

            flush_warnings();
        }
        Commands::Payout {
            files,
            mode,
            schedule,
        } => {
            let selector = match config.ranking.selector(mode.as_deref()) {
                Ok(s) => s,
                Err(e) => fail(format!("Config error: {:#}", e), EXIT_CONFIG),
            };
            let schedule = match schedule {
                Some(ref input) => match standings::config::init::parse_schedule(input) {
                    Ok(s) => s,
                    Err(e) => fail(format!("Invalid schedule: {:#}", e), EXIT_CONFIG),
                },
                None => config.payouts.schedule.clone(),
            };

            standings::stderr_buffer::activate();
            let maps = load_maps(&files, cli.verbose);
            let ranked = standings::ranking::rank_with(&selector, &maps.score_lists, &maps.metadata);
            let assignments =
                standings::payout::compute_payouts(&ranked.records, &ranked.ties, &schedule);

            println!(
                "{}",
                standings::output::format_payouts(&assignments, config.output.colors.resolve())
            );

            if cli.verbose {
                eprintln!(
                    "Paid {} of {} scheduled",
                    standings::payout::total_paid(&assignments),
                    schedule.iter().sum::<u64>()
                );
            }
            flush_warnings();
        }
        Commands::Init { .. } => unreachable!("handled before loading config"),
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}
