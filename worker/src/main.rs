//! throughput-worker - batch cooldown analysis of one fetched fight.
//!
//! Reads an event file (JSON array or one event per line), replays it for one
//! player through the cooldown tracker of the chosen spec and prints the
//! results as JSON on stdout.
//!
//! Usage: throughput-worker <events_file> --player <id> [--spec affliction] [--pet <id>]...

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use throughput_core::combat_log::read_event_file;
use throughput_core::context::{AnalysisSession, AnalyzerSettings, default_definitions_dir};
use throughput_core::cooldowns::{Spec, load_definition_files};
use throughput_core::{AbilityCatalog, AnalysisResults, Combatant, DispatchMode};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "throughput-worker")]
#[command(about = "Attribute a player's throughput to their cooldown windows")]
struct Args {
    /// Event file to analyze
    events: PathBuf,

    /// Actor id of the analyzed player
    #[arg(long)]
    player: i64,

    /// Actor ids already known to be the player's pets
    #[arg(long = "pet")]
    pets: Vec<i64>,

    /// Built-in cooldown list (base, affliction, balance)
    #[arg(long, default_value = "base")]
    spec: String,

    /// Extra cooldown definition files (TOML)
    #[arg(long = "definitions")]
    definitions: Vec<PathBuf>,

    /// Settings file to use instead of the platform default
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Stop at the first module failure
    #[arg(long)]
    fail_fast: bool,

    /// Replay events whose timestamp goes backwards instead of skipping them
    #[arg(long)]
    allow_out_of_order: bool,

    /// Fight start/end from the log provider, in ms
    #[arg(long)]
    fight_start: Option<i64>,
    #[arg(long)]
    fight_end: Option<i64>,

    /// Print a plain-text report instead of JSON
    #[arg(long)]
    text: bool,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If THROUGHPUT_LOG_PATH is set, append to that file
    if let Ok(path) = std::env::var("THROUGHPUT_LOG_PATH")
        && let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    // Stdout carries the results, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let args = Args::parse();

    let settings = match load_settings(&args) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load settings");
            std::process::exit(1);
        }
    };

    let timer = std::time::Instant::now();
    match analyze(&args, settings.clone()) {
        Ok(results) => {
            tracing::debug!(elapsed_ms = timer.elapsed().as_millis() as u64, "Analysis finished");
            if args.text {
                println!("{}", results.render_text(settings.european_number_format));
            } else if let Ok(json) = serde_json::to_string(&results) {
                println!("{}", json);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            std::process::exit(1);
        }
    }
}

/// Persisted settings with command-line overrides applied.
fn load_settings(args: &Args) -> Result<AnalyzerSettings, String> {
    let mut settings = match &args.settings {
        Some(path) => AnalyzerSettings::load_from(path),
        None => AnalyzerSettings::load(),
    }
    .map_err(|e| e.to_string())?;

    if args.fail_fast {
        settings.dispatch_mode = DispatchMode::FailFast;
    }
    if args.allow_out_of_order {
        settings.reject_out_of_order = false;
    }
    settings.definition_files.extend(args.definitions.iter().cloned());
    Ok(settings)
}

/// TOML files in the user definitions directory, in name order.
fn user_definition_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();
    files
}

fn analyze(args: &Args, settings: AnalyzerSettings) -> Result<AnalysisResults, String> {
    let spec = Spec::from_name(&args.spec).map_err(|e| e.to_string())?;

    let mut definition_paths = default_definitions_dir()
        .map(|dir| user_definition_files(&dir))
        .unwrap_or_default();
    definition_paths.extend(settings.definition_files.iter().cloned());
    let definitions = load_definition_files(&definition_paths).map_err(|e| e.to_string())?;

    let mut catalog = AbilityCatalog::builtin();
    definitions.register_abilities(&mut catalog);
    let module = spec
        .build_module(definitions.cooldowns)
        .map_err(|e| e.to_string())?;

    let combatant = Combatant::new(args.player).with_pets(args.pets.iter().copied());
    let mut session = AnalysisSession::new(combatant, catalog, settings)
        .with_fight_bounds(args.fight_start, args.fight_end);
    session.register(module).map_err(|e| e.to_string())?;

    let records = read_event_file(&args.events).map_err(|e| e.to_string())?;
    tracing::info!(
        path = ?args.events,
        records = records.len(),
        spec = ?spec,
        player = args.player,
        "Replaying events"
    );
    session.run_records(records).map_err(|e| e.to_string())
}
