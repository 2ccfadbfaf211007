//! Command-line replayer for recorded matches.
//!
//! Loads a replay file, materializes every round in order, and prints the
//! per-round team statistics as JSON on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `playback-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Read the replay file named on the command line
//! 4. Materialize every round
//! 5. Print the statistics report

mod error;
mod replay_file;

use std::io::Write;
use std::path::{Path, PathBuf};

use playback_core::{LoggingConfig, PlaybackConfig, RoundStat};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::RunnerError;
use crate::replay_file::ReplayFile;

/// Default configuration file, relative to the working directory.
const CONFIG_PATH: &str = "playback-config.yaml";

/// One line of the statistics report.
#[derive(Debug, Serialize)]
struct RoundReport<'a> {
    /// Round number.
    round: u32,
    /// Team statistics of that round.
    stat: &'a RoundStat,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration or replay cannot be loaded, or a
/// round fails to materialize.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, from_file) = load_config()?;
    init_logging(&config.logging);

    info!("playback-runner starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        action_lifetime = config.playback.action_lifetime(),
        slow_stat_threshold_ms = config.playback.slow_stat_threshold_ms,
        "Configuration loaded"
    );

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .ok_or(RunnerError::Usage)?;
    run(&path, &config)?;
    Ok(())
}

/// Replay the match at `path` and write the report to stdout.
fn run(path: &Path, config: &PlaybackConfig) -> Result<(), RunnerError> {
    let mut replay = ReplayFile::from_path(path)?.into_match(config.playback)?;

    let last = replay.max_round();
    replay.seek(last)?;
    info!(rounds = last, "All rounds materialized");

    let reports: Vec<RoundReport<'_>> = (0..=last)
        .filter_map(|round| {
            replay
                .stat_for(round)
                .map(|stat| RoundReport { round, stat })
        })
        .collect();

    for team in replay.teams() {
        if let Some(stat) = replay.stat_for(last).and_then(|s| s.team_stat(team.id).ok()) {
            info!(
                team = %team.name,
                cheese = stat.cheese_amount,
                baby_rats = stat.baby_rat_count,
                rat_kings = stat.rat_king_count,
                cat_damage = stat.cat_damage_amount,
                "Final team statistics"
            );
        } else {
            warn!(team = %team.name, "No statistics for team");
        }
    }

    let json = serde_json::to_string_pretty(&reports)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").map_err(|source| RunnerError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    })?;
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], falling back to defaults.
///
/// The flag is `true` when the file was read.
fn load_config() -> Result<(PlaybackConfig, bool), RunnerError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((PlaybackConfig::from_file(config_path)?, true))
    } else {
        Ok((PlaybackConfig::default(), false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }
}
