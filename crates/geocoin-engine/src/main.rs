//! Headless engine binary for the Geocoin world.
//!
//! Wires together configuration, logging, and a [`GameSession`], then plays
//! one scripted round from the configured starting location. A map front end
//! would drive the same session calls from user input; this binary exists to
//! exercise the world core end to end and report on it through the logs.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `$GEOCOIN_CONFIG` or `geocoin-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the game session
//! 4. Reveal the neighborhood around the starting location
//! 5. Place a marker on every revealed cache
//! 6. Play a round: collect one coin per cache, deposit all at the first
//! 7. Audit coin conservation; exit non-zero on an anomaly

mod error;
mod markers;

use std::path::{Path, PathBuf};

use geocoin_caches::ConservationResult;
use geocoin_core::config::{LogFormat, LoggingConfig};
use geocoin_core::{GameConfig, GameSession};
use geocoin_types::CellKey;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::markers::MarkerLayer;

/// Environment variable naming an explicit configuration file.
const CONFIG_ENV_VAR: &str = "GEOCOIN_CONFIG";

/// Configuration file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "geocoin-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a session operation fails,
/// or the end-of-round audit finds a conservation anomaly.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, source) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);

    info!("geocoin-engine starting");
    match &source {
        Some(path) => info!(path = %path.display(), "Configuration file read"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        tile_width = config.board.tile_width,
        visibility_radius = config.board.visibility_radius,
        spawn_probability = config.spawn.probability,
        max_coins = config.spawn.max_coins,
        coin_count = ?config.spawn.coin_count,
        log_format = ?config.logging.format,
        "Configuration loaded"
    );

    // 3. Create the session.
    let mut session = GameSession::new(&config)?;

    // 4. Reveal the starting neighborhood.
    let start = session.start();
    let hosting = session.reveal_near(start);
    info!(
        lat = start.lat,
        lng = start.lng,
        cells = session.board().known_cell_count(),
        caches = hosting.len(),
        coins = session.registry().minted_count(),
        "Starting neighborhood revealed"
    );

    // 5. Place markers.
    let mut markers = MarkerLayer::new();
    place_markers(&mut session, &mut markers, &hosting)?;
    info!(markers = markers.marker_count(), "Markers placed");

    // 6. Play the scripted round.
    let report = play_round(&mut session, &hosting)?;
    info!(
        collected = report.collected,
        deposited = report.deposited,
        player_coins = session.player().len(),
        popup_refreshes = markers.refreshes(),
        "Round complete"
    );

    // 7. Audit.
    match session.audit() {
        ConservationResult::Balanced => {
            info!(
                minted = session.registry().minted_count(),
                "Coin conservation verified"
            );
        }
        ConservationResult::Anomaly(anomaly) => {
            return Err(EngineError::Conservation {
                message: anomaly.message,
            }
            .into());
        }
    }

    info!(session = %session.id(), "geocoin-engine shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Load the game configuration.
///
/// An explicit `$GEOCOIN_CONFIG` must point at a readable file. Without it,
/// `geocoin-config.yaml` in the working directory is used when present and
/// defaults otherwise. Returns the path that was read, if any.
fn load_config() -> Result<(GameConfig, Option<PathBuf>), EngineError> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        let path = PathBuf::from(explicit);
        let config = GameConfig::from_file(&path)?;
        return Ok((config, Some(path)));
    }
    load_config_from(Path::new(DEFAULT_CONFIG_PATH))
}

/// Load configuration from `path`, falling back to defaults if it does not
/// exist.
fn load_config_from(path: &Path) -> Result<(GameConfig, Option<PathBuf>), EngineError> {
    if path.exists() {
        let config = GameConfig::from_file(path)?;
        Ok((config, Some(path.to_path_buf())))
    } else {
        Ok((GameConfig::default(), None))
    }
}

/// Attach a marker to every cache in `hosting` and log its popup.
fn place_markers(
    session: &mut GameSession,
    markers: &mut MarkerLayer,
    hosting: &[CellKey],
) -> Result<(), EngineError> {
    for key in hosting {
        let Some(cache) = session.cache_mut(*key) else {
            warn!(cell = %key, "revealed cache missing from registry");
            continue;
        };
        let handle = markers.attach(cache)?;

        if let Some(summary) = session.describe_cache(*key) {
            info!(
                marker = handle.0,
                cell = %summary.cell,
                south = summary.bounds.south_west.lat,
                west = summary.bounds.south_west.lng,
                north = summary.bounds.north_east.lat,
                east = summary.bounds.north_east.lng,
                coins = ?summary.coin_labels,
                "{}: {}",
                summary.title,
                summary.contents
            );
        }
    }
    Ok(())
}

/// Outcome of [`play_round`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RoundReport {
    /// Coins moved into the player's inventory.
    collected: u64,
    /// Coins moved out of the player's inventory.
    deposited: u64,
}

/// Collect one coin from each cache in `hosting`, then deposit everything
/// the player carries into the first of them.
fn play_round(session: &mut GameSession, hosting: &[CellKey]) -> Result<RoundReport, EngineError> {
    let mut report = RoundReport::default();
    for key in hosting {
        if session.collect_at(*key)?.is_some() {
            report.collected = report.collected.saturating_add(1);
        }
    }

    let Some(home) = hosting.first().copied() else {
        return Ok(report);
    };
    while session.deposit_at(home)?.is_some() {
        report.deposited = report.deposited.saturating_add(1);
    }
    Ok(report)
}
