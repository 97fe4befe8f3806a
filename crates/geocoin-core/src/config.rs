//! Configuration loading and typed config structures for the Geocoin world.
//!
//! The canonical configuration lives in `geocoin-config.yaml` at the project
//! root. Every field has a default matching the reference gameplay values,
//! so an empty document is a valid configuration. Values are read once at
//! startup and never change afterwards.
//!
//! Loading always validates: a non-positive tile width or an out-of-range
//! spawn probability is rejected, never clamped.

use std::path::Path;

use geocoin_types::LatLng;
use geocoin_world::CoinCountPolicy;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `geocoin-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Grid settings.
    #[serde(default)]
    pub board: BoardConfig,

    /// Cache placement settings.
    #[serde(default)]
    pub spawn: SpawnConfig,

    /// Player settings.
    #[serde(default)]
    pub player: PlayerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value that has a restricted range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tile_width = self.board.tile_width;
        if !tile_width.is_finite() || tile_width <= 0.0 {
            return Err(ConfigError::Invalid {
                reason: format!("board.tile_width must be finite and positive, got {tile_width}"),
            });
        }

        let probability = self.spawn.probability;
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::Invalid {
                reason: format!("spawn.probability must be within [0, 1], got {probability}"),
            });
        }

        if self.spawn.max_coins == 0 {
            return Err(ConfigError::Invalid {
                reason: "spawn.max_coins must be at least 1".to_owned(),
            });
        }

        let start = self.player.start;
        if !start.lat.is_finite() || !start.lng.is_finite() {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "player.start must be a finite point, got ({}, {})",
                    start.lat, start.lng
                ),
            });
        }

        Ok(())
    }
}

/// Grid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardConfig {
    /// Width and height of one cell, in degrees.
    #[serde(default = "default_tile_width")]
    pub tile_width: f64,

    /// How many cells around the player are revealed, in each direction.
    #[serde(default = "default_visibility_radius")]
    pub visibility_radius: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            tile_width: default_tile_width(),
            visibility_radius: default_visibility_radius(),
        }
    }
}

/// Cache placement configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpawnConfig {
    /// Probability that a given cell hosts a cache, in `[0, 1]`.
    #[serde(default = "default_spawn_probability")]
    pub probability: f64,

    /// Most coins a newly spawned cache can hold.
    #[serde(default = "default_max_coins")]
    pub max_coins: u32,

    /// Whether every cache gets `max_coins` or rolls its own count.
    #[serde(default)]
    pub coin_count: CoinCountPolicy,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            probability: default_spawn_probability(),
            max_coins: default_max_coins(),
            coin_count: CoinCountPolicy::default(),
        }
    }
}

/// Player configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerConfig {
    /// Where the player stands when the session starts.
    #[serde(default = "default_start")]
    pub start: LatLng,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable, one event per line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

/// The classroom the game was first played from.
pub const DEFAULT_START: LatLng = LatLng::new(36.989_493_795_784_01, -122.062_771_285_485_04);

const fn default_tile_width() -> f64 {
    1e-4
}

const fn default_visibility_radius() -> u32 {
    8
}

const fn default_spawn_probability() -> f64 {
    0.1
}

const fn default_max_coins() -> u32 {
    3
}

const fn default_start() -> LatLng {
    DEFAULT_START
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.board.tile_width, 1e-4);
        assert_eq!(config.board.visibility_radius, 8);
        assert_eq!(config.spawn.probability, 0.1);
        assert_eq!(config.spawn.max_coins, 3);
        assert_eq!(config.spawn.coin_count, CoinCountPolicy::Fixed);
        assert_eq!(config.player.start, DEFAULT_START);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn parse_empty_yaml_uses_defaults() {
        let config = GameConfig::parse("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
board:
  tile_width: 0.001
  visibility_radius: 2

spawn:
  probability: 0.25
  max_coins: 5
  coin_count: luck

player:
  start:
    lat: 51.5
    lng: -0.125

logging:
  level: "debug"
  format: "json"
"#;
        let config = GameConfig::parse(yaml).unwrap();
        assert_eq!(config.board.tile_width, 0.001);
        assert_eq!(config.board.visibility_radius, 2);
        assert_eq!(config.spawn.probability, 0.25);
        assert_eq!(config.spawn.max_coins, 5);
        assert_eq!(config.spawn.coin_count, CoinCountPolicy::Luck);
        assert_eq!(config.player.start, LatLng::new(51.5, -0.125));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_partial_yaml_fills_defaults() {
        let config = GameConfig::parse("board:\n  visibility_radius: 1\n").unwrap();
        assert_eq!(config.board.visibility_radius, 1);
        assert_eq!(config.board.tile_width, 1e-4);
        assert_eq!(config.spawn, SpawnConfig::default());
    }

    #[test]
    fn rejects_non_positive_tile_width() {
        for yaml in ["board:\n  tile_width: 0\n", "board:\n  tile_width: -0.5\n"] {
            assert!(matches!(
                GameConfig::parse(yaml),
                Err(ConfigError::Invalid { .. })
            ));
        }
    }

    #[test]
    fn rejects_out_of_range_probability() {
        for yaml in ["spawn:\n  probability: 1.5\n", "spawn:\n  probability: -0.1\n"] {
            let err = GameConfig::parse(yaml).unwrap_err();
            assert!(err.to_string().contains("spawn.probability"));
        }
    }

    #[test]
    fn rejects_zero_max_coins() {
        let err = GameConfig::parse("spawn:\n  max_coins: 0\n").unwrap_err();
        assert!(err.to_string().contains("max_coins"));
    }

    #[test]
    fn rejects_negative_radius_at_parse_time() {
        assert!(matches!(
            GameConfig::parse("board:\n  visibility_radius: -1\n"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(matches!(
            GameConfig::parse("logging:\n  format: jsno\n"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            GameConfig::parse("board: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = GameConfig::from_file(Path::new("/nonexistent/geocoin-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
