//! Configuration loading and typed config structures.
//!
//! The simulation is configured by `langton-config.yaml`. Every field has a
//! default, so an empty or missing file yields a playable 50x50 board. The
//! shared bearer secret is never read from the file: it comes from the
//! `SECRET_KEY` environment variable through [`SharedSecret::from_lookup`],
//! which lets tests inject it without touching the process environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::engine::EngineConfig;

/// Name of the environment variable holding the shared secret.
pub const SECRET_ENV_VAR: &str = "SECRET_KEY";

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

    /// The shared secret is not set.
    #[error("SECRET_KEY is not set; the shared secret is required")]
    MissingSecret,

    /// A value is present but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `langton-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Board size.
    #[serde(default)]
    pub grid: GridConfig,

    /// Colony and pacing.
    #[serde(default)]
    pub simulation: RunConfig,

    /// Local save file.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Remote authority sync.
    #[serde(default)]
    pub sync: SyncConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Engine construction parameters.
    pub const fn engine(&self) -> EngineConfig {
        EngineConfig {
            width: self.grid.width,
            height: self.grid.height,
            ant_count: self.simulation.ant_count,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }
        if self.simulation.tick_rate == 0 {
            return Err(ConfigError::Invalid(
                "simulation.tick_rate must be at least 1".to_owned(),
            ));
        }
        if self.sync.timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "sync.timeout_ms must be at least 1".to_owned(),
            ));
        }
        if self.sync.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "sync.queue_capacity must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    /// Width in cells.
    #[serde(default = "default_grid_side")]
    pub width: usize,

    /// Height in cells.
    #[serde(default = "default_grid_side")]
    pub height: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_side(),
            height: default_grid_side(),
        }
    }
}

/// Colony size and tick pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// Ants placed on a fresh board.
    #[serde(default = "default_ant_count")]
    pub ant_count: u32,

    /// Ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ant_count: default_ant_count(),
            tick_rate: default_tick_rate(),
            max_ticks: 0,
        }
    }
}

/// Local persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the save file.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// Remote authority settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    /// Whether snapshots are pushed at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the authority, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Accept self-signed certificates (development only).
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    /// Per-request deadline in milliseconds, connect included.
    #[serde(default = "default_sync_timeout_ms")]
    pub timeout_ms: u64,

    /// Snapshots waiting to be sent. Ticks arriving while the queue is
    /// full are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            accept_invalid_certs: true,
            timeout_ms: default_sync_timeout_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl SyncConfig {
    /// Per-request deadline.
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// The pre-shared bearer token.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedSecret(String);

impl SharedSecret {
    /// Wrap a secret value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if the value is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(Self(value))
    }

    /// Read the secret through a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if the variable is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(SECRET_ENV_VAR).map_or(Err(ConfigError::MissingSecret), Self::new)
    }

    /// Read the secret from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if `SECRET_KEY` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// The raw token, for building an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Compare a presented token in time independent of where it differs.
    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(***)")
    }
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y));
    std::hint::black_box(diff) == 0
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_grid_side() -> usize {
    50
}

const fn default_ant_count() -> u32 {
    1
}

const fn default_tick_rate() -> u32 {
    10
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("sauvegarde.json")
}

fn default_base_url() -> String {
    "http://localhost:8000".to_owned()
}

const fn default_sync_timeout_ms() -> u64 {
    5_000
}

const fn default_queue_capacity() -> usize {
    8
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.grid.width, 50);
        assert_eq!(config.grid.height, 50);
        assert_eq!(config.simulation.ant_count, 1);
        assert_eq!(config.simulation.tick_rate, 10);
        assert_eq!(config.simulation.max_ticks, 0);
        assert_eq!(config.storage.snapshot_path, PathBuf::from("sauvegarde.json"));
        assert!(config.sync.enabled);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
grid:
  width: 80
  height: 60

simulation:
  ant_count: 4
  tick_rate: 30
  max_ticks: 1000

storage:
  snapshot_path: "saves/current.json"

sync:
  enabled: false
  base_url: "http://authority.internal:8000"
  accept_invalid_certs: false
"#;
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.grid.width, 80);
        assert_eq!(config.grid.height, 60);
        assert_eq!(config.simulation.ant_count, 4);
        assert_eq!(config.simulation.tick_rate, 30);
        assert_eq!(config.simulation.max_ticks, 1000);
        assert_eq!(
            config.storage.snapshot_path,
            PathBuf::from("saves/current.json")
        );
        assert!(!config.sync.enabled);
        assert_eq!(config.sync.base_url, "http://authority.internal:8000");

        let engine = config.engine();
        assert_eq!((engine.width, engine.height, engine.ant_count), (80, 60, 4));
    }

    #[test]
    fn bundled_config_matches_defaults() {
        let yaml = include_str!("../../../langton-config.yaml");
        assert_eq!(
            SimulationConfig::parse(yaml).unwrap(),
            SimulationConfig::default()
        );
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("grid:\n  width: 7\n").unwrap();
        assert_eq!(config.grid.width, 7);
        assert_eq!(config.grid.height, 50);
        assert_eq!(config.simulation.tick_rate, 10);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(
            SimulationConfig::parse("").unwrap(),
            SimulationConfig::default()
        );
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        let result = SimulationConfig::parse("grid:\n  width: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn default_sync_targets_plain_http() {
        let sync = SyncConfig::default();
        assert_eq!(sync.base_url, "http://localhost:8000");
        assert_eq!(sync.timeout(), Duration::from_secs(5));
        assert_eq!(sync.queue_capacity, 8);
    }

    #[test]
    fn unbounded_sync_settings_are_rejected() {
        for yaml in ["sync:\n  timeout_ms: 0\n", "sync:\n  queue_capacity: 0\n"] {
            let result = SimulationConfig::parse(yaml);
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "{yaml}");
        }
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let result = SimulationConfig::parse("simulation:\n  tick_rate: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let result = SimulationConfig::parse("grid: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn secret_from_lookup() {
        let secret =
            SharedSecret::from_lookup(|name| (name == SECRET_ENV_VAR).then(|| "s3cret".to_owned()))
                .unwrap();
        assert_eq!(secret.expose(), "s3cret");
        assert!(secret.matches("s3cret"));
        assert!(!secret.matches("s3cres"));
        assert!(!secret.matches("s3cret "));
        assert!(!secret.matches(""));
    }

    #[test]
    fn missing_or_empty_secret_is_fatal() {
        assert!(matches!(
            SharedSecret::from_lookup(|_| None),
            Err(ConfigError::MissingSecret)
        ));
        assert!(matches!(
            SharedSecret::from_lookup(|_| Some(String::new())),
            Err(ConfigError::MissingSecret)
        ));
    }

    #[test]
    fn secret_is_redacted_in_debug() {
        let secret = SharedSecret::new("hunter2").unwrap();
        assert_eq!(format!("{secret:?}"), "SharedSecret(***)");
    }
}
