//! Configuration loading and typed config structures for the Lumber agent.
//!
//! The canonical configuration lives in `lumber-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//!
//! Everything here is read-only to the decision core once loaded.

use std::path::Path;
use std::time::Duration;

use lumber_types::{DisposalMode, TargetSpec, TreeType, DEFAULT_HARVEST_ACTION};
use serde::Deserialize;

/// Environment variable overriding `target.tree`.
pub const ENV_TREE: &str = "LUMBER_TREE";

/// Environment variable overriding `disposal.mode`.
pub const ENV_DISPOSAL: &str = "LUMBER_DISPOSAL";

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

    /// The configuration parsed but holds unusable values.
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

/// Top-level agent configuration.
///
/// Mirrors the structure of `lumber-config.yaml`. All fields have defaults
/// matching the behaviour of the hand-tuned bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LumberConfig {
    /// What to harvest.
    #[serde(default)]
    pub target: TargetConfig,

    /// How to empty a full inventory.
    #[serde(default)]
    pub disposal: DisposalConfig,

    /// Confirmation windows, polling, and pacing.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Navigation thresholds and retry bounds.
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Host loop settings.
    #[serde(default)]
    pub host: HostConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LumberConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `LUMBER_TREE` overrides `target.tree`
    /// - `LUMBER_DISPOSAL` overrides `disposal.mode`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides and validating the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override or a value is unusable.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `LUMBER_TREE` and `LUMBER_DISPOSAL` if set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable holds an unknown value.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(tree) = std::env::var(ENV_TREE) {
            self.target.tree = tree
                .parse()
                .map_err(|reason| ConfigError::Invalid { reason })?;
        }
        if let Ok(mode) = std::env::var(ENV_DISPOSAL) {
            self.disposal.mode = mode
                .parse()
                .map_err(|reason| ConfigError::Invalid { reason })?;
        }
        Ok(())
    }

    /// Reject values the core cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spec = self.target.spec();
        if spec.resource_name.trim().is_empty() || spec.yield_name.trim().is_empty() {
            return invalid("target resource and yield names must not be empty");
        }
        if spec.harvest_action.trim().is_empty() {
            return invalid("target.harvest_action must not be empty");
        }
        let t = &self.timing;
        if t.poll_interval_ms == 0 {
            return invalid("timing.poll_interval_ms must be at least 1");
        }
        if t.harvest_confirm_ms == 0 || t.discard_confirm_ms == 0 || t.storage_open_ms == 0 {
            return invalid("confirmation timeouts must be at least 1ms");
        }
        if t.deposit_pause_min_ms > t.deposit_pause_max_ms {
            return invalid("timing.deposit_pause_min_ms exceeds deposit_pause_max_ms");
        }
        if t.camera_settle_min_ms > t.camera_settle_max_ms {
            return invalid("timing.camera_settle_min_ms exceeds camera_settle_max_ms");
        }
        let n = &self.navigation;
        if n.max_retries == 0 || n.stall_threshold == 0 {
            return invalid("navigation.max_retries and stall_threshold must be at least 1");
        }
        if n.min_visibility > 100 {
            return invalid("navigation.min_visibility is a percentage (0-100)");
        }
        if self.host.tick_interval_ms == 0 {
            return invalid("host.tick_interval_ms must be at least 1");
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid {
        reason: reason.to_owned(),
    })
}

/// What the agent harvests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetConfig {
    /// Catalogue tree to harvest.
    #[serde(default)]
    pub tree: TreeType,

    /// Overrides the tree's scene name (for resources outside the catalogue).
    #[serde(default)]
    pub resource_name: Option<String>,

    /// Overrides the tree's yield item name.
    #[serde(default)]
    pub yield_name: Option<String>,

    /// Interaction label that starts harvesting.
    #[serde(default = "default_harvest_action")]
    pub harvest_action: String,

    /// The agent's woodcutting level, checked against the tree at start.
    #[serde(default = "default_woodcutting_level")]
    pub woodcutting_level: u32,
}

impl TargetConfig {
    /// Resolve the immutable [`TargetSpec`] for this session.
    pub fn spec(&self) -> TargetSpec {
        let mut spec = TargetSpec::from(self.tree);
        if let Some(name) = &self.resource_name {
            spec.resource_name.clone_from(name);
        }
        if let Some(name) = &self.yield_name {
            spec.yield_name.clone_from(name);
        }
        spec.harvest_action.clone_from(&self.harvest_action);
        spec
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            tree: TreeType::default(),
            resource_name: None,
            yield_name: None,
            harvest_action: default_harvest_action(),
            woodcutting_level: default_woodcutting_level(),
        }
    }
}

/// How a full inventory is emptied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DisposalConfig {
    /// Drop or bank.
    #[serde(default)]
    pub mode: DisposalMode,
}

/// Confirmation windows, polling, and pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// How often a timed wait re-checks its condition.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long to wait for the harvest animation to start.
    #[serde(default = "default_harvest_confirm_ms")]
    pub harvest_confirm_ms: u64,

    /// How long to wait for a dropped item to leave the inventory.
    #[serde(default = "default_discard_confirm_ms")]
    pub discard_confirm_ms: u64,

    /// How long to wait for the storage interface to open.
    #[serde(default = "default_storage_open_ms")]
    pub storage_open_ms: u64,

    /// Lower bound of the pause between deposit and close.
    #[serde(default = "default_deposit_pause_min_ms")]
    pub deposit_pause_min_ms: u64,

    /// Upper bound of the pause between deposit and close.
    #[serde(default = "default_deposit_pause_max_ms")]
    pub deposit_pause_max_ms: u64,

    /// Lower bound of the wait after a blocking camera turn.
    #[serde(default = "default_camera_settle_min_ms")]
    pub camera_settle_min_ms: u64,

    /// Upper bound of the wait after a blocking camera turn.
    #[serde(default = "default_camera_settle_max_ms")]
    pub camera_settle_max_ms: u64,

    /// Seed for the pacing random number generator.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl TimingConfig {
    /// Poll interval as a [`Duration`].
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Harvest confirmation window as a [`Duration`].
    pub const fn harvest_confirm(&self) -> Duration {
        Duration::from_millis(self.harvest_confirm_ms)
    }

    /// Discard confirmation window as a [`Duration`].
    pub const fn discard_confirm(&self) -> Duration {
        Duration::from_millis(self.discard_confirm_ms)
    }

    /// Storage-open confirmation window as a [`Duration`].
    pub const fn storage_open(&self) -> Duration {
        Duration::from_millis(self.storage_open_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            harvest_confirm_ms: default_harvest_confirm_ms(),
            discard_confirm_ms: default_discard_confirm_ms(),
            storage_open_ms: default_storage_open_ms(),
            deposit_pause_min_ms: default_deposit_pause_min_ms(),
            deposit_pause_max_ms: default_deposit_pause_max_ms(),
            camera_settle_min_ms: default_camera_settle_min_ms(),
            camera_settle_max_ms: default_camera_settle_max_ms(),
            seed: default_seed(),
        }
    }
}

/// Navigation thresholds and retry bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavigationConfig {
    /// Distance (tiles) at which the agent counts as arrived.
    #[serde(default = "default_interaction_range")]
    pub interaction_range: u32,

    /// Failed steps allowed per phase before escalating or giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Consecutive non-moving steps that count as a stall.
    #[serde(default = "default_stall_threshold")]
    pub stall_threshold: u32,

    /// Visibility percentage below which the camera is turned first.
    #[serde(default = "default_min_visibility")]
    pub min_visibility: u8,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            interaction_range: default_interaction_range(),
            max_retries: default_max_retries(),
            stall_threshold: default_stall_threshold(),
            min_visibility: default_min_visibility(),
        }
    }
}

/// Host loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    /// Real-time milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = unbounded).
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many seconds of wall-clock time (0 = unbounded).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            max_real_time_seconds: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit one JSON object per event instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions for serde
// ---------------------------------------------------------------------------

fn default_harvest_action() -> String {
    DEFAULT_HARVEST_ACTION.to_owned()
}

const fn default_woodcutting_level() -> u32 {
    1
}

const fn default_poll_interval_ms() -> u64 {
    50
}

const fn default_harvest_confirm_ms() -> u64 {
    1200
}

const fn default_discard_confirm_ms() -> u64 {
    600
}

const fn default_storage_open_ms() -> u64 {
    2000
}

const fn default_deposit_pause_min_ms() -> u64 {
    800
}

const fn default_deposit_pause_max_ms() -> u64 {
    1200
}

const fn default_camera_settle_min_ms() -> u64 {
    500
}

const fn default_camera_settle_max_ms() -> u64 {
    1000
}

const fn default_seed() -> u64 {
    42
}

const fn default_interaction_range() -> u32 {
    8
}

const fn default_max_retries() -> u32 {
    10
}

const fn default_stall_threshold() -> u32 {
    3
}

const fn default_min_visibility() -> u8 {
    50
}

const fn default_tick_interval_ms() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LumberConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target.tree, TreeType::Normal);
        assert_eq!(config.disposal.mode, DisposalMode::Drop);
        assert_eq!(config.timing.harvest_confirm_ms, 1200);
        assert_eq!(config.navigation.max_retries, 10);
        assert_eq!(config.navigation.stall_threshold, 3);
        assert_eq!(config.navigation.interaction_range, 8);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
target:
  tree: oak
  woodcutting_level: 20

disposal:
  mode: bank

timing:
  poll_interval_ms: 25
  harvest_confirm_ms: 1800
  discard_confirm_ms: 900
  storage_open_ms: 3000
  deposit_pause_min_ms: 100
  deposit_pause_max_ms: 200
  seed: 7

navigation:
  interaction_range: 6
  max_retries: 12
  stall_threshold: 4
  min_visibility: 30

host:
  tick_interval_ms: 300
  max_ticks: 500

logging:
  level: "debug"
  json: true
"#;

        let config: LumberConfig = serde_yml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.target.tree, TreeType::Oak);
        assert_eq!(config.target.woodcutting_level, 20);
        assert_eq!(config.disposal.mode, DisposalMode::Bank);
        assert_eq!(config.timing.poll_interval(), Duration::from_millis(25));
        assert_eq!(config.timing.storage_open(), Duration::from_secs(3));
        assert_eq!(config.navigation.max_retries, 12);
        assert_eq!(config.host.max_ticks, 500);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        let spec = config.target.spec();
        assert_eq!(spec.resource_name, "Oak tree");
        assert_eq!(spec.yield_name, "Oak logs");
        assert_eq!(spec.harvest_action, "Chop down");
    }

    #[test]
    fn parse_minimal_yaml() {
        let config: LumberConfig = serde_yml::from_str("target:\n  tree: yew\n").unwrap();
        assert_eq!(config.target.tree, TreeType::Yew);
        assert_eq!(config.timing.discard_confirm_ms, 600);
        assert_eq!(config.host.tick_interval_ms, 600);
    }

    #[test]
    fn name_overrides_replace_catalogue_names() {
        let yaml = "target:\n  resource_name: Teak tree\n  yield_name: Teak logs\n";
        let config: LumberConfig = serde_yml::from_str(yaml).unwrap();
        let spec = config.target.spec();
        assert_eq!(spec.resource_name, "Teak tree");
        assert_eq!(spec.yield_name, "Teak logs");
    }

    #[test]
    fn inverted_pause_range_is_rejected() {
        let mut config = LumberConfig::default();
        config.timing.deposit_pause_min_ms = 2000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_retry_bound_is_rejected() {
        let mut config = LumberConfig::default();
        config.navigation.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let mut config = LumberConfig::default();
        config.host.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_resource_override_is_rejected() {
        let mut config = LumberConfig::default();
        config.target.resource_name = Some("  ".to_owned());
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("lumber-config.yaml");
        if path.exists() {
            let config = LumberConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
