//! Configuration for Monte Carlo runs.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Values of the form `${VAR}` or `${VAR:-default}` are
//! replaced from the environment before parsing.
//!
//! # Example
//!
//! ```yaml
//! simulation:
//!   initial_value: 300000
//!   margin_call: 80000
//!   yearly_trades: 100
//!   samples: ${MC_SAMPLES:-30}
//!   slippage: 12.5
//!   commission: 2.5
//!   seed: 42
//! journal:
//!   data_dir: data
//!   profit_column: profit
//!   contracts_column: contracts
//! parallel:
//!   enabled: true
//!   max_threads: 0
//!   min_parallel_paths: 64
//! logging:
//!   level: info
//!   format: pretty
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::simulation::SimulationParams;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Portfolio, cost and sampling parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Trade journal location and columns.
    #[serde(default)]
    pub journal: JournalConfig,
    /// Parallel path construction.
    #[serde(default)]
    pub parallel: ParallelConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting portfolio equity.
    #[serde(default = "default_initial_value")]
    pub initial_value: f64,
    /// Margin-call equity floor.
    #[serde(default = "default_margin_call")]
    pub margin_call: f64,
    /// Trades drawn per simulated year.
    #[serde(default = "default_yearly_trades")]
    pub yearly_trades: usize,
    /// Number of simulated years.
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Slippage per contract.
    #[serde(default)]
    pub slippage: f64,
    /// Commission per contract.
    #[serde(default)]
    pub commission: f64,
    /// Seed for reproducibility (None = random, logged at startup).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_value: default_initial_value(),
            margin_call: default_margin_call(),
            yearly_trades: default_yearly_trades(),
            samples: default_samples(),
            slippage: 0.0,
            commission: 0.0,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Portfolio and cost parameters for the simulator.
    #[must_use]
    pub const fn params(&self) -> SimulationParams {
        SimulationParams {
            initial_value: self.initial_value,
            margin_call: self.margin_call,
            slippage: self.slippage,
            commission: self.commission,
        }
    }
}

const fn default_initial_value() -> f64 {
    300_000.0
}
const fn default_margin_call() -> f64 {
    80_000.0
}
const fn default_yearly_trades() -> usize {
    100
}
const fn default_samples() -> usize {
    30
}

/// Trade journal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Directory scanned for `*.csv` journals.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Header of the profit column.
    #[serde(default = "default_profit_column")]
    pub profit_column: String,
    /// Header of the contracts column.
    #[serde(default = "default_contracts_column")]
    pub contracts_column: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            profit_column: default_profit_column(),
            contracts_column: default_contracts_column(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_profit_column() -> String {
    "profit".to_string()
}
fn default_contracts_column() -> String {
    "contracts".to_string()
}

/// Configuration for parallel path construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Build rows on the rayon pool.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Dedicated pool size (0 = rayon global pool).
    #[serde(default)]
    pub max_threads: usize,
    /// Below this many paths rows are built sequentially.
    #[serde(default = "default_min_parallel_paths")]
    pub min_parallel_paths: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_threads: 0,
            min_parallel_paths: default_min_parallel_paths(),
        }
    }
}

impl ParallelConfig {
    /// Whether `paths` rows should be built in parallel.
    #[must_use]
    pub const fn should_parallelize(&self, paths: usize) -> bool {
        self.enabled && paths >= self.min_parallel_paths
    }
}

const fn default_true() -> bool {
    true
}
const fn default_min_parallel_paths() -> usize {
    64
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a YAML file.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    // An empty document deserializes to nothing; treat it as all defaults.
    let config: Config = if interpolated.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml_bw::from_str(&interpolated)?
    };
    validate_config(&config)?;
    Ok(config)
}

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static ENV_VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("env var regex is valid")
});

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become the empty string.
fn interpolate_env_vars(input: &str) -> String {
    ENV_VAR_REGEX
        .replace_all(input, |cap: &Captures<'_>| {
            match std::env::var(&cap[1]) {
                Ok(v) if !v.is_empty() => v,
                _ => cap.get(2).map_or_else(String::new, |m| m.as_str().to_string()),
            }
        })
        .into_owned()
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] naming the first invalid field.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.simulation.yearly_trades == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.yearly_trades must be positive".to_string(),
        ));
    }
    if config.simulation.samples == 0 {
        return Err(ConfigError::ValidationError(
            "simulation.samples must be positive".to_string(),
        ));
    }
    config
        .simulation
        .params()
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("simulation: {e}")))?;

    if config.journal.profit_column.trim().is_empty()
        || config.journal.contracts_column.trim().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "journal column names must not be empty".to_string(),
        ));
    }
    if config.journal.profit_column == config.journal.contracts_column {
        return Err(ConfigError::ValidationError(
            "journal.profit_column and journal.contracts_column must differ".to_string(),
        ));
    }

    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "logging.level must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_string("").unwrap();

        assert_eq!(config.simulation.initial_value, 300_000.0);
        assert_eq!(config.simulation.margin_call, 80_000.0);
        assert_eq!(config.simulation.yearly_trades, 100);
        assert_eq!(config.simulation.samples, 30);
        assert_eq!(config.simulation.slippage, 0.0);
        assert_eq!(config.simulation.commission, 0.0);
        assert_eq!(config.simulation.seed, None);
        assert_eq!(config.journal.data_dir, PathBuf::from("data"));
        assert_eq!(config.journal.profit_column, "profit");
        assert_eq!(config.journal.contracts_column, "contracts");
        assert!(config.parallel.enabled);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let yaml = r"
simulation:
  samples: 500
  slippage: 12.5
  seed: 7
logging:
  format: json
";
        let config = load_config_from_string(yaml).unwrap();

        assert_eq!(config.simulation.samples, 500);
        assert_eq!(config.simulation.slippage, 12.5);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.yearly_trades, 100);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_env_default_interpolation() {
        let yaml = "simulation:\n  samples: ${MONTE_CARLO_TEST_UNSET_SAMPLES:-250}\n";
        let config = load_config_from_string(yaml).unwrap();
        assert_eq!(config.simulation.samples, 250);
    }

    #[test]
    fn test_interpolation_without_default_is_empty() {
        assert_eq!(
            interpolate_env_vars("a${MONTE_CARLO_TEST_UNSET_VALUE}b"),
            "ab"
        );
    }

    #[test]
    fn test_zero_samples_rejected() {
        let err = load_config_from_string("simulation:\n  samples: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("samples"));
    }

    #[test]
    fn test_negative_commission_rejected() {
        let err = load_config_from_string("simulation:\n  commission: -1\n").unwrap_err();
        assert!(err.to_string().contains("commission"));
    }

    #[test]
    fn test_identical_columns_rejected() {
        let yaml = "journal:\n  profit_column: pnl\n  contracts_column: pnl\n";
        assert!(load_config_from_string(yaml).is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        let err = load_config_from_string("simulation: [unterminated").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulation:\n  initial_value: 50000\n  margin_call: 10000").unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.simulation.initial_value, 50_000.0);
        assert_eq!(config.simulation.params().margin_call, 10_000.0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("/nonexistent/monte-carlo.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_should_parallelize() {
        let config = ParallelConfig::default();
        assert!(!config.should_parallelize(10));
        assert!(config.should_parallelize(64));

        let disabled = ParallelConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(!disabled.should_parallelize(10_000));
    }
}
