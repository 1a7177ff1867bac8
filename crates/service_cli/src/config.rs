//! Configuration management.
//!
//! Loads `trs.toml` with environment variable override support:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `TRS_LOG_LEVEL` | `log_level` |
//! | `TRS_SEED` | `simulation.seed` |
//! | `TRS_NUM_SIMULATIONS` | `simulation.num_simulations` |
//! | `TRS_BENCHMARK_RATE` | `defaults.benchmark_rate` |

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use trs_core::defaults::DEFAULT_NUM_SIMULATIONS;
use trs_core::ValidationError;
use trs_market::{MarketDefaults, Quote, StaticMarketData};
use trs_pricing::mc::{Drift, SimulationConfig, DEFAULT_CHUNK_SIZE};
use trs_risk::{DecisionEngine, DecisionThresholds};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "trs.toml";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error type
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),
    /// Parse error in config file or environment
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation errors, all of them
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Drift convention as written in configuration: `zero`, `benchmark` or a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriftSetting {
    /// Named convention
    Named(NamedDrift),
    /// Fixed annual drift
    Fixed(f64),
}

/// Named drift conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedDrift {
    /// Zero drift
    Zero,
    /// Benchmark rate (risk-neutral)
    Benchmark,
}

impl Default for DriftSetting {
    fn default() -> Self {
        Self::Named(NamedDrift::Benchmark)
    }
}

impl From<DriftSetting> for Drift {
    fn from(setting: DriftSetting) -> Self {
        match setting {
            DriftSetting::Named(NamedDrift::Zero) => Drift::Zero,
            DriftSetting::Named(NamedDrift::Benchmark) => Drift::Benchmark,
            DriftSetting::Fixed(mu) => Drift::Fixed(mu),
        }
    }
}

impl FromStr for DriftSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "zero" => Ok(Self::Named(NamedDrift::Zero)),
            "benchmark" => Ok(Self::Named(NamedDrift::Benchmark)),
            other => other.parse::<f64>().map(Self::Fixed).map_err(|_| {
                format!(
                    "invalid drift '{}': expected 'zero', 'benchmark' or a number",
                    s
                )
            }),
        }
    }
}

impl fmt::Display for DriftSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(NamedDrift::Zero) => f.write_str("zero"),
            Self::Named(NamedDrift::Benchmark) => f.write_str("benchmark"),
            Self::Fixed(mu) => write!(f, "{}", mu),
        }
    }
}

/// `[simulation]` section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Paths per run unless the request says otherwise
    pub num_simulations: usize,
    /// Master seed; absent for a fresh seed per run
    pub seed: Option<u64>,
    /// Drift convention
    pub drift: DriftSetting,
    /// Paths per RNG stream partition
    pub chunk_size: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            seed: None,
            drift: DriftSetting::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Pricer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrsConfig {
    /// Log level
    pub log_level: String,
    /// Monte Carlo settings
    pub simulation: SimulationSettings,
    /// Market-data fallbacks
    pub defaults: MarketDefaults,
    /// Decision thresholds
    pub decision: DecisionThresholds,
    /// Static quotes keyed by ticker
    pub market: BTreeMap<String, Quote>,
}

impl Default for TrsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            simulation: SimulationSettings::default(),
            defaults: MarketDefaults::default(),
            decision: DecisionThresholds::default(),
            market: BTreeMap::new(),
        }
    }
}

impl TrsConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from `path`, or built-in defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("TRS_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(seed) = lookup("TRS_SEED") {
            self.simulation.seed = Some(parse_env("TRS_SEED", &seed)?);
        }
        if let Some(n) = lookup("TRS_NUM_SIMULATIONS") {
            self.simulation.num_simulations = parse_env("TRS_NUM_SIMULATIONS", &n)?;
        }
        if let Some(rate) = lookup("TRS_BENCHMARK_RATE") {
            self.defaults.benchmark_rate = parse_env("TRS_BENCHMARK_RATE", &rate)?;
        }
        Ok(self)
    }

    /// Validate the configuration, reporting every problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, VALID_LOG_LEVELS
            ));
        }

        if self.simulation.num_simulations == 0 {
            errors.push("simulation.num_simulations must be greater than 0".to_string());
        }
        if let Err(e) = self.simulation_config() {
            errors.push(format!("simulation: {}", e));
        }
        if let Err(e) = self.defaults.validate() {
            errors.push(e.to_string());
        }
        if let Err(e) = self.decision.validate() {
            errors.push(format!("decision: {}", e));
        }

        for (ticker, quote) in &self.market {
            if ticker.trim().is_empty() {
                errors.push("market: ticker cannot be empty".to_string());
            }
            if let Some(price) = quote.price {
                if !(price.is_finite() && price > 0.0) {
                    errors.push(format!("market.{}: price {} must be positive", ticker, price));
                }
            }
            if quote.closes.iter().any(|c| !(c.is_finite() && *c > 0.0)) {
                errors.push(format!("market.{}: closes must all be positive", ticker));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Simulation configuration
    pub fn simulation_config(&self) -> Result<SimulationConfig, ValidationError> {
        SimulationConfig::builder()
            .maybe_seed(self.simulation.seed)
            .drift(self.simulation.drift.into())
            .chunk_size(self.simulation.chunk_size)
            .build()
    }

    /// Quote book built from the `[market]` tables
    pub fn market_data(&self) -> StaticMarketData {
        StaticMarketData::from_quotes(self.market.iter().map(|(t, q)| (t, q.clone())))
            .with_lookback_days(self.defaults.lookback_days)
    }

    /// Decision engine with the configured thresholds
    pub fn decision_engine(&self) -> Result<DecisionEngine, ValidationError> {
        DecisionEngine::new(self.decision.clone())
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Parse(format!("{}: cannot parse '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use trs_market::MarketDataProvider;

    const SAMPLE: &str = r#"
        log_level = "debug"

        [simulation]
        num_simulations = 5000
        seed = 42
        drift = "zero"

        [defaults]
        funding_spread = 0.02

        [decision]
        npv_green = 0.015

        [market.MSFT]
        price = 420.0
        dividend_yield = 0.008
        volatility = 0.24

        [market.MSFT.profile]
        sector = "Technology"
        market_cap = 3.1e12
    "#;

    #[test]
    fn test_default_config_is_valid() {
        let config = TrsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.num_simulations, 1000);
        assert_eq!(config.simulation.drift, DriftSetting::default());
    }

    #[test]
    fn test_parse_sample() {
        let config = TrsConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.simulation.num_simulations, 5000);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.drift, DriftSetting::Named(NamedDrift::Zero));
        assert_eq!(config.simulation.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.defaults.funding_spread, 0.02);
        assert_eq!(config.defaults.volatility, 0.25);
        assert_eq!(config.decision.npv_green, 0.015);
        assert_eq!(config.decision.var_green, 0.40);
        assert!(config.validate().is_ok());

        let book = config.market_data();
        assert_eq!(book.fetch_current_price("msft").unwrap(), 420.0);
    }

    #[test]
    fn test_numeric_drift() {
        let config = TrsConfig::from_toml_str("[simulation]\ndrift = 0.07").unwrap();
        assert_eq!(config.simulation.drift, DriftSetting::Fixed(0.07));
        assert_eq!(
            config.simulation_config().unwrap().drift(),
            Drift::Fixed(0.07)
        );
    }

    #[test]
    fn test_drift_from_str() {
        assert_eq!(
            "Benchmark".parse::<DriftSetting>().unwrap(),
            DriftSetting::Named(NamedDrift::Benchmark)
        );
        assert_eq!("0.03".parse::<DriftSetting>().unwrap(), DriftSetting::Fixed(0.03));
        assert!("sideways".parse::<DriftSetting>().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TRS_LOG_LEVEL", "warn"),
            ("TRS_SEED", "7"),
            ("TRS_NUM_SIMULATIONS", "250"),
            ("TRS_BENCHMARK_RATE", "0.04"),
        ]
        .into_iter()
        .collect();
        let config = TrsConfig::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.num_simulations, 250);
        assert_eq!(config.defaults.benchmark_rate, 0.04);
    }

    #[test]
    fn test_malformed_env_value() {
        let err = TrsConfig::default()
            .with_overrides(|k| (k == "TRS_SEED").then(|| "abc".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("TRS_SEED")));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = TrsConfig::default();
        config.log_level = "loud".to_string();
        config.simulation.num_simulations = 0;
        config.simulation.chunk_size = 0;
        config.decision.baseline_tenor = -1.0;
        config
            .market
            .insert("BAD".to_string(), Quote::with_price(-5.0));

        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 5, "{:?}", errors);
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_decision_bands_rejected() {
        let toml = r#"
        [decision]
        var_green = 0.60
        var_yellow = 0.40
        "#;
        let config = TrsConfig::from_toml_str(toml).unwrap();
        match config.validate() {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("var_green"), "{}", errors[0]);
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config =
            TrsConfig::load_or_default(Path::new("/nonexistent/trs-config.toml")).unwrap();
        assert_eq!(config.log_level, "info");
    }
}
