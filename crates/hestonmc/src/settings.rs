//! Settings table ingestion
//!
//! A settings file is a flat YAML mapping of named scalars, one per parameter:
//!
//! ```yaml
//! r: 0.0319
//! K: 2.0
//! So: 2.0
//! T: 1.0
//! Vo: 0.010201
//! sigma: 0.61
//! theta: 0.019
//! kappa: 6.21
//! n_rho: 3
//! rho_0: -0.5
//! rho_1: -0.7
//! rho_2: -0.9
//! rho_probability_0: 0.25
//! rho_probability_1: 0.5
//! rho_probability_2: 0.25
//! m: 160000
//! n: 400
//! # optional
//! bin_width: 0.02
//! notional: 2000000
//! ```
//!
//! Here the table's shape is checked (every key present, counts integral)
//! along with the run-level `bin_width` and `notional`. Model parameter ranges
//! are the engine's business.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use hestonmc_core::model::{CorrelationMixture, CorrelationRegime};
use hestonmc_core::{DEFAULT_BIN_WIDTH, SimulationParameters};

/// Gallons covered by the hedge unless the settings say otherwise
pub const DEFAULT_NOTIONAL: f64 = 2_000_000.0;

const SCALAR_KEYS: [&str; 11] = [
    "r", "K", "So", "T", "Vo", "sigma", "theta", "kappa", "n_rho", "m", "n",
];
const OPTIONAL_KEYS: [&str; 2] = ["bin_width", "notional"];

/// Error types for settings ingestion
#[derive(Debug)]
pub enum SettingsError {
    Io(String),
    Parse(String),
    MissingKey(String),
    NotAnInteger { key: String, value: f64 },
    InvalidValue { key: String, value: f64 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(msg) => write!(f, "IO error: {msg}"),
            SettingsError::Parse(msg) => write!(f, "Parse error: {msg}"),
            SettingsError::MissingKey(key) => write!(f, "settings are missing `{key}`"),
            SettingsError::NotAnInteger { key, value } => {
                write!(f, "`{key}` must be a non-negative whole number (got {value})")
            }
            SettingsError::InvalidValue { key, value } => {
                write!(f, "`{key}` must be finite and positive (got {value})")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

/// Everything needed for one pricing run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub params: SimulationParameters,
    /// Histogram bin width for mode estimates
    pub bin_width: f64,
    /// Units of the underlying to cover (gallons for the fuel hedge)
    pub notional: f64,
}

impl RunSettings {
    /// The built-in fuel hedge run
    #[must_use]
    pub fn preset() -> Self {
        Self {
            params: SimulationParameters::fuel_hedge(),
            bin_width: DEFAULT_BIN_WIDTH,
            notional: DEFAULT_NOTIONAL,
        }
    }

    /// Check the run-level values the engine does not see. Model parameters
    /// are checked by [`SimulationParameters::validate`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (key, value) in [("bin_width", self.bin_width), ("notional", self.notional)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::InvalidValue {
                    key: key.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Read and parse a settings file
pub fn load_settings(path: &Path) -> Result<RunSettings, SettingsError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| SettingsError::Io(format!("{}: {e}", path.display())))?;
    let settings = parse_settings(&content)?;
    tracing::info!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Parse a settings table from YAML text
pub fn parse_settings(yaml: &str) -> Result<RunSettings, SettingsError> {
    let table: BTreeMap<String, f64> =
        serde_saphyr::from_str(yaml).map_err(|e| SettingsError::Parse(e.to_string()))?;
    from_table(&table)
}

/// Build run settings from named scalars
pub fn from_table(table: &BTreeMap<String, f64>) -> Result<RunSettings, SettingsError> {
    let get = |key: &str| {
        table
            .get(key)
            .copied()
            .ok_or_else(|| SettingsError::MissingKey(key.to_string()))
    };
    let count = |key: &str| get(key).and_then(|value| as_count(key, value));

    let n_rho = count("n_rho")?;
    // Not preallocated: n_rho is untrusted
    let mut regimes = Vec::new();
    for i in 0..n_rho {
        regimes.push(CorrelationRegime::new(
            get(&format!("rho_{i}"))?,
            get(&format!("rho_probability_{i}"))?,
        ));
    }

    warn_unknown_keys(table, n_rho);

    let params = SimulationParameters {
        risk_free_rate: get("r")?,
        initial_price: get("So")?,
        strike: get("K")?,
        horizon: get("T")?,
        initial_variance: get("Vo")?,
        vol_of_vol: get("sigma")?,
        long_run_variance: get("theta")?,
        mean_reversion_speed: get("kappa")?,
        correlation_mixture: CorrelationMixture::new(regimes),
        num_paths: count("m")?,
        num_steps: count("n")?,
    };

    let settings = RunSettings {
        params,
        bin_width: table.get("bin_width").copied().unwrap_or(DEFAULT_BIN_WIDTH),
        notional: table.get("notional").copied().unwrap_or(DEFAULT_NOTIONAL),
    };
    settings.validate()?;
    Ok(settings)
}

fn as_count(key: &str, value: f64) -> Result<usize, SettingsError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64 {
        Ok(value as usize)
    } else {
        Err(SettingsError::NotAnInteger {
            key: key.to_string(),
            value,
        })
    }
}

fn warn_unknown_keys(table: &BTreeMap<String, f64>, n_rho: usize) {
    for key in table.keys() {
        let known = SCALAR_KEYS.contains(&key.as_str())
            || OPTIONAL_KEYS.contains(&key.as_str())
            || regime_index(key).is_some_and(|i| i < n_rho);
        if !known {
            tracing::warn!(key = %key, "ignoring unknown settings key");
        }
    }
}

fn regime_index(key: &str) -> Option<usize> {
    key.strip_prefix("rho_probability_")
        .or_else(|| key.strip_prefix("rho_"))
        .and_then(|i| i.parse().ok())
}
