//! Simulation parameters
//!
//! `SimulationParameters` carries everything the engine needs for one run. It
//! is plain data: construct it directly, through [`ParametersBuilder`], or from
//! a preset such as [`SimulationParameters::fuel_hedge`], then call
//! [`SimulationParameters::validate`] (the engine also validates on entry).
//!
//! ```ignore
//! use hestonmc_core::config::ParametersBuilder;
//!
//! let params = ParametersBuilder::new()
//!     .spot(100.0)
//!     .strike(105.0)
//!     .horizon(0.5)
//!     .variance(0.04, 0.04)
//!     .mean_reversion(2.0)
//!     .vol_of_vol(0.3)
//!     .rho(-0.7)
//!     .paths(50_000)
//!     .steps(250)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::CorrelationMixture;

pub mod builder;

pub use builder::ParametersBuilder;

/// Heston model, contract and discretization inputs for one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    // === Market ===
    /// Annualized risk-free rate `r`
    pub risk_free_rate: f64,
    /// Initial underlying price `S0`
    pub initial_price: f64,

    // === Contract ===
    /// Call strike `K`
    pub strike: f64,
    /// Time to expiry `T` in years
    pub horizon: f64,

    // === Variance process ===
    /// Starting variance `V0`
    pub initial_variance: f64,
    /// Volatility of variance `sigma`
    pub vol_of_vol: f64,
    /// Mean-reversion target `theta`
    pub long_run_variance: f64,
    /// Mean-reversion speed `kappa`
    pub mean_reversion_speed: f64,
    /// Per-path price/variance correlation regimes
    pub correlation_mixture: CorrelationMixture,

    // === Discretization ===
    /// Number of simulated paths `m`
    pub num_paths: usize,
    /// Number of time steps `n`
    pub num_steps: usize,
}

impl SimulationParameters {
    /// Fuel-price hedge scenario: an at-the-money one-year call on fuel at
    /// $2.00/gallon with three correlation regimes, 400 steps and 400² paths.
    #[must_use]
    pub fn fuel_hedge() -> Self {
        let num_steps = 400;
        Self {
            risk_free_rate: 0.0319,
            initial_price: 2.0,
            strike: 2.0,
            horizon: 1.0,
            initial_variance: 0.010201,
            vol_of_vol: 0.61,
            long_run_variance: 0.019,
            mean_reversion_speed: 6.21,
            correlation_mixture: CorrelationMixture::from_pairs(&[
                (-0.5, 0.25),
                (-0.7, 0.5),
                (-0.9, 0.25),
            ]),
            num_paths: num_steps * num_steps,
            num_steps,
        }
    }

    /// Time step `T / n`
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.horizon / self.num_steps as f64
    }

    #[must_use]
    pub fn with_paths(mut self, num_paths: usize) -> Self {
        self.num_paths = num_paths;
        self
    }

    #[must_use]
    pub fn with_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    /// Check every precondition of the engine.
    ///
    /// Returns the first violation found; parameters that pass are safe to
    /// simulate (numerical blow-up from extreme but valid values is detected
    /// later by the engine).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_paths == 0 {
            return Err(ConfigError::ZeroCount {
                parameter: "num_paths",
            });
        }
        if self.num_steps == 0 {
            return Err(ConfigError::ZeroCount {
                parameter: "num_steps",
            });
        }

        finite("risk_free_rate", self.risk_free_rate)?;
        positive("initial_price", self.initial_price)?;
        positive("strike", self.strike)?;
        positive("horizon", self.horizon)?;
        non_negative("initial_variance", self.initial_variance)?;
        non_negative("vol_of_vol", self.vol_of_vol)?;
        non_negative("long_run_variance", self.long_run_variance)?;
        non_negative("mean_reversion_speed", self.mean_reversion_speed)?;

        self.correlation_mixture.validate()
    }
}

fn finite(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { parameter, value })
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(parameter, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { parameter, value })
    }
}

fn non_negative(parameter: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(parameter, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { parameter, value })
    }
}
