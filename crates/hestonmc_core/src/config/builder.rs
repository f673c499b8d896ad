//! Parameters Builder
//!
//! Fluent construction of [`SimulationParameters`]. Unset fields start from the
//! fuel-hedge preset; correlation regimes added with [`ParametersBuilder::regime`]
//! replace the preset's mixture.
//!
//! ```ignore
//! let params = ParametersBuilder::new()
//!     .spot(2.0)
//!     .strike(2.1)
//!     .regime(-0.6, 0.5)
//!     .regime(-0.8, 0.5)
//!     .paths(10_000)
//!     .build()?;
//! ```

use super::SimulationParameters;
use crate::error::ConfigError;
use crate::model::{CorrelationMixture, CorrelationRegime};

/// Builder for [`SimulationParameters`] that validates on `build`
#[derive(Debug, Clone)]
pub struct ParametersBuilder {
    params: SimulationParameters,
    regimes: Vec<CorrelationRegime>,
}

impl Default for ParametersBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParametersBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::from_parameters(SimulationParameters::fuel_hedge())
    }

    /// Start from an existing parameter set, keeping its mixture unless
    /// regimes are added
    #[must_use]
    pub fn from_parameters(params: SimulationParameters) -> Self {
        Self {
            params,
            regimes: Vec::new(),
        }
    }

    // =========================================================================
    // Market and contract
    // =========================================================================

    #[must_use]
    pub fn rate(mut self, r: f64) -> Self {
        self.params.risk_free_rate = r;
        self
    }

    #[must_use]
    pub fn spot(mut self, s0: f64) -> Self {
        self.params.initial_price = s0;
        self
    }

    #[must_use]
    pub fn strike(mut self, k: f64) -> Self {
        self.params.strike = k;
        self
    }

    /// Time to expiry in years
    #[must_use]
    pub fn horizon(mut self, years: f64) -> Self {
        self.params.horizon = years;
        self
    }

    // =========================================================================
    // Variance process
    // =========================================================================

    /// Set the starting variance and the long-run target together
    #[must_use]
    pub fn variance(mut self, initial: f64, long_run: f64) -> Self {
        self.params.initial_variance = initial;
        self.params.long_run_variance = long_run;
        self
    }

    #[must_use]
    pub fn initial_variance(mut self, v0: f64) -> Self {
        self.params.initial_variance = v0;
        self
    }

    #[must_use]
    pub fn long_run_variance(mut self, theta: f64) -> Self {
        self.params.long_run_variance = theta;
        self
    }

    #[must_use]
    pub fn mean_reversion(mut self, kappa: f64) -> Self {
        self.params.mean_reversion_speed = kappa;
        self
    }

    #[must_use]
    pub fn vol_of_vol(mut self, sigma: f64) -> Self {
        self.params.vol_of_vol = sigma;
        self
    }

    /// Add one correlation regime
    #[must_use]
    pub fn regime(mut self, rho: f64, probability: f64) -> Self {
        self.regimes.push(CorrelationRegime::new(rho, probability));
        self
    }

    /// Use a single, fixed correlation for every path
    #[must_use]
    pub fn rho(mut self, rho: f64) -> Self {
        self.regimes = vec![CorrelationRegime::new(rho, 1.0)];
        self
    }

    // =========================================================================
    // Discretization
    // =========================================================================

    #[must_use]
    pub fn paths(mut self, m: usize) -> Self {
        self.params.num_paths = m;
        self
    }

    #[must_use]
    pub fn steps(mut self, n: usize) -> Self {
        self.params.num_steps = n;
        self
    }

    /// Finish without validation
    #[must_use]
    pub fn build_unchecked(mut self) -> SimulationParameters {
        if !self.regimes.is_empty() {
            self.params.correlation_mixture = CorrelationMixture::new(self.regimes);
        }
        self.params
    }

    pub fn build(self) -> Result<SimulationParameters, ConfigError> {
        let params = self.build_unchecked();
        params.validate()?;
        Ok(params)
    }
}
