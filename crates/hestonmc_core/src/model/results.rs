//! Output types produced by the reducer and the pricing driver

use serde::{Deserialize, Serialize};

use crate::metrics::SimulationMetrics;

/// Summary statistics of one terminal sample (prices or payoffs)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReductionSummary {
    pub mean: f64,
    /// Population standard deviation (divides by the sample count)
    pub std_dev: f64,
    /// `std_dev / sqrt(count)`
    pub standard_error: f64,
    /// Center of the most populous histogram bin
    pub mode: f64,
    pub count: usize,
}

/// Complete result of pricing a European call by simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingReport {
    /// Terminal underlying price statistics
    pub price: ReductionSummary,
    /// Terminal call payoff statistics
    pub payoff: ReductionSummary,
    /// Mean payoff before discounting
    pub expected_payoff: f64,
    /// Discounted expected payoff
    pub option_price: f64,
    /// Payoff standard error carried through the discount factor
    pub option_standard_error: f64,
    pub num_paths: usize,
    pub num_steps: usize,
    pub metrics: SimulationMetrics,
}

impl PricingReport {
    /// Number of simulated (path, step) samples
    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.num_paths as u64 * self.num_steps as u64
    }

    /// Premium for `units` of the underlying at the simulated option price
    #[must_use]
    pub fn cost_to_cover(&self, units: f64) -> f64 {
        self.option_price * units
    }
}
