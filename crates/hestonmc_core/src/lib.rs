//! Heston stochastic-volatility Monte Carlo engine
//!
//! This crate simulates correlated price/variance paths under the Heston model
//! and reduces them to option-pricing statistics. It supports:
//! - Euler stepping with the variance absorbed at zero
//! - A per-path mixture of price/variance correlation regimes
//! - Injected, per-path seeded random streams (reproducible, thread-count independent)
//! - Mean, binned mode, standard deviation and standard error of terminal samples
//! - European call payoff and discounting
//!
//! ```ignore
//! use hestonmc_core::{SimulationParameters, SeededShocks, price_european_call};
//!
//! let params = SimulationParameters::fuel_hedge().with_paths(10_000);
//! let report = price_european_call(&params, &SeededShocks::new(42), 0.02)?;
//! println!("call = {:.4} +/- {:.4}", report.option_price, report.option_standard_error);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod metrics;
pub mod pricing;
pub mod reduce;
pub mod shocks;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ParametersBuilder, SimulationParameters};
pub use error::{ConfigError, PricingError, ReductionError, SimulationError};
pub use metrics::SimulationMetrics;
pub use model::{CorrelationMixture, CorrelationRegime, PathMatrix, PricingReport, ReductionSummary};
pub use pricing::{price_european_call, summarize};
pub use reduce::{DEFAULT_BIN_WIDTH, Histogram, discount, histogram, payoff, reduce};
pub use shocks::{FixedShocks, SeededShocks, ShockSource, ShockStream};
pub use simulation::{PathEvolver, StepRecord, simulate, simulate_with_metrics};
