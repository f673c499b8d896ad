//! European call pricing from simulated paths

use tracing::info;

use crate::config::SimulationParameters;
use crate::error::{PricingError, ReductionError};
use crate::metrics::SimulationMetrics;
use crate::model::{PathMatrix, PricingReport};
use crate::reduce::{discount, payoff, reduce};
use crate::shocks::ShockSource;
use crate::simulation::simulate_with_metrics;

/// Simulate and price a European call in one call.
pub fn price_european_call<S: ShockSource>(
    params: &SimulationParameters,
    shocks: &S,
    bin_width: f64,
) -> Result<PricingReport, PricingError> {
    let (paths, metrics) = simulate_with_metrics(params, shocks)?;
    Ok(summarize(params, &paths, metrics, bin_width)?)
}

/// Reduce an already simulated matrix to a [`PricingReport`].
///
/// Terminal prices and call payoffs are both reduced with `bin_width`; the
/// expected payoff is discounted at the risk-free rate over the horizon.
pub fn summarize(
    params: &SimulationParameters,
    paths: &PathMatrix,
    metrics: SimulationMetrics,
    bin_width: f64,
) -> Result<PricingReport, ReductionError> {
    let terminal = paths.terminal_values();
    let price = reduce(&terminal, bin_width)?;

    let payoffs = payoff(&terminal, params.strike);
    let payoff = reduce(&payoffs, bin_width)?;

    let discount_factor = discount(1.0, params.risk_free_rate, params.horizon);
    let option_price = payoff.mean * discount_factor;

    info!(
        expected_price = price.mean,
        expected_payoff = payoff.mean,
        option_price,
        "priced European call"
    );

    Ok(PricingReport {
        price,
        payoff,
        expected_payoff: payoff.mean,
        option_price,
        option_standard_error: payoff.standard_error * discount_factor,
        num_paths: paths.num_paths(),
        num_steps: paths.num_steps(),
        metrics,
    })
}
