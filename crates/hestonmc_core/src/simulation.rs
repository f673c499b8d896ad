//! Heston path simulation
//!
//! Euler discretization of
//!
//! ```text
//! dS = r S dt + sqrt(V) S dW_s
//! dV = kappa (theta - V) dt + sigma sqrt(V) dW_v
//! ```
//!
//! with `dW_s = rho dW_v + sqrt(1 - rho^2) dW_i` and `rho` drawn once per path
//! from the correlation mixture. After each step the variance is absorbed at
//! zero. Paths are independent; the time recurrence within a path is not.

use tracing::{debug, warn};

use crate::config::SimulationParameters;
use crate::error::SimulationError;
use crate::metrics::{PathOutcome, SimulationMetrics};
use crate::model::{MixtureSampler, PathMatrix};
use crate::shocks::{ShockSource, ShockStream};

#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, ParallelIterator};

/// State seen by an observer after each step of [`PathEvolver::evolve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Index of the column just written (1..=steps)
    pub step: usize,
    /// `v + dv` before absorption at zero; may be negative
    pub raw_variance: f64,
    /// Variance carried into the next step; never negative unless NaN
    pub variance: f64,
    pub price: f64,
}

/// Precomputed per-step coefficients for one parameter set
#[derive(Debug, Clone, Copy)]
pub struct PathEvolver {
    rate: f64,
    kappa: f64,
    theta: f64,
    sigma: f64,
    s0: f64,
    v0: f64,
    steps: usize,
    dt: f64,
    sqrt_dt: f64,
}

impl PathEvolver {
    #[must_use]
    pub fn new(params: &SimulationParameters) -> Self {
        let dt = params.dt();
        Self {
            rate: params.risk_free_rate,
            kappa: params.mean_reversion_speed,
            theta: params.long_run_variance,
            sigma: params.vol_of_vol,
            s0: params.initial_price,
            v0: params.initial_variance,
            steps: params.num_steps,
            dt,
            sqrt_dt: dt.sqrt(),
        }
    }

    /// Evolve one path into `row` (length `steps + 1`), calling `observe` after
    /// every step.
    ///
    /// Both increments use the variance from the start of the step; the
    /// clipped variance only takes effect at the next step.
    pub fn evolve<S, F>(
        &self,
        mixture: &MixtureSampler,
        stream: &mut S,
        row: &mut [f64],
        mut observe: F,
    ) -> PathOutcome
    where
        S: ShockStream + ?Sized,
        F: FnMut(StepRecord),
    {
        debug_assert_eq!(row.len(), self.steps + 1);

        let rho = stream.correlation(mixture);
        let orthogonal = (1.0 - rho * rho).sqrt();

        let mut outcome = PathOutcome {
            rho,
            variance_clips: 0,
            first_non_finite: None,
        };

        row[0] = self.s0;
        let mut v = self.v0;

        for t in 0..self.steps {
            let (z_v, z_i) = stream.next_pair();
            let dw_v = z_v * self.sqrt_dt;
            let dw_i = z_i * self.sqrt_dt;
            let dw_s = rho * dw_v + orthogonal * dw_i;

            let s = row[t];
            let sqrt_v = v.sqrt();
            let dv = self.kappa * (self.theta - v) * self.dt + self.sigma * sqrt_v * dw_v;
            let ds = self.rate * s * self.dt + sqrt_v * s * dw_s;

            let raw = v + dv;
            // NaN must survive the clip so it can be detected below
            v = if raw < 0.0 {
                outcome.variance_clips += 1;
                0.0
            } else {
                raw
            };

            let next = s + ds;
            row[t + 1] = next;

            if outcome.first_non_finite.is_none() && !(next.is_finite() && v.is_finite()) {
                outcome.first_non_finite = Some(t + 1);
            }

            observe(StepRecord {
                step: t + 1,
                raw_variance: raw,
                variance: v,
                price: next,
            });
        }

        outcome
    }
}

/// Simulate every path and return the `paths × (steps + 1)` price matrix.
pub fn simulate<S: ShockSource>(
    params: &SimulationParameters,
    shocks: &S,
) -> Result<PathMatrix, SimulationError> {
    simulate_with_metrics(params, shocks).map(|(paths, _)| paths)
}

/// Like [`simulate`], also returning clip and regime counters.
///
/// Parameters are validated before anything is allocated. A path that turns
/// NaN or infinite fails the whole run with [`SimulationError::NonFinite`]
/// naming the lowest such path.
pub fn simulate_with_metrics<S: ShockSource>(
    params: &SimulationParameters,
    shocks: &S,
) -> Result<(PathMatrix, SimulationMetrics), SimulationError> {
    params.validate()?;
    let sampler = params.correlation_mixture.sampler()?;
    let evolver = PathEvolver::new(params);

    let mut paths = PathMatrix::try_zeroed(params.num_paths, params.num_steps, params.horizon)?;
    debug!(
        paths = params.num_paths,
        steps = params.num_steps,
        dt = evolver.dt,
        "simulating Heston paths"
    );

    let outcomes = run_paths(&mut paths, &evolver, &sampler, shocks);
    collect_outcomes(params, &sampler, &outcomes).map(|metrics| (paths, metrics))
}

fn collect_outcomes(
    params: &SimulationParameters,
    sampler: &MixtureSampler,
    outcomes: &[PathOutcome],
) -> Result<SimulationMetrics, SimulationError> {
    if let Some((path, step)) = outcomes
        .iter()
        .enumerate()
        .find_map(|(i, o)| o.first_non_finite.map(|step| (i, step)))
    {
        warn!(path, step, "simulation produced a non-finite value");
        return Err(SimulationError::NonFinite { path, step });
    }

    let mut metrics = SimulationMetrics::new(params.num_paths, params.num_steps, sampler.choices());
    for outcome in outcomes {
        metrics.record_path(outcome);
    }
    debug!(
        variance_clips = metrics.variance_clips,
        paths_hitting_zero = metrics.paths_hitting_zero,
        "simulation complete"
    );
    Ok(metrics)
}

#[cfg(feature = "parallel")]
fn run_paths<S: ShockSource>(
    paths: &mut PathMatrix,
    evolver: &PathEvolver,
    sampler: &MixtureSampler,
    shocks: &S,
) -> Vec<PathOutcome> {
    paths
        .par_rows_mut()
        .enumerate()
        .map(|(i, row)| {
            let mut stream = shocks.stream(i);
            evolver.evolve(sampler, &mut stream, row, |_| {})
        })
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_paths<S: ShockSource>(
    paths: &mut PathMatrix,
    evolver: &PathEvolver,
    sampler: &MixtureSampler,
    shocks: &S,
) -> Vec<PathOutcome> {
    run_paths_serial(paths, evolver, sampler, shocks)
}

#[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
pub(crate) fn run_paths_serial<S: ShockSource>(
    paths: &mut PathMatrix,
    evolver: &PathEvolver,
    sampler: &MixtureSampler,
    shocks: &S,
) -> Vec<PathOutcome> {
    paths
        .rows_mut()
        .enumerate()
        .map(|(i, row)| {
            let mut stream = shocks.stream(i);
            evolver.evolve(sampler, &mut stream, row, |_| {})
        })
        .collect()
}

/// Serial variant of [`simulate`], used to check thread-count independence
#[cfg(test)]
pub(crate) fn simulate_serial<S: ShockSource>(
    params: &SimulationParameters,
    shocks: &S,
) -> Result<PathMatrix, SimulationError> {
    params.validate()?;
    let sampler = params.correlation_mixture.sampler()?;
    let evolver = PathEvolver::new(params);
    let mut paths = PathMatrix::try_zeroed(params.num_paths, params.num_steps, params.horizon)?;
    let outcomes = run_paths_serial(&mut paths, &evolver, &sampler, shocks);
    collect_outcomes(params, &sampler, &outcomes)?;
    Ok(paths)
}
