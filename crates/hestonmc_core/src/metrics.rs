//! Simulation metrics collection
//!
//! Counters gathered while evolving paths. They describe how often the
//! zero-variance absorption engaged and how the correlation regimes were
//! actually drawn, which is useful when judging whether a discretization is
//! fine enough for a given parameter set.

use serde::{Deserialize, Serialize};

/// What happened to a single path during evolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathOutcome {
    /// Correlation drawn for the path
    pub rho: f64,
    /// Steps at which the raw variance update went negative and was clipped
    pub variance_clips: u32,
    /// First column holding a NaN/infinite price or variance, if any
    pub first_non_finite: Option<usize>,
}

/// Draw count for one correlation regime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeCount {
    pub rho: f64,
    pub paths: usize,
}

/// Metrics collected during simulation execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub paths: usize,
    pub steps: usize,
    /// Total variance clips across all paths and steps
    pub variance_clips: u64,
    /// Paths whose variance was clipped at least once
    pub paths_hitting_zero: usize,
    /// Paths per correlation regime, in mixture order
    pub regime_counts: Vec<RegimeCount>,
}

impl SimulationMetrics {
    /// Create empty metrics with one zeroed counter per regime
    #[must_use]
    pub fn new(paths: usize, steps: usize, choices: &[f64]) -> Self {
        Self {
            paths,
            steps,
            variance_clips: 0,
            paths_hitting_zero: 0,
            regime_counts: choices
                .iter()
                .map(|&rho| RegimeCount { rho, paths: 0 })
                .collect(),
        }
    }

    /// Fold one path's outcome into the totals
    pub fn record_path(&mut self, outcome: &PathOutcome) {
        self.variance_clips += u64::from(outcome.variance_clips);
        if outcome.variance_clips > 0 {
            self.paths_hitting_zero += 1;
        }
        if let Some(count) = self
            .regime_counts
            .iter_mut()
            .find(|c| c.rho == outcome.rho)
        {
            count.paths += 1;
        }
    }

    /// Number of simulated (path, step) samples
    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.paths as u64 * self.steps as u64
    }

    /// Fraction of all steps at which the variance was clipped
    #[must_use]
    pub fn clip_rate(&self) -> f64 {
        let samples = self.total_samples();
        if samples == 0 {
            0.0
        } else {
            self.variance_clips as f64 / samples as f64
        }
    }

    /// Fraction of paths drawn for each regime, in mixture order
    #[must_use]
    pub fn regime_frequencies(&self) -> Vec<(f64, f64)> {
        let total = self.paths.max(1) as f64;
        self.regime_counts
            .iter()
            .map(|c| (c.rho, c.paths as f64 / total))
            .collect()
    }
}
