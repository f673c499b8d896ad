//! Plot data hand-off
//!
//! Plotting happens outside this program. A run leaves `paths.json` next to
//! `results.json` with a sample of price paths and the terminal histograms,
//! which is enough to redraw the simulation figure.

use std::path::{Path, PathBuf};

use hestonmc_core::{Histogram, PathMatrix, histogram, payoff};
use serde::{Deserialize, Serialize};

use crate::report::RESULTS_FILE;
use crate::util::atomic_write;
use crate::util::io::remove_if_present;

pub const PATHS_FILE: &str = "paths.json";

/// Price paths drawn in the figure unless asked otherwise
pub const DEFAULT_SAMPLE_PATHS: usize = 40;

/// Plot histograms widen their bins rather than exceed this many
pub const MAX_PLOT_BINS: usize = 10_000;

/// Histogram as edges plus per-bin values, ready for a bar plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub edges: Vec<f64>,
    pub values: Vec<f64>,
}

impl HistogramSeries {
    fn counts(hist: &Histogram) -> Self {
        Self {
            edges: hist.edges(),
            values: hist.counts.iter().map(|&c| c as f64).collect(),
        }
    }

    fn densities(hist: &Histogram) -> Self {
        Self {
            edges: hist.edges(),
            values: hist.densities(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// Time of each column
    pub time: Vec<f64>,
    /// First few simulated price paths
    pub paths: Vec<Vec<f64>>,
    pub mean_terminal: f64,
    /// Terminal price counts
    pub terminal: HistogramSeries,
    /// Terminal payoff densities
    pub payoff: HistogramSeries,
}

impl PlotData {
    /// Collect plot data from a simulated matrix
    pub fn from_paths(
        paths: &PathMatrix,
        strike: f64,
        bin_width: f64,
        sample_paths: usize,
    ) -> color_eyre::Result<Self> {
        let terminal = paths.terminal_values();
        let payoffs = payoff(&terminal, strike);

        Ok(Self {
            time: paths.time_grid(),
            paths: paths.sample_rows(sample_paths).map(<[f64]>::to_vec).collect(),
            mean_terminal: terminal.iter().sum::<f64>() / terminal.len() as f64,
            terminal: HistogramSeries::counts(&full_range_histogram(&terminal, bin_width)?),
            payoff: HistogramSeries::densities(&full_range_histogram(&payoffs, bin_width)?),
        })
    }

    /// Write as JSON to `{dir}/paths.json`
    pub fn write(&self, dir: &Path) -> color_eyre::Result<PathBuf> {
        let path = dir.join(PATHS_FILE);
        atomic_write(&path, &serde_json::to_string(self)?)?;
        tracing::info!(path = %path.display(), paths = self.paths.len(), "wrote plot data");
        Ok(path)
    }
}

fn full_range_histogram(values: &[f64], bin_width: f64) -> color_eyre::Result<Histogram> {
    let (lower, upper) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let width = bin_width.max((upper - lower) / (MAX_PLOT_BINS - 1) as f64);
    if width > bin_width {
        tracing::debug!(bin_width, width, "widened plot histogram bins");
    }
    Ok(histogram(values, lower, upper, width)?)
}

/// Delete outputs left by a previous run in `dir`
pub fn remove_previous_outputs(dir: &Path) -> std::io::Result<()> {
    for path in remove_if_present(dir, &[RESULTS_FILE, PATHS_FILE])? {
        tracing::debug!(path = %path.display(), "removed previous output");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestonmc_core::{FixedShocks, ParametersBuilder, SeededShocks, simulate};

    #[test]
    fn test_plot_data_shape() {
        let params = ParametersBuilder::new().paths(100).steps(20).build().unwrap();
        let paths = simulate(&params, &SeededShocks::new(3)).unwrap();
        let plot = PlotData::from_paths(&paths, params.strike, 0.02, DEFAULT_SAMPLE_PATHS).unwrap();

        assert_eq!(plot.time.len(), 21);
        assert_eq!(plot.time[0], 0.0);
        assert_eq!(plot.paths.len(), 40);
        assert!(plot.paths.iter().all(|row| row.len() == 21));
        assert_eq!(plot.paths[7], paths.row(7));

        assert_eq!(plot.terminal.edges.len(), plot.terminal.values.len() + 1);
        assert_eq!(plot.terminal.values.iter().sum::<f64>(), 100.0);

        let width = plot.payoff.edges[1] - plot.payoff.edges[0];
        let area: f64 = plot.payoff.values.iter().map(|d| d * width).sum();
        assert!((area - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_larger_than_run() {
        let params = ParametersBuilder::new().paths(3).steps(5).build().unwrap();
        let paths = simulate(&params, &FixedShocks::zero()).unwrap();
        let plot = PlotData::from_paths(&paths, params.strike, 0.02, 40).unwrap();
        assert_eq!(plot.paths.len(), 3);
        assert_eq!(plot.terminal.values, vec![3.0]);
    }

    #[test]
    fn test_wide_price_range_widens_plot_bins() {
        let params = ParametersBuilder::new()
            .spot(1.0e6)
            .strike(1.0e6)
            .paths(200)
            .steps(10)
            .build()
            .unwrap();
        let paths = simulate(&params, &SeededShocks::new(11)).unwrap();
        let plot = PlotData::from_paths(&paths, params.strike, 0.02, 5).unwrap();

        assert!(plot.terminal.values.len() <= MAX_PLOT_BINS);
        assert_eq!(plot.terminal.values.iter().sum::<f64>(), 200.0);
        assert!(plot.terminal.edges[1] - plot.terminal.edges[0] > 0.02);
    }

    #[test]
    fn test_write_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();
        let params = ParametersBuilder::new().paths(5).steps(4).build().unwrap();
        let paths = simulate(&params, &SeededShocks::new(1)).unwrap();
        let plot = PlotData::from_paths(&paths, params.strike, 0.02, 2).unwrap();

        let written = plot.write(dir.path()).unwrap();
        let read: PlotData =
            serde_json::from_str(&std::fs::read_to_string(&written).unwrap()).unwrap();
        assert_eq!(read, plot);

        std::fs::write(dir.path().join(RESULTS_FILE), "{}").unwrap();
        std::fs::write(dir.path().join("settings.yaml"), "r: 0.01").unwrap();
        remove_previous_outputs(dir.path()).unwrap();

        assert!(!dir.path().join(PATHS_FILE).exists());
        assert!(!dir.path().join(RESULTS_FILE).exists());
        assert!(dir.path().join("settings.yaml").exists());

        // Nothing left to remove is fine
        remove_previous_outputs(dir.path()).unwrap();
    }
}
