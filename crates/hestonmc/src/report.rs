//! Console report and results file

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use hestonmc_core::{PricingReport, SimulationParameters};
use serde::{Deserialize, Serialize};

use crate::util::{atomic_write, format_count, format_dollars};

pub const RESULTS_FILE: &str = "results.json";

/// Render the human-readable summary of a pricing run
#[must_use]
pub fn format_report(report: &PricingReport, elapsed: Duration, notional: f64) -> String {
    let price = &report.price;
    let payoff = &report.payoff;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(
        out,
        "Expected price:  {} +/- {}.",
        format_dollars(price.mean, 4),
        format_dollars(price.standard_error, 4)
    );
    let _ = writeln!(
        out,
        "Expected payoff: {} +/- {}.",
        format_dollars(report.expected_payoff, 4),
        format_dollars(payoff.standard_error, 4)
    );
    let _ = writeln!(
        out,
        " => Option price: {} +/- {}.",
        format_dollars(report.option_price, 4),
        format_dollars(report.option_standard_error, 4)
    );
    let _ = writeln!(
        out,
        "Total price to cover {} units is {}.\n",
        format_count(notional.max(0.0).round() as u64),
        format_dollars(report.cost_to_cover(notional), 0)
    );

    let _ = writeln!(
        out,
        "Price Mean, Mode, STD:  {}, {}, {}.",
        format_dollars(price.mean, 4),
        format_dollars(price.mode, 4),
        format_dollars(price.std_dev, 4)
    );
    let _ = writeln!(
        out,
        "Payoff Mean, Mode, STD: {}, {}, {}.\n",
        format_dollars(payoff.mean, 4),
        format_dollars(payoff.mode, 4),
        format_dollars(payoff.std_dev, 4)
    );

    let _ = writeln!(out, "Simulation time: {:.1} seconds.", elapsed.as_secs_f64());
    let _ = writeln!(out, "Number of time steps:  {}.", format_count(report.num_steps as u64));
    let _ = writeln!(out, "Number of simulations: {}.", format_count(report.num_paths as u64));
    let _ = writeln!(out, "Total number samples:  {}.", format_count(report.total_samples()));

    let metrics = &report.metrics;
    let _ = writeln!(
        out,
        "Variance clipped at zero: {} times on {} paths ({:.3}% of samples).",
        format_count(metrics.variance_clips),
        format_count(metrics.paths_hitting_zero as u64),
        metrics.clip_rate() * 100.0
    );

    out
}

/// Everything a later run or a plotting step needs to reproduce this one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    pub parameters: SimulationParameters,
    pub seed: u64,
    pub bin_width: f64,
    pub notional: f64,
    pub cost_to_cover: f64,
    pub elapsed_seconds: f64,
    pub report: PricingReport,
}

impl ResultsFile {
    #[must_use]
    pub fn new(
        parameters: &SimulationParameters,
        seed: u64,
        bin_width: f64,
        notional: f64,
        elapsed: Duration,
        report: &PricingReport,
    ) -> Self {
        Self {
            parameters: parameters.clone(),
            seed,
            bin_width,
            notional,
            cost_to_cover: report.cost_to_cover(notional),
            elapsed_seconds: elapsed.as_secs_f64(),
            report: report.clone(),
        }
    }

    /// Write as pretty JSON to `{dir}/results.json`
    pub fn write(&self, dir: &Path) -> color_eyre::Result<()> {
        let path = dir.join(RESULTS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        atomic_write(&path, &json)?;
        tracing::info!(path = %path.display(), "wrote results");
        Ok(())
    }

    pub fn read(dir: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(dir.join(RESULTS_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hestonmc_core::{FixedShocks, ParametersBuilder, price_european_call};

    fn deterministic_report() -> (SimulationParameters, PricingReport) {
        let params = ParametersBuilder::new()
            .rate(0.0)
            .spot(2.5)
            .strike(2.0)
            .paths(4)
            .steps(10)
            .build()
            .unwrap();
        let report = price_european_call(&params, &FixedShocks::zero(), 0.02).unwrap();
        (params, report)
    }

    #[test]
    fn test_report_lines() {
        let (_, report) = deterministic_report();
        let text = format_report(&report, Duration::from_millis(1_300), 2_000_000.0);

        assert!(text.contains("Expected price:  $2.5000 +/- $0.0000."));
        assert!(text.contains("Expected payoff: $0.5000 +/- $0.0000."));
        assert!(text.contains(" => Option price: $0.5000 +/- $0.0000."));
        assert!(text.contains("Total price to cover 2,000,000 units is $1,000,000."));
        assert!(text.contains("Payoff Mean, Mode, STD: $0.5000, $0.5100, $0.0000."));
        assert!(text.contains("Simulation time: 1.3 seconds."));
        assert!(text.contains("Number of time steps:  10."));
        assert!(text.contains("Number of simulations: 4."));
        assert!(text.contains("Total number samples:  40."));
        assert!(text.contains("Variance clipped at zero: 0 times on 0 paths"));
    }

    #[test]
    fn test_results_file_round_trip() {
        let (params, report) = deterministic_report();
        let dir = tempfile::tempdir().unwrap();
        let results = ResultsFile::new(&params, 99, 0.02, 1_000.0, Duration::from_secs(2), &report);

        assert_eq!(results.cost_to_cover, 500.0);
        results.write(dir.path()).unwrap();

        assert!(!dir.path().join("results.json.tmp").exists());
        assert_eq!(ResultsFile::read(dir.path()).unwrap(), results);
    }
}
