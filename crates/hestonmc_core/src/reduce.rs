//! Statistical reduction of terminal samples
//!
//! Everything here is a pure function of its inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ReductionError;
use crate::model::ReductionSummary;

/// Bin width used for mode estimates unless the caller picks another
pub const DEFAULT_BIN_WIDTH: f64 = 0.02;

/// Upper bound on histogram size, to keep a tiny bin width from exhausting memory
pub const MAX_BINS: usize = 1 << 24;

/// Fixed-width histogram starting at `lower`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub lower: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Left edge of every bin plus the right edge of the last one
    #[must_use]
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.counts.len())
            .map(|i| self.lower + i as f64 * self.bin_width)
            .collect()
    }

    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        (0..self.counts.len())
            .map(|i| self.bin_center(i))
            .collect()
    }

    #[must_use]
    pub fn bin_center(&self, index: usize) -> f64 {
        self.lower + index as f64 * self.bin_width + self.bin_width / 2.0
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Counts normalized so the histogram integrates to one
    #[must_use]
    pub fn densities(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let norm = total as f64 * self.bin_width;
        self.counts.iter().map(|&c| c as f64 / norm).collect()
    }
}

/// Number of `bin_width`-wide bins covering `[lower, upper]`.
///
/// The last bin is closed, so when the span is an exact multiple `k` of the
/// width there are `k` bins and `upper` lands in bin `k - 1`. A zero span
/// still gets one bin. Saturates for spans too wide to count.
fn bin_count(lower: f64, upper: f64, bin_width: f64) -> u64 {
    (((upper - lower) / bin_width).ceil() as u64).max(1)
}

/// Bin of `x` counting from `lower`, with the top edge folded into `last`
fn bin_index(x: f64, lower: f64, bin_width: f64, last: u64) -> u64 {
    (((x - lower) / bin_width).floor() as u64).min(last)
}

/// Bin `values` into bins of `bin_width` starting at `lower`.
///
/// The bins are half-open except the last, which also takes `upper`; see
/// [`bin_count`] for how many there are. Values outside `[lower, upper]` are
/// ignored.
pub fn histogram(
    values: &[f64],
    lower: f64,
    upper: f64,
    bin_width: f64,
) -> Result<Histogram, ReductionError> {
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(ReductionError::InvalidBinWidth(bin_width));
    }
    if !lower.is_finite() || !upper.is_finite() || upper < lower {
        return Err(ReductionError::InvalidRange { lower, upper });
    }

    let bins = bin_count(lower, upper, bin_width);
    if bins > MAX_BINS as u64 {
        return Err(ReductionError::TooManyBins { bins });
    }
    let last = bins - 1;

    let mut counts = vec![0; bins as usize];
    for &x in values {
        if !(lower..=upper).contains(&x) {
            continue;
        }
        counts[bin_index(x, lower, bin_width, last) as usize] += 1;
    }

    Ok(Histogram {
        lower,
        bin_width,
        counts,
    })
}

/// Fullest bin of `values` over `[lower, upper]`, lowest bin on ties.
///
/// Only occupied bins are counted, so the cost does not depend on how many
/// bin widths the range spans.
fn peak_bin(values: &[f64], lower: f64, upper: f64, bin_width: f64) -> u64 {
    let last = bin_count(lower, upper, bin_width) - 1;
    let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
    for &x in values {
        *counts.entry(bin_index(x, lower, bin_width, last)).or_default() += 1;
    }

    // Ascending keys, so a strict comparison keeps the lowest bin on ties
    let mut best = (0, 0);
    for (&bin, &count) in &counts {
        if count > best.1 {
            best = (bin, count);
        }
    }
    best.0
}

/// Mean, population standard deviation, standard error and binned mode.
///
/// The mode is the center of the most populous `bin_width`-wide bin spanning
/// the sample's `[min, max]`, so its resolution is the bin width. Any finite,
/// non-empty sample reduces, however wide its range.
pub fn reduce(values: &[f64], bin_width: f64) -> Result<ReductionSummary, ReductionError> {
    if values.is_empty() {
        return Err(ReductionError::EmptyInput);
    }
    if !bin_width.is_finite() || bin_width <= 0.0 {
        return Err(ReductionError::InvalidBinWidth(bin_width));
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ReductionError::NonFiniteValue { index, value });
    }

    let count = values.len();
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    let peak = peak_bin(values, min, max, bin_width);
    let mode = min + peak as f64 * bin_width + bin_width / 2.0;

    Ok(ReductionSummary {
        mean,
        std_dev,
        standard_error: std_dev / n.sqrt(),
        mode,
        count,
    })
}

/// European call payoff `max(s_T - strike, 0)` for every terminal price
#[must_use]
pub fn payoff(terminal_prices: &[f64], strike: f64) -> Vec<f64> {
    terminal_prices
        .iter()
        .map(|&s| (s - strike).max(0.0))
        .collect()
}

/// Present value of an expected payoff: `expected_payoff * exp(-rate * horizon)`
#[must_use]
#[inline]
pub fn discount(expected_payoff: f64, rate: f64, horizon: f64) -> f64 {
    expected_payoff * (-rate * horizon).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_std_and_error() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let summary = reduce(&values, 0.5).unwrap();
        assert_eq!(summary.count, 4);
        assert!((summary.mean - 2.5).abs() < 1e-12);
        // population variance of 1..4 is 1.25
        assert!((summary.std_dev - 1.25_f64.sqrt()).abs() < 1e-12);
        assert!((summary.standard_error - 1.25_f64.sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mode_finds_engineered_peak() {
        let mut values = vec![0.0, 0.5, 1.0, 2.0, 3.0];
        values.extend(std::iter::repeat_n(1.234, 50));
        values.extend(std::iter::repeat_n(1.236, 25));
        let width = 0.02;
        let summary = reduce(&values, width).unwrap();
        assert!(
            (summary.mode - 1.235).abs() <= width / 2.0,
            "mode {}",
            summary.mode
        );
    }

    #[test]
    fn test_mode_of_constant_sample() {
        let summary = reduce(&[5.0; 10], 0.02).unwrap();
        assert!((summary.mode - 5.01).abs() < 1e-12);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_mode_tie_takes_lowest_bin() {
        let summary = reduce(&[0.0, 0.0, 1.0, 1.0], 0.5).unwrap();
        assert!((summary.mode - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_reduce_rejects_bad_input() {
        assert_eq!(reduce(&[], 0.1), Err(ReductionError::EmptyInput));
        assert_eq!(
            reduce(&[1.0], 0.0),
            Err(ReductionError::InvalidBinWidth(0.0))
        );
        assert!(matches!(
            reduce(&[1.0, f64::NAN], 0.1),
            Err(ReductionError::NonFiniteValue { index: 1, .. })
        ));
    }

    #[test]
    fn test_histogram_bins_and_edges() {
        let hist = histogram(&[0.0, 0.1, 0.25, 0.5, 0.6, 2.0], 0.0, 0.5, 0.25).unwrap();
        // [0, .25) [.25, .5]; the top edge joins the last bin, 0.6 is out of range
        assert_eq!(hist.counts, vec![2, 2]);
        assert_eq!(hist.edges(), vec![0.0, 0.25, 0.5]);
        assert_eq!(hist.centers(), vec![0.125, 0.375]);
        assert_eq!(hist.total(), 4);

        // A span that is not a whole number of widths rounds up
        let hist = histogram(&[0.0, 0.6], 0.0, 0.6, 0.25).unwrap();
        assert_eq!(hist.counts, vec![1, 0, 1]);
    }

    #[test]
    fn test_histogram_caps_bin_count() {
        assert!(matches!(
            histogram(&[0.0, 1.0e9], 0.0, 1.0e9, 1e-9),
            Err(ReductionError::TooManyBins { .. })
        ));
    }

    #[test]
    fn test_mode_over_a_very_wide_range() {
        // About 5e7 bins of width 0.02 between min and max
        let mut values = vec![0.0, 1.0e6];
        values.extend(std::iter::repeat_n(654_321.013, 3));
        let summary = reduce(&values, 0.02).unwrap();
        assert!((summary.mode - 654_321.01).abs() < 1e-6, "mode {}", summary.mode);
        assert_eq!(summary.count, 5);
    }

    #[test]
    fn test_mode_tie_at_top_edge() {
        // Span of exactly two widths: the maximum shares the upper bin
        let summary = reduce(&[0.0, 0.6, 1.0], 0.5).unwrap();
        assert!((summary.mode - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_densities_integrate_to_one() {
        let values: Vec<f64> = (0..100).map(|i| f64::from(i) / 100.0).collect();
        let hist = histogram(&values, 0.0, 1.0, 0.1).unwrap();
        let area: f64 = hist.densities().iter().map(|d| d * hist.bin_width).sum();
        assert!((area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_rejects_inverted_range() {
        assert!(matches!(
            histogram(&[1.0], 1.0, 0.0, 0.1),
            Err(ReductionError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_payoff_is_non_negative() {
        let prices = [0.5, 1.9, 2.0, 2.1, 3.5];
        let payoffs = payoff(&prices, 2.0);
        assert!(payoffs.iter().all(|&p| p >= 0.0));
        assert_eq!(payoffs[0], 0.0);
        assert_eq!(payoffs[2], 0.0);
        assert!((payoffs[3] - 0.1).abs() < 1e-12);
        assert!((payoffs[4] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_discount() {
        assert!((discount(1.0, 0.05, 2.0) - (-0.1_f64).exp()).abs() < 1e-15);
        assert_eq!(discount(0.3, 0.0, 5.0), 0.3);
    }
}
