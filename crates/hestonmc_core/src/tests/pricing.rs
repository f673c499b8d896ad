//! Tests for turning simulated paths into call prices
//!
//! These tests verify:
//! - Deterministic paths give the closed-form discounted payoff
//! - Out-of-the-money deterministic paths price at zero
//! - The report carries counts and standard errors consistently

use crate::config::ParametersBuilder;
use crate::error::{PricingError, SimulationError};
use crate::pricing::{price_european_call, summarize};
use crate::reduce::{DEFAULT_BIN_WIDTH, discount};
use crate::shocks::{FixedShocks, SeededShocks};
use crate::simulation::simulate_with_metrics;

#[test]
fn test_deterministic_in_the_money_call() {
    let params = ParametersBuilder::new()
        .rate(0.04)
        .spot(2.0)
        .strike(1.9)
        .paths(10)
        .steps(20)
        .build()
        .unwrap();

    let report = price_european_call(&params, &FixedShocks::zero(), DEFAULT_BIN_WIDTH).unwrap();

    let terminal = 2.0 * (1.0 + 0.04 * params.dt()).powi(20);
    let expected_payoff = terminal - 1.9;
    assert!((report.price.mean - terminal).abs() < 1e-12);
    assert!(report.price.std_dev < 1e-12);
    assert!((report.expected_payoff - expected_payoff).abs() < 1e-12);
    assert!((report.option_price - discount(expected_payoff, 0.04, 1.0)).abs() < 1e-12);
    assert!(report.option_standard_error < 1e-12);
    assert!((report.price.mode - (terminal + DEFAULT_BIN_WIDTH / 2.0)).abs() < 1e-12);
}

#[test]
fn test_deterministic_out_of_the_money_call_is_worthless() {
    let params = ParametersBuilder::new()
        .rate(0.01)
        .strike(3.0)
        .paths(5)
        .steps(10)
        .build()
        .unwrap();

    let report = price_european_call(&params, &FixedShocks::zero(), 0.01).unwrap();
    assert_eq!(report.expected_payoff, 0.0);
    assert_eq!(report.option_price, 0.0);
    assert_eq!(report.payoff.mode, 0.005);
}

#[test]
fn test_report_counts_and_errors() {
    let params = ParametersBuilder::new().paths(2_500).steps(40).build().unwrap();
    let (paths, metrics) = simulate_with_metrics(&params, &SeededShocks::new(4)).unwrap();
    let report = summarize(&params, &paths, metrics.clone(), DEFAULT_BIN_WIDTH).unwrap();

    assert_eq!(report.num_paths, 2_500);
    assert_eq!(report.num_steps, 40);
    assert_eq!(report.total_samples(), 100_000);
    assert_eq!(report.metrics, metrics);
    assert_eq!(report.price.count, 2_500);
    assert!((report.price.standard_error - report.price.std_dev / 50.0).abs() < 1e-15);
    assert!(report.payoff.mean >= 0.0);
    assert!(report.option_price <= report.expected_payoff);
    assert!(report.option_standard_error < report.payoff.standard_error);
    assert!((report.cost_to_cover(2_000_000.0) - report.option_price * 2_000_000.0).abs() < 1e-6);
}

#[test]
fn test_bad_bin_width_surfaces_as_reduction_error() {
    let params = ParametersBuilder::new().paths(10).steps(5).build().unwrap();
    let err = price_european_call(&params, &SeededShocks::new(1), -1.0).unwrap_err();
    assert!(matches!(err, PricingError::Reduction(_)));
}

#[test]
fn test_config_error_stops_pricing() {
    let params = ParametersBuilder::new().paths(0).build_unchecked();
    let err = price_european_call(&params, &SeededShocks::new(1), 0.02).unwrap_err();
    assert!(matches!(
        err,
        PricingError::Simulation(SimulationError::Config(_))
    ));
}

#[test]
fn test_large_spot_prices_at_default_bin_width() {
    // Terminal prices spread over millions of 0.02-wide bins
    let params = ParametersBuilder::new()
        .spot(1.0e6)
        .strike(1.0e6)
        .paths(2_000)
        .steps(50)
        .build()
        .unwrap();

    let report = price_european_call(&params, &SeededShocks::new(6), DEFAULT_BIN_WIDTH).unwrap();
    assert!(report.option_price > 0.0 && report.option_price < params.initial_price);
    assert!(report.price.mode >= report.price.mean - 10.0 * report.price.std_dev);
    assert!(report.price.mode <= report.price.mean + 10.0 * report.price.std_dev);
}
