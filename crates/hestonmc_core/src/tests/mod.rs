//! Integration tests for the Heston simulation engine
//!
//! Tests are organized by topic:
//! - `engine` - Path shape, initial column, variance absorption, degenerate cases
//! - `mixture` - Per-path correlation draws and their frequencies
//! - `pricing` - Reduction of simulated paths into call prices
//! - `scenario` - The fuel-hedge scenario end to end

mod pricing;
