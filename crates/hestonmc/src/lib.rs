//! Command-line front end for the Heston Monte Carlo pricer
//!
//! Reads a settings table, prices the call with `hestonmc_core`, prints the
//! summary and leaves `results.json` and `paths.json` behind for plotting.

pub mod export;
pub mod logging;
pub mod report;
pub mod settings;
pub mod util;

pub use export::{PlotData, remove_previous_outputs};
pub use logging::init_logging;
pub use report::{ResultsFile, format_report};
pub use settings::{RunSettings, load_settings};
