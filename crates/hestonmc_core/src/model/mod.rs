//! Domain types shared by the engine and the reducer

mod mixture;
mod paths;
mod results;

pub use mixture::{CorrelationMixture, CorrelationRegime, MixtureSampler, PROBABILITY_TOLERANCE};
pub use paths::PathMatrix;
pub use results::{PricingReport, ReductionSummary};
