use std::fmt;

/// Parameter set failed validation; nothing was simulated.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A scalar parameter is NaN or infinite
    NonFinite { parameter: &'static str, value: f64 },
    /// A parameter that must be strictly positive is not
    NotPositive { parameter: &'static str, value: f64 },
    /// A parameter that must be non-negative is negative
    Negative { parameter: &'static str, value: f64 },
    /// A count (paths or steps) is zero
    ZeroCount { parameter: &'static str },
    /// The correlation mixture has no regimes
    EmptyMixture,
    /// A regime's rho lies outside [-1, 1]
    RhoOutOfRange { index: usize, rho: f64 },
    /// A regime repeats an earlier regime's rho
    DuplicateRho { index: usize, rho: f64 },
    /// A regime has a negative or non-finite probability
    InvalidProbability { index: usize, probability: f64 },
    /// Mixture probabilities do not sum to one
    ProbabilitySum { sum: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonFinite { parameter, value } => {
                write!(f, "{parameter} must be finite (got {value})")
            }
            ConfigError::NotPositive { parameter, value } => {
                write!(f, "{parameter} must be > 0 (got {value})")
            }
            ConfigError::Negative { parameter, value } => {
                write!(f, "{parameter} must be >= 0 (got {value})")
            }
            ConfigError::ZeroCount { parameter } => write!(f, "{parameter} must be at least 1"),
            ConfigError::EmptyMixture => {
                write!(f, "correlation mixture must contain at least one regime")
            }
            ConfigError::RhoOutOfRange { index, rho } => {
                write!(f, "rho_{index} must lie in [-1, 1] (got {rho})")
            }
            ConfigError::DuplicateRho { index, rho } => {
                write!(f, "rho_{index} repeats an earlier regime (rho = {rho})")
            }
            ConfigError::InvalidProbability { index, probability } => {
                write!(
                    f,
                    "rho_probability_{index} must be a finite non-negative number (got {probability})"
                )
            }
            ConfigError::ProbabilitySum { sum } => {
                write!(f, "correlation mixture probabilities must sum to 1 (got {sum})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while building the path matrix
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    /// The `paths × (steps + 1)` matrix could not be allocated
    Allocation { paths: usize, steps: usize },
    /// A path produced NaN or infinity; `step` is the first offending column
    NonFinite { path: usize, step: usize },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "invalid parameters: {e}"),
            SimulationError::Allocation { paths, steps } => write!(
                f,
                "cannot allocate price matrix for {paths} paths x {} columns",
                steps.saturating_add(1)
            ),
            SimulationError::NonFinite { path, step } => write!(
                f,
                "path {path} became non-finite at step {step}; parameters are numerically degenerate"
            ),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        SimulationError::Config(e)
    }
}

/// Errors from the statistical reducer
#[derive(Debug, Clone, PartialEq)]
pub enum ReductionError {
    EmptyInput,
    InvalidBinWidth(f64),
    InvalidRange { lower: f64, upper: f64 },
    TooManyBins { bins: u64 },
    NonFiniteValue { index: usize, value: f64 },
}

impl fmt::Display for ReductionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionError::EmptyInput => write!(f, "cannot reduce an empty sample"),
            ReductionError::InvalidBinWidth(w) => {
                write!(f, "bin width must be finite and > 0 (got {w})")
            }
            ReductionError::InvalidRange { lower, upper } => {
                write!(f, "histogram range [{lower}, {upper}] is empty or not finite")
            }
            ReductionError::TooManyBins { bins } => {
                write!(f, "histogram would need {bins} bins; use a wider bin")
            }
            ReductionError::NonFiniteValue { index, value } => {
                write!(f, "sample {index} is not finite ({value})")
            }
        }
    }
}

impl std::error::Error for ReductionError {}

/// Errors from the end-to-end pricing driver
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    Simulation(SimulationError),
    Reduction(ReductionError),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::Simulation(e) => write!(f, "{e}"),
            PricingError::Reduction(e) => write!(f, "reduction failed: {e}"),
        }
    }
}

impl std::error::Error for PricingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PricingError::Simulation(e) => Some(e),
            PricingError::Reduction(e) => Some(e),
        }
    }
}

impl From<SimulationError> for PricingError {
    fn from(e: SimulationError) -> Self {
        PricingError::Simulation(e)
    }
}

impl From<ConfigError> for PricingError {
    fn from(e: ConfigError) -> Self {
        PricingError::Simulation(SimulationError::Config(e))
    }
}

impl From<ReductionError> for PricingError {
    fn from(e: ReductionError) -> Self {
        PricingError::Reduction(e)
    }
}
