//! Correlation regimes sampled once per path

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Allowed deviation of the probability sum from one
pub const PROBABILITY_TOLERANCE: f64 = 1e-8;

/// One possible price/variance correlation and its probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRegime {
    pub rho: f64,
    pub probability: f64,
}

impl CorrelationRegime {
    #[must_use]
    pub const fn new(rho: f64, probability: f64) -> Self {
        Self { rho, probability }
    }
}

/// Categorical distribution over correlation values.
///
/// Every simulated path draws one `rho` from this mixture and keeps it for its
/// whole lifetime, so the price/variance correlation varies across paths but
/// not along a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMixture {
    regimes: Vec<CorrelationRegime>,
}

impl CorrelationMixture {
    #[must_use]
    pub fn new(regimes: Vec<CorrelationRegime>) -> Self {
        Self { regimes }
    }

    /// Mixture with a single regime of probability one
    #[must_use]
    pub fn fixed(rho: f64) -> Self {
        Self::new(vec![CorrelationRegime::new(rho, 1.0)])
    }

    /// Build from parallel `rho` / probability slices
    #[must_use]
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(rho, probability)| CorrelationRegime::new(rho, probability))
                .collect(),
        )
    }

    #[must_use]
    pub fn regimes(&self) -> &[CorrelationRegime] {
        &self.regimes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regimes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regimes.is_empty()
    }

    /// Whether `rho` is exactly one of the configured choices
    #[must_use]
    pub fn contains(&self, rho: f64) -> bool {
        self.regimes.iter().any(|r| r.rho == rho)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.regimes.is_empty() {
            return Err(ConfigError::EmptyMixture);
        }

        let mut sum = 0.0;
        for (index, regime) in self.regimes.iter().enumerate() {
            if !regime.rho.is_finite() || !(-1.0..=1.0).contains(&regime.rho) {
                return Err(ConfigError::RhoOutOfRange {
                    index,
                    rho: regime.rho,
                });
            }
            // Draws are attributed to regimes by rho value
            if self.regimes[..index].iter().any(|r| r.rho == regime.rho) {
                return Err(ConfigError::DuplicateRho {
                    index,
                    rho: regime.rho,
                });
            }
            if !regime.probability.is_finite() || regime.probability < 0.0 {
                return Err(ConfigError::InvalidProbability {
                    index,
                    probability: regime.probability,
                });
            }
            sum += regime.probability;
        }

        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ConfigError::ProbabilitySum { sum });
        }
        Ok(())
    }

    /// Prepare a sampler. Fails on the same inputs `validate` rejects.
    pub fn sampler(&self) -> Result<MixtureSampler, ConfigError> {
        self.validate()?;
        let index = WeightedIndex::new(self.regimes.iter().map(|r| r.probability)).map_err(
            |_| ConfigError::ProbabilitySum {
                sum: self.regimes.iter().map(|r| r.probability).sum(),
            },
        )?;
        Ok(MixtureSampler {
            choices: self.regimes.iter().map(|r| r.rho).collect(),
            index,
        })
    }
}

/// Validated, ready-to-draw form of a [`CorrelationMixture`]
#[derive(Debug, Clone)]
pub struct MixtureSampler {
    choices: Vec<f64>,
    index: WeightedIndex<f64>,
}

impl MixtureSampler {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.choices[self.index.sample(rng)]
    }

    #[must_use]
    pub fn choices(&self) -> &[f64] {
        &self.choices
    }
}
