//! Random inputs for the path simulation
//!
//! The engine never owns a global generator. It asks a [`ShockSource`] for one
//! [`ShockStream`] per path, and each stream yields that path's correlation draw
//! followed by one pair of unit normal shocks per time step. Because the stream
//! depends only on the path index, results are identical whether paths run
//! serially or across threads.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::model::MixtureSampler;

/// Per-path supply of correlation and Brownian shocks
pub trait ShockStream {
    /// Draw the path's price/variance correlation. Called once, before any step.
    fn correlation(&mut self, mixture: &MixtureSampler) -> f64;

    /// Unit-variance `(variance shock, independent shock)` for the next step.
    /// The engine scales both by `sqrt(dt)`.
    fn next_pair(&mut self) -> (f64, f64);
}

/// Factory of independent per-path streams
pub trait ShockSource: Sync {
    type Stream: ShockStream;

    fn stream(&self, path: usize) -> Self::Stream;
}

/// Pseudo-random shocks; every path gets its own sub-stream derived from
/// `(seed, path)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededShocks {
    pub seed: u64,
}

impl SeededShocks {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from operating-system entropy (non-reproducible runs)
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }
}

impl ShockSource for SeededShocks {
    type Stream = SeededStream;

    fn stream(&self, path: usize) -> SeededStream {
        SeededStream {
            rng: SmallRng::seed_from_u64(path_seed(self.seed, path as u64)),
        }
    }
}

/// Stream handed out by [`SeededShocks`]
#[derive(Debug, Clone)]
pub struct SeededStream {
    rng: SmallRng,
}

impl ShockStream for SeededStream {
    fn correlation(&mut self, mixture: &MixtureSampler) -> f64 {
        mixture.sample(&mut self.rng)
    }

    #[inline]
    fn next_pair(&mut self) -> (f64, f64) {
        let dw_v: f64 = self.rng.sample(StandardNormal);
        let dw_i: f64 = self.rng.sample(StandardNormal);
        (dw_v, dw_i)
    }
}

/// Deterministic shocks: the same unit pair at every step, and always the
/// first correlation regime. Zero shocks reduce the model to pure drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedShocks {
    pub variance: f64,
    pub independent: f64,
}

impl FixedShocks {
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            variance: 0.0,
            independent: 0.0,
        }
    }
}

impl ShockSource for FixedShocks {
    type Stream = FixedShocks;

    fn stream(&self, _path: usize) -> FixedShocks {
        *self
    }
}

impl ShockStream for FixedShocks {
    fn correlation(&mut self, mixture: &MixtureSampler) -> f64 {
        mixture.choices()[0]
    }

    fn next_pair(&mut self) -> (f64, f64) {
        (self.variance, self.independent)
    }
}

// splitmix64 finalizer
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn path_seed(seed: u64, path: u64) -> u64 {
    mix(mix(seed) ^ path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CorrelationMixture;

    #[test]
    fn test_streams_are_reproducible() {
        let source = SeededShocks::new(42);
        let mut a = source.stream(3);
        let mut b = source.stream(3);
        for _ in 0..100 {
            assert_eq!(a.next_pair(), b.next_pair());
        }
    }

    #[test]
    fn test_paths_get_distinct_streams() {
        let source = SeededShocks::new(42);
        let mut a = source.stream(0);
        let mut b = source.stream(1);
        assert_ne!(a.next_pair(), b.next_pair());

        let mut c = SeededShocks::new(43).stream(0);
        let mut d = source.stream(0);
        assert_ne!(c.next_pair(), d.next_pair());
    }

    #[test]
    fn test_path_seed_mixes_both_inputs() {
        assert_ne!(path_seed(0, 1), path_seed(1, 0));
        assert_ne!(path_seed(7, 0), path_seed(7, 1));
    }

    #[test]
    fn test_normal_moments() {
        let mut stream = SeededShocks::new(5).stream(0);
        let n = 200_000;
        let (mut sum, mut sum_sq) = (0.0, 0.0);
        for _ in 0..n {
            let (v, i) = stream.next_pair();
            sum += v + i;
            sum_sq += v * v + i * i;
        }
        let count = (2 * n) as f64;
        let mean = sum / count;
        let var = sum_sq / count - mean * mean;
        assert!(mean.abs() < 0.01, "mean {mean}");
        assert!((var - 1.0).abs() < 0.02, "variance {var}");
    }

    #[test]
    fn test_fixed_shocks_use_first_regime() {
        let sampler = CorrelationMixture::from_pairs(&[(-0.4, 0.5), (0.4, 0.5)])
            .sampler()
            .unwrap();
        let mut stream = FixedShocks::zero().stream(9);
        assert_eq!(stream.correlation(&sampler), -0.4);
        assert_eq!(stream.next_pair(), (0.0, 0.0));
    }
}
