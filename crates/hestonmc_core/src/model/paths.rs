//! Dense storage for simulated price paths

use crate::error::SimulationError;

/// `paths × (steps + 1)` matrix of simulated prices, stored row-major.
///
/// Row `i` is one path; column `t` is the price at time `t * dt`. Column 0 holds
/// the initial price for every path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatrix {
    paths: usize,
    steps: usize,
    horizon: f64,
    data: Vec<f64>,
}

impl PathMatrix {
    /// Allocate a zeroed matrix, reporting allocation failure instead of aborting.
    pub(crate) fn try_zeroed(
        paths: usize,
        steps: usize,
        horizon: f64,
    ) -> Result<Self, SimulationError> {
        let alloc_err = SimulationError::Allocation { paths, steps };
        let len = steps
            .checked_add(1)
            .and_then(|cols| cols.checked_mul(paths))
            .ok_or_else(|| alloc_err.clone())?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| alloc_err)?;
        data.resize(len, 0.0);

        Ok(Self {
            paths,
            steps,
            horizon,
            data,
        })
    }

    /// `(paths, steps + 1)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.paths, self.steps + 1)
    }

    #[must_use]
    pub fn num_paths(&self) -> usize {
        self.paths
    }

    #[must_use]
    pub fn num_steps(&self) -> usize {
        self.steps
    }

    /// Width of one time step in years
    #[must_use]
    pub fn dt(&self) -> f64 {
        self.horizon / self.steps as f64
    }

    #[must_use]
    pub fn row(&self, path: usize) -> &[f64] {
        let cols = self.steps + 1;
        &self.data[path * cols..(path + 1) * cols]
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, f64> {
        let cols = self.steps + 1;
        self.data.chunks_exact_mut(cols)
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn par_rows_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, f64> {
        use rayon::slice::ParallelSliceMut;
        let cols = self.steps + 1;
        self.data.par_chunks_exact_mut(cols)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.steps + 1)
    }

    #[must_use]
    pub fn get(&self, path: usize, step: usize) -> f64 {
        self.data[path * (self.steps + 1) + step]
    }

    /// Every path's price at column `step`
    #[must_use]
    pub fn column(&self, step: usize) -> Vec<f64> {
        self.rows().map(|row| row[step]).collect()
    }

    /// Prices at the horizon
    #[must_use]
    pub fn terminal_values(&self) -> Vec<f64> {
        self.column(self.steps)
    }

    /// Times in years for each column, from 0 to the horizon
    #[must_use]
    pub fn time_grid(&self) -> Vec<f64> {
        let dt = self.dt();
        (0..=self.steps).map(|t| t as f64 * dt).collect()
    }

    /// The first `count` paths (fewer if the matrix is smaller)
    pub fn sample_rows(&self, count: usize) -> impl Iterator<Item = &[f64]> {
        self.rows().take(count)
    }

    /// Raw row-major storage
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
