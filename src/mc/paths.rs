//! Simulated Spot Paths
//!
//! A [`PathSet`] is an `(n_paths, n_steps + 1)` matrix of spots: row `i` is
//! path `i` for the whole pricing run, column `t` is observation date
//! `t * dt`, and column 0 holds the initial spot for every path.

use crate::error::{validation::*, PricingError, PricingResult};
use crate::models::gbm::Gbm;
use crate::rng::{self, RngFactory};
use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PathSet {
    spots: Array2<f64>,
    dt: f64,
}

impl PathSet {
    /// Wrap a caller-built spot matrix spanning `[0, maturity]`.
    ///
    /// Every entry must be finite and strictly positive, the matrix needs at
    /// least one path and one step, and all paths must share the initial spot.
    pub fn from_array(spots: Array2<f64>, maturity: f64) -> PricingResult<Self> {
        validate_positive("t", maturity)?;
        validate_finite("t", maturity)?;

        let (n_paths, n_cols) = spots.dim();
        if n_paths == 0 || n_cols < 2 {
            return Err(PricingError::InvalidPathSet {
                reason: format!(
                    "need at least one path and one step, got shape ({}, {})",
                    n_paths, n_cols
                ),
            });
        }
        if let Some(bad) = spots.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return Err(PricingError::InvalidPathSet {
                reason: format!("spot {} is not strictly positive and finite", bad),
            });
        }
        let s0 = spots[[0, 0]];
        if spots.column(0).iter().any(|&s| s != s0) {
            return Err(PricingError::InvalidPathSet {
                reason: "all paths must start from the same initial spot".to_string(),
            });
        }

        let dt = maturity / (n_cols - 1) as f64;
        Ok(PathSet { spots, dt })
    }

    pub fn n_paths(&self) -> usize {
        self.spots.nrows()
    }

    pub fn n_steps(&self) -> usize {
        self.spots.ncols() - 1
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn maturity(&self) -> f64 {
        self.dt * self.n_steps() as f64
    }

    pub fn s0(&self) -> f64 {
        self.spots[[0, 0]]
    }

    /// Cross-section of all paths at observation `step`
    pub fn spots_at(&self, step: usize) -> ArrayView1<'_, f64> {
        self.spots.column(step)
    }

    pub fn spot(&self, path: usize, step: usize) -> f64 {
        self.spots[[path, step]]
    }

    /// Full trajectory of one path
    pub fn path(&self, path: usize) -> ArrayView1<'_, f64> {
        self.spots.row(path)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.spots
    }
}

/// Simulate `n_paths` GBM trajectories observed at `n_steps` equal intervals
/// over `[0, t]`.
///
/// # Algorithm
///
/// Path `i` takes its normal draws from `factory.create_std_rng(i)` and is
/// advanced with the exact lognormal transition
/// ```text
/// S_{k+1} = S_k * exp((r - σ²/2)dt + σ√dt * Z_k)
/// ```
/// Rows are filled in parallel with rayon when `parallel` is set; because
/// every row owns its stream the result is bit-identical either way.
///
/// # Errors
///
/// `InvalidParameters`/`InvalidConfiguration` for a non-positive maturity or
/// zero counts, `NumericalInstability` if the parameters overflow or
/// underflow a spot.
pub fn simulate_gbm_paths(
    model: &Gbm,
    t: f64,
    n_paths: usize,
    n_steps: usize,
    factory: &RngFactory,
    parallel: bool,
) -> PricingResult<PathSet> {
    validate_positive("t", t)?;
    validate_finite("t", t)?;
    validate_paths(n_paths)?;
    validate_steps(n_steps)?;
    validate_path_cells(n_paths, n_steps)?;

    let dt = t / n_steps as f64;
    let mut spots = Array2::<f64>::zeros((n_paths, n_steps + 1));

    let fill_path = |i: usize, mut row: ArrayViewMut1<f64>| {
        let mut rng = factory.create_std_rng(i as u64);
        let mut current_s = model.s0;
        row[0] = current_s;
        for step in 1..=n_steps {
            let z = rng::get_normal_draw(&mut rng);
            current_s = model.exact_step(current_s, dt, z);
            row[step] = current_s;
        }
    };

    if parallel {
        spots
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, row)| fill_path(i, row));
    } else {
        spots
            .axis_iter_mut(Axis(0))
            .enumerate()
            .for_each(|(i, row)| fill_path(i, row));
    }

    if let Some(bad) = spots.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
        return Err(PricingError::NumericalInstability {
            method: "GBM path simulation".to_string(),
            reason: format!("simulated spot {} left (0, inf)", bad),
        });
    }

    Ok(PathSet { spots, dt })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn gbm() -> Gbm {
        Gbm::new(100.0, 0.05, 0.2).unwrap()
    }

    #[test]
    fn test_shape_and_initial_column() {
        let paths = simulate_gbm_paths(&gbm(), 1.0, 64, 10, &RngFactory::new(1), false).unwrap();
        assert_eq!(paths.n_paths(), 64);
        assert_eq!(paths.n_steps(), 10);
        assert_eq!(paths.as_array().dim(), (64, 11));
        assert!(paths.spots_at(0).iter().all(|&s| s == 100.0));
        assert!(paths.as_array().iter().all(|&s| s > 0.0));
        assert_relative_eq!(paths.dt(), 0.1);
        assert_relative_eq!(paths.maturity(), 1.0);
    }

    #[test]
    fn test_parallel_and_sequential_are_bit_identical() {
        let factory = RngFactory::new(42);
        let seq = simulate_gbm_paths(&gbm(), 1.0, 500, 20, &factory, false).unwrap();
        let par = simulate_gbm_paths(&gbm(), 1.0, 500, 20, &factory, true).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_rows_are_stable_when_more_paths_are_added() {
        let factory = RngFactory::new(9);
        let small = simulate_gbm_paths(&gbm(), 1.0, 10, 5, &factory, true).unwrap();
        let large = simulate_gbm_paths(&gbm(), 1.0, 20, 5, &factory, true).unwrap();
        for i in 0..10 {
            assert_eq!(small.path(i), large.path(i));
        }
    }

    #[test]
    fn test_terminal_mean_matches_forward() {
        let paths =
            simulate_gbm_paths(&gbm(), 1.0, 200_000, 4, &RngFactory::new(3), true).unwrap();
        let terminal = paths.spots_at(4);
        let mean = terminal.sum() / terminal.len() as f64;
        let forward = 100.0 * 0.05_f64.exp();
        assert!(
            (mean - forward).abs() / forward < 0.005,
            "terminal mean {} vs forward {}",
            mean,
            forward
        );
    }

    #[test]
    fn test_invalid_arguments_fail_fast() {
        let factory = RngFactory::new(1);
        assert!(simulate_gbm_paths(&gbm(), 0.0, 10, 10, &factory, false).is_err());
        assert!(simulate_gbm_paths(&gbm(), 1.0, 0, 10, &factory, false).is_err());
        assert!(simulate_gbm_paths(&gbm(), 1.0, 10, 0, &factory, false).is_err());
        assert!(simulate_gbm_paths(&gbm(), 1.0, 100_000_000, 100_000, &factory, false).is_err());
    }

    #[test]
    fn test_from_array_validation() {
        assert!(PathSet::from_array(array![[100.0, 101.0], [100.0, 99.0]], 1.0).is_ok());
        assert!(PathSet::from_array(array![[100.0, -1.0]], 1.0).is_err());
        assert!(PathSet::from_array(array![[100.0, 101.0], [99.0, 99.0]], 1.0).is_err());
        assert!(PathSet::from_array(array![[100.0], [100.0]], 1.0).is_err());
        assert!(PathSet::from_array(array![[100.0, 101.0]], 0.0).is_err());
    }
}
