//! Cross-Sectional Least-Squares Regression
//!
//! # Mathematical Framework
//!
//! At an exercise date the continuation value is approximated by a polynomial
//! in the current spot:
//! ```text
//! C(S) ≈ β₀ + β₁x + β₂x² + ... + β_D x^D,   x = S / scale
//! ```
//! fitted by ordinary least squares of discounted realised cash flows `Y`
//! against the basis matrix `X`.
//!
//! # Numerics
//!
//! The system is solved through a singular value decomposition rather than the
//! normal equations `(XᵀX)β = XᵀY`, which square the condition number. Singular
//! values below `σ_max · RANK_TOL` are dropped, which gives the
//! minimum-norm (pseudo-inverse) solution when the columns are collinear, for
//! instance when every regressed path sits at the same spot or there are fewer
//! paths than coefficients. Dividing spots by `scale` spans the same
//! polynomial space as raw spot powers while keeping the columns comparable in
//! magnitude.

use crate::error::{validation::*, PricingResult};
use nalgebra::{DMatrix, DVector};
use tracing::warn;

/// Relative cutoff below which a singular value counts as zero.
pub const RANK_TOL: f64 = 1e-12;

/// Polynomial basis `1, x, ..., x^degree` over scaled spots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionBasis {
    degree: usize,
    scale: f64,
}

impl RegressionBasis {
    pub fn new(degree: usize, scale: f64) -> PricingResult<Self> {
        validate_basis_degree(degree)?;
        validate_positive("scale", scale)?;
        validate_finite("scale", scale)?;
        Ok(RegressionBasis { degree, scale })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn n_features(&self) -> usize {
        self.degree + 1
    }

    /// Feature matrix with one row per spot and `degree + 1` columns
    pub fn design_matrix(&self, spots: &[f64]) -> DMatrix<f64> {
        let mut x = DMatrix::<f64>::zeros(spots.len(), self.n_features());
        for (i, &s) in spots.iter().enumerate() {
            let scaled = s / self.scale;
            let mut power = 1.0;
            for j in 0..=self.degree {
                x[(i, j)] = power;
                power *= scaled;
            }
        }
        x
    }
}

/// Least-squares coefficients of `y` on the columns of `x`.
///
/// Never fails: an empty system yields zero coefficients, and a failed
/// decomposition is logged and also yields zero coefficients.
pub fn fit(x: &DMatrix<f64>, y: &[f64]) -> DVector<f64> {
    let n_features = x.ncols();
    if x.nrows() == 0 {
        return DVector::zeros(n_features);
    }
    debug_assert_eq!(x.nrows(), y.len());

    let svd = x.clone().svd(true, true);
    let eps = svd.singular_values.max() * RANK_TOL;
    let rhs = DVector::from_column_slice(y);

    match svd.solve(&rhs, eps) {
        Ok(beta) => beta,
        Err(reason) => {
            warn!(rows = x.nrows(), cols = n_features, reason, "least-squares solve failed");
            DVector::zeros(n_features)
        }
    }
}

/// Fitted values `X β`
pub fn predict(x: &DMatrix<f64>, coefficients: &DVector<f64>) -> Vec<f64> {
    (x * coefficients).iter().copied().collect()
}
