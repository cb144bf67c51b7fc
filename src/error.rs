// src/error.rs
use thiserror::Error;

/// Error types for the LSM pricer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// A caller-supplied path matrix breaks the path set invariants
    #[error("Invalid path set: {reason}")]
    InvalidPathSet { reason: String },

    /// Numerical instability or non-finite result
    #[error("Numerical instability in {method}: {reason}")]
    NumericalInstability { method: String, reason: String },
}

/// Result type alias for pricer operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{PricingError, PricingResult};

    /// Largest supported regression degree. Powers beyond this carry no
    /// information in double precision.
    pub const MAX_BASIS_DEGREE: usize = 15;

    /// Largest spot matrix, in cells, a single run may allocate (2 GB of f64).
    pub const MAX_PATH_CELLS: usize = 250_000_000;

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricingResult<()> {
        if value.is_nan() || value <= 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PricingResult<()> {
        if value.is_nan() || value < 0.0 {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricingResult<()> {
        if !value.is_finite() {
            Err(PricingError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> PricingResult<()> {
        if paths == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if paths > 100_000_000 {
            Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (100 million)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> PricingResult<()> {
        if steps == 0 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else if steps > 100_000 {
            Err(PricingError::InvalidConfiguration {
                field: "steps".to_string(),
                reason: "exceeds maximum allowed (100,000)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate the size of the `paths x (steps + 1)` spot matrix
    pub fn validate_path_cells(paths: usize, steps: usize) -> PricingResult<()> {
        let cells = steps
            .checked_add(1)
            .and_then(|cols| paths.checked_mul(cols));
        match cells {
            Some(n) if n <= MAX_PATH_CELLS => Ok(()),
            _ => Err(PricingError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: format!(
                    "{} paths x {} steps exceeds the path matrix budget of {} cells",
                    paths, steps, MAX_PATH_CELLS
                ),
            }),
        }
    }

    /// Validate the polynomial degree of the regression basis.
    ///
    /// Degree 0 would regress on a constant only, making the continuation
    /// value identical for every path.
    pub fn validate_basis_degree(degree: usize) -> PricingResult<()> {
        if degree < 1 {
            Err(PricingError::InvalidConfiguration {
                field: "basis_degree".to_string(),
                reason: "must be at least 1".to_string(),
            })
        } else if degree > MAX_BASIS_DEGREE {
            Err(PricingError::InvalidConfiguration {
                field: "basis_degree".to_string(),
                reason: format!("exceeds maximum allowed ({})", MAX_BASIS_DEGREE),
            })
        } else {
            Ok(())
        }
    }
}
