//! # lsm-american: Least-Squares Monte Carlo for American Options
//!
//! A Rust library pricing American puts and calls under geometric Brownian
//! motion with the Longstaff-Schwartz regression method.
//!
//! ## Key Features
//!
//! - **Parallel Simulation**: Per-path random streams filled in parallel with Rayon
//! - **Stable Regression**: SVD least squares on a scaled polynomial basis
//! - **Path Splitting**: Optional 70/30 training/evaluation split against overfitting
//! - **Diagnostics**: Exercise boundary and per-date exercise statistics
//! - **References**: Black-Scholes European prices and a CRR binomial tree
//!
//! ## Quick Start
//!
//! ```rust
//! use lsm_american::mc::lsm_engine::{price_american_lsm, Diagnostics, LsmConfig};
//! use lsm_american::mc::payoffs::Payoff;
//!
//! let config = LsmConfig {
//!     paths: 20_000,
//!     steps: 50,
//!     s0: 100.0,
//!     r: 0.05,
//!     sigma: 0.2,
//!     t: 1.0,
//!     seed: Some(42),
//!     payoff: Payoff::Put { k: 100.0 },
//!     diagnostics: Diagnostics::BOUNDARY,
//!     ..Default::default()
//! };
//!
//! let result = price_american_lsm(&config).expect("Valid configuration");
//! println!("American put: {:.4} ± {:.4}", result.price, result.std_error);
//! ```
//!
//! ## Mathematical Foundation
//!
//! The holder exercises at a date when the immediate payoff exceeds the
//! continuation value. Continuation values are estimated by regressing
//! discounted realised cash flows on functions of the spot across the
//! in-the-money paths, walking backward from maturity.

pub mod analytics;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

pub use error::{PricingError, PricingResult};
pub use mc::induction::{ExerciseBoundary, StepStats};
pub use mc::lsm_engine::{american_put_lsm, price_american_lsm, Diagnostics, LsmConfig, LsmResult};
pub use mc::payoffs::Payoff;
