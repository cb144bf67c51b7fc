// src/analytics/binomial.rs
//! Cox-Ross-Rubinstein binomial tree
//!
//! # Mathematical Foundation
//!
//! Over `n` steps of length `dt = T/n` the spot moves up by `u = e^{σ√dt}` or
//! down by `d = 1/u` with risk-neutral probability
//! ```text
//! p = (e^{r dt} - d) / (u - d)
//! ```
//! Node values are rolled back with `V = e^{-r dt}(p V_up + (1-p) V_down)`;
//! for American exercise each node takes `max(V, intrinsic)`.
//!
//! Serves as an independent reference for the LSM estimate.

use crate::error::{validation::*, PricingError, PricingResult};
use crate::mc::payoffs::Payoff;

/// Tree depth used when no other is requested.
pub const DEFAULT_TREE_STEPS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStyle {
    European,
    American,
}

/// CRR tree price of `payoff` with `steps` time steps.
///
/// # Errors
///
/// Parameter errors for non-positive spot, volatility or maturity, and
/// `NumericalInstability` when `p` falls outside `[0, 1]` (too few steps for
/// the given rate).
pub fn crr_price(
    payoff: &Payoff,
    s0: f64,
    r: f64,
    sigma: f64,
    t: f64,
    steps: usize,
    style: ExerciseStyle,
) -> PricingResult<f64> {
    validate_positive("s0", s0)?;
    validate_positive("k", payoff.strike())?;
    validate_finite("r", r)?;
    validate_positive("sigma", sigma)?;
    validate_positive("t", t)?;
    validate_steps(steps)?;

    let dt = t / steps as f64;
    let u = (sigma * dt.sqrt()).exp();
    let d = 1.0 / u;
    let p = ((r * dt).exp() - d) / (u - d);
    if !(0.0..=1.0).contains(&p) {
        return Err(PricingError::NumericalInstability {
            method: "CRR binomial tree".to_string(),
            reason: format!("risk-neutral probability {} outside [0, 1]", p),
        });
    }
    let disc = (-r * dt).exp();
    let ratio = u / d;

    let mut values = Vec::with_capacity(steps + 1);
    let mut st = s0 * d.powi(steps as i32);
    for _ in 0..=steps {
        values.push(payoff.intrinsic(st));
        st *= ratio;
    }

    // base = s0 * d^i is the lowest node at level i
    let mut base = s0 * d.powi(steps as i32 - 1);
    for i in (0..steps).rev() {
        let mut st = base;
        for j in 0..=i {
            let continuation = disc * (p * values[j + 1] + (1.0 - p) * values[j]);
            values[j] = match style {
                ExerciseStyle::European => continuation,
                ExerciseStyle::American => continuation.max(payoff.intrinsic(st)),
            };
            st *= ratio;
        }
        base *= u;
    }

    Ok(values[0])
}
