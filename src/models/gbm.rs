// src/models/gbm.rs
//! Geometric Brownian motion under the risk-neutral measure
//!
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! S_{t+dt} = S_t * exp((r - σ²/2)dt + σ√dt * Z),  Z ~ N(0,1)
//! ```
//!
//! The transition is exact, so the only discretization is the choice of
//! observation dates.

use crate::error::{validation::*, PricingResult};
use std::f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, mu: f64, sigma: f64) -> PricingResult<Self> {
        validate_positive("s0", s0)?;
        validate_finite("s0", s0)?;
        validate_finite("r", mu)?;
        validate_non_negative("sigma", sigma)?;
        validate_finite("sigma", sigma)?;
        Ok(Gbm { s0, mu, sigma })
    }

    /// Log-drift and log-volatility of one step of length `dt`.
    pub fn step_coefficients(&self, dt: f64) -> (f64, f64) {
        (
            (self.mu - 0.5 * self.sigma * self.sigma) * dt,
            self.sigma * dt.sqrt(),
        )
    }

    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        let (drift, vol) = self.step_coefficients(dt);
        s_t * (drift + vol * normal_draw).exp()
    }
}
