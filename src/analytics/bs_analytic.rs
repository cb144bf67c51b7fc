// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes prices for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! A European price is a lower bound for the American price with the same
//! parameters; the difference is the early-exercise premium.

use crate::math_utils::norm_cdf;
use crate::mc::payoffs::Payoff;

/// `(d₁, d₂)`, or `None` when `σ√T` is zero and the terminal spot is
/// deterministic.
fn d1_d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> Option<(f64, f64)> {
    let vol_sqrt_t = sigma * t.sqrt();
    if vol_sqrt_t <= 0.0 {
        return None;
    }
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    Some((d1, d1 - vol_sqrt_t))
}

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
///
/// With `σ = 0` this reduces to `max(S - K e^(-rT), 0)`.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let discounted_k = k * (-r * t).exp();
    match d1_d2(s, k, r, sigma, t) {
        Some((d1, d2)) => s * norm_cdf(d1) - discounted_k * norm_cdf(d2),
        None => (s - discounted_k).max(0.0),
    }
}

/// Black-Scholes European put option price
///
/// # Formula
/// ```text
/// P(S,K,r,σ,T) = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
    let discounted_k = k * (-r * t).exp();
    match d1_d2(s, k, r, sigma, t) {
        Some((d1, d2)) => discounted_k * norm_cdf(-d2) - s * norm_cdf(-d1),
        None => (discounted_k - s).max(0.0),
    }
}

/// European counterpart of an American payoff
pub fn bs_price(payoff: &Payoff, s: f64, r: f64, sigma: f64, t: f64) -> f64 {
    match *payoff {
        Payoff::Put { k } => bs_put_price(s, k, r, sigma, t),
        Payoff::Call { k } => bs_call_price(s, k, r, sigma, t),
    }
}
