// src/mc/lsm_engine.rs
use crate::error::{validation::*, PricingError, PricingResult};
use crate::math_utils::{mean_and_std_error, Timer};
use crate::mc::induction::{
    run_backward_induction, ExerciseBoundary, SplitPartition, StepStats,
};
use crate::mc::paths::{simulate_gbm_paths, PathSet};
use crate::mc::payoffs::Payoff;
use crate::mc::regression::RegressionBasis;
use crate::models::gbm::Gbm;
use crate::rng::RngFactory;
use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Optional diagnostics collected during the backward induction
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Diagnostics: u32 {
        const NONE       = 0;
        const BOUNDARY   = 1 << 0;
        const STEP_STATS = 1 << 1;
    }
}

/// Configuration of one LSM pricing run.
///
/// Defaults: at-the-money put (`S0 = K = 100`), `r = 5%`, `σ = 20%`, one year,
/// 100,000 paths, 50 exercise intervals, quadratic basis, entropy seed, no
/// path splitting, no diagnostics, parallel path simulation.
#[derive(Clone, Debug)]
pub struct LsmConfig {
    pub paths: usize,
    pub steps: usize,
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
    pub t: f64,
    /// Highest power of spot in the regression basis, at least 1
    pub basis_degree: usize,
    /// `None` draws a fresh seed; the seed used is reported in the result
    pub seed: Option<u64>,
    pub payoff: Payoff,
    /// Fit on 70% of the paths and decide on the remaining 30%
    pub split_paths: bool,
    pub diagnostics: Diagnostics,
    pub parallel: bool,
}

impl LsmConfig {
    /// Validate the LSM configuration
    pub fn validate(&self) -> PricingResult<()> {
        validate_paths(self.paths)?;
        validate_steps(self.steps)?;
        validate_path_cells(self.paths, self.steps)?;
        validate_positive("s0", self.s0)?;
        validate_finite("s0", self.s0)?;
        validate_positive("k", self.payoff.strike())?;
        validate_finite("k", self.payoff.strike())?;
        validate_finite("r", self.r)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_finite("sigma", self.sigma)?;
        validate_positive("t", self.t)?;
        validate_finite("t", self.t)?;
        validate_basis_degree(self.basis_degree)?;
        Ok(())
    }
}

impl Default for LsmConfig {
    fn default() -> Self {
        LsmConfig {
            paths: 100_000,
            steps: 50,
            s0: 100.0,
            r: 0.05,
            sigma: 0.2,
            t: 1.0,
            basis_degree: 2,
            seed: None,
            payoff: Payoff::Put { k: 100.0 },
            split_paths: false,
            diagnostics: Diagnostics::NONE,
            parallel: true,
        }
    }
}

/// Out-of-sample view of a path-split run
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    pub training_paths: usize,
    pub evaluation_paths: usize,
    /// Discounted mean cash flow over the evaluation paths only
    pub evaluation_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LsmResult {
    /// Discounted mean of the first-date cash flows over all paths
    pub price: f64,
    /// Standard error of `price` across paths
    pub std_error: f64,
    pub boundary: Option<ExerciseBoundary>,
    pub step_stats: Option<Vec<StepStats>>,
    pub split: Option<SplitSummary>,
    /// Base seed of the simulation; `None` when priced on caller paths
    pub seed: Option<u64>,
}

/// Longstaff-Schwartz pricing of an American option under GBM
///
/// # Algorithm
///
/// 1. Simulate `paths × (steps + 1)` spots with the exact GBM transition.
/// 2. Optionally draw the 70/30 training/evaluation partition.
/// 3. Backward induction from maturity to the first exercise date, regressing
///    discounted cash flows of in-the-money paths on `1, x, ..., x^D` with
///    `x = S/K`.
/// 4. Price = `e^{-r dt}` times the mean first-date cash flow over all paths.
///
/// # Errors
///
/// Parameter errors are reported before any simulation. Degenerate
/// regressions never fail the run.
pub fn price_american_lsm(cfg: &LsmConfig) -> PricingResult<LsmResult> {
    cfg.validate()?;
    let timer = Timer::new();

    let factory = RngFactory::from_optional_seed(cfg.seed);
    let model = Gbm::new(cfg.s0, cfg.r, cfg.sigma)?;
    let paths = simulate_gbm_paths(&model, cfg.t, cfg.paths, cfg.steps, &factory, cfg.parallel)?;
    let simulation_ms = timer.elapsed_ms();

    let partition = cfg
        .split_paths
        .then(|| SplitPartition::draw(cfg.paths, &factory));

    let mut result = price_on_paths(
        &paths,
        &cfg.payoff,
        cfg.r,
        cfg.basis_degree,
        partition.as_ref(),
        cfg.diagnostics,
    )?;
    result.seed = Some(factory.base_seed());

    debug!(
        payoff = cfg.payoff.name(),
        strike = cfg.payoff.strike(),
        paths = cfg.paths,
        steps = cfg.steps,
        basis_degree = cfg.basis_degree,
        split = cfg.split_paths,
        seed = factory.base_seed(),
        price = result.price,
        std_error = result.std_error,
        simulation_ms,
        total_ms = timer.elapsed_ms(),
        "LSM pricing complete"
    );

    Ok(result)
}

/// Run the induction and aggregation on an existing path set.
pub fn price_on_paths(
    paths: &PathSet,
    payoff: &Payoff,
    r: f64,
    basis_degree: usize,
    split: Option<&SplitPartition>,
    diagnostics: Diagnostics,
) -> PricingResult<LsmResult> {
    validate_finite("r", r)?;
    validate_positive("k", payoff.strike())?;
    validate_finite("k", payoff.strike())?;
    if let Some(partition) = split {
        if partition.len() != paths.n_paths() {
            return Err(PricingError::InvalidConfiguration {
                field: "split".to_string(),
                reason: format!(
                    "partition covers {} paths but the path set has {}",
                    partition.len(),
                    paths.n_paths()
                ),
            });
        }
    }
    let basis = RegressionBasis::new(basis_degree, payoff.strike())?;

    let outcome = run_backward_induction(paths, payoff, r, &basis, split, diagnostics);

    let discount = (-r * paths.dt()).exp();
    let (mean, std_error) = mean_and_std_error(&outcome.cash_flows);
    let price = discount * mean;
    if !price.is_finite() {
        return Err(PricingError::NumericalInstability {
            method: "LSM aggregation".to_string(),
            reason: format!("price estimate is not finite: {}", price),
        });
    }

    let split = split.map(|partition| {
        let evaluation: Vec<f64> = partition
            .evaluation_indices()
            .into_iter()
            .map(|i| outcome.cash_flows[i])
            .collect();
        let (evaluation_mean, _) = mean_and_std_error(&evaluation);
        SplitSummary {
            training_paths: partition.n_training(),
            evaluation_paths: evaluation.len(),
            evaluation_price: discount * evaluation_mean,
        }
    });

    Ok(LsmResult {
        price,
        std_error: discount * std_error,
        boundary: outcome.boundary,
        step_stats: outcome.step_stats,
        split,
        seed: None,
    })
}

/// American put price with the remaining settings at their defaults.
#[allow(clippy::too_many_arguments)]
pub fn american_put_lsm(
    s0: f64,
    k: f64,
    r: f64,
    sigma: f64,
    t: f64,
    paths: usize,
    steps: usize,
    basis_degree: usize,
    seed: Option<u64>,
) -> PricingResult<f64> {
    let cfg = LsmConfig {
        paths,
        steps,
        s0,
        r,
        sigma,
        t,
        basis_degree,
        seed,
        payoff: Payoff::Put { k },
        ..Default::default()
    };
    price_american_lsm(&cfg).map(|res| res.price)
}
