//! Longstaff-Schwartz Backward Induction
//!
//! # Algorithm
//!
//! Starting from the terminal payoff, walk the exercise dates backwards
//! `t = n_steps - 1, ..., 1`. At each date:
//!
//! 1. Discount every path's cash flow one step, `V ← e^{-r dt} V`. This is the
//!    value of holding, and it is final for out-of-the-money paths.
//! 2. Regress the discounted cash flows of the in-the-money (ITM) paths on the
//!    polynomial basis of their spots.
//! 3. A deciding path exercises iff its exercise value is strictly greater
//!    than the fitted continuation value; its cash flow becomes the exercise
//!    value and its exercise date becomes `t`.
//!
//! Inception (`t = 0`) is never an exercise date. After the loop, `V` holds
//! the optimal cash flow of each path in time-1 money.
//!
//! Exercise is recorded as a per-path exercise date instead of zeroing a row
//! of future cash flows: overwriting `V[i]` drops every later payment of path
//! `i` because only the value from the current date onward is stored.
//!
//! # Path Splitting
//!
//! With a [`SplitPartition`], regression uses ITM training paths only and
//! exercise decisions are taken by ITM evaluation paths only. Training paths
//! always hold. If either side has no ITM path at a date, every path holds.

use crate::mc::lsm_engine::Diagnostics;
use crate::mc::paths::PathSet;
use crate::mc::payoffs::Payoff;
use crate::mc::regression::{self, RegressionBasis};
use crate::rng::RngFactory;
use rand::seq::SliceRandom;
use tracing::{trace, warn};

/// Percentage of paths used to fit the regression under path splitting.
pub const TRAINING_PERCENT: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Training,
    Evaluation,
}

/// Fixed assignment of every path to the training or evaluation subset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPartition {
    roles: Vec<PathRole>,
}

impl SplitPartition {
    /// Draw a random 70/30 partition from the factory's split stream.
    ///
    /// Exactly `floor(0.7 * n_paths)` paths are assigned to training.
    pub fn draw(n_paths: usize, factory: &RngFactory) -> Self {
        let n_training = n_paths * TRAINING_PERCENT / 100;
        let mut indices: Vec<usize> = (0..n_paths).collect();
        indices.shuffle(&mut factory.split_rng());

        let mut roles = vec![PathRole::Evaluation; n_paths];
        for &i in &indices[..n_training.min(n_paths)] {
            roles[i] = PathRole::Training;
        }
        SplitPartition { roles }
    }

    pub fn from_roles(roles: Vec<PathRole>) -> Self {
        SplitPartition { roles }
    }

    pub fn role(&self, path: usize) -> PathRole {
        self.roles[path]
    }

    pub fn is_training(&self, path: usize) -> bool {
        self.roles[path] == PathRole::Training
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn n_training(&self) -> usize {
        self.roles.iter().filter(|r| **r == PathRole::Training).count()
    }

    pub fn n_evaluation(&self) -> usize {
        self.len() - self.n_training()
    }

    pub fn evaluation_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| !self.is_training(i)).collect()
    }
}

/// Estimated exercise threshold at every intermediate date, chronological.
///
/// For a put the level is the highest spot at which some path exercised.
/// For a call it is the lowest exercised spot, since a call is exercised
/// above its threshold. `None` marks a date where no path exercised.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseBoundary {
    times: Vec<f64>,
    levels: Vec<Option<f64>>,
}

impl ExerciseBoundary {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Observation time of each entry, `t * dt` for `t = 1..n_steps-1`
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn levels(&self) -> &[Option<f64>] {
        &self.levels
    }

    /// `(time, level)` pairs at dates where some path exercised
    pub fn defined(&self) -> Vec<(f64, f64)> {
        self.times
            .iter()
            .zip(&self.levels)
            .filter_map(|(&t, level)| level.map(|s| (t, s)))
            .collect()
    }

    /// True when no path exercised early at any date. This is a valid outcome,
    /// e.g. for a call on a non-dividend-paying asset.
    pub fn no_exercise_observed(&self) -> bool {
        self.levels.iter().all(Option::is_none)
    }

    /// Levels with NaN standing in for missing entries
    pub fn to_nan_filled(&self) -> Vec<f64> {
        self.levels.iter().map(|l| l.unwrap_or(f64::NAN)).collect()
    }
}

/// Per-date exercise statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStats {
    pub step: usize,
    pub time: f64,
    pub itm_paths: usize,
    pub fit_paths: usize,
    pub exercised_paths: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InductionOutcome {
    /// Optimal cash flow of each path, valued at the first exercise date
    pub cash_flows: Vec<f64>,
    /// Date index at which each path is exercised, `None` if never
    pub exercise_step: Vec<Option<usize>>,
    pub boundary: Option<ExerciseBoundary>,
    pub step_stats: Option<Vec<StepStats>>,
}

/// Exercise rule: strictly better than holding. Ties hold.
pub fn exercise_now(exercise_value: f64, continuation_value: f64) -> bool {
    exercise_value > continuation_value
}

fn boundary_level(payoff: &Payoff, current: Option<f64>, spot: f64) -> f64 {
    match (payoff, current) {
        (_, None) => spot,
        (Payoff::Put { .. }, Some(level)) => level.max(spot),
        (Payoff::Call { .. }, Some(level)) => level.min(spot),
    }
}

/// Run the backward induction over `paths`.
///
/// `r` is the continuously compounded risk-free rate used for the one-step
/// discount `e^{-r dt}`. Regression and exercise decisions follow the module
/// documentation; `diagnostics` selects what is collected besides the cash
/// flows.
pub fn run_backward_induction(
    paths: &PathSet,
    payoff: &Payoff,
    r: f64,
    basis: &RegressionBasis,
    split: Option<&SplitPartition>,
    diagnostics: Diagnostics,
) -> InductionOutcome {
    let n_paths = paths.n_paths();
    let n_steps = paths.n_steps();
    let dt = paths.dt();
    let discount = (-r * dt).exp();
    if let Some(partition) = split {
        debug_assert_eq!(partition.len(), n_paths);
    }

    let terminal = paths.spots_at(n_steps).to_vec();
    let mut cash_flows = payoff.intrinsic_values(&terminal);
    let mut exercise_step: Vec<Option<usize>> = cash_flows
        .iter()
        .map(|&v| if v > 0.0 { Some(n_steps) } else { None })
        .collect();

    let track_boundary = diagnostics.contains(Diagnostics::BOUNDARY);
    let track_stats = diagnostics.contains(Diagnostics::STEP_STATS);
    let intermediate = n_steps.saturating_sub(1);
    let mut boundary_rev: Vec<Option<f64>> = Vec::with_capacity(intermediate);
    let mut stats_rev: Vec<StepStats> = Vec::with_capacity(intermediate);

    for step in (1..n_steps).rev() {
        let spots = paths.spots_at(step).to_vec();
        let exercise_values = payoff.intrinsic_values(&spots);

        for v in cash_flows.iter_mut() {
            *v *= discount;
        }

        let itm: Vec<usize> = (0..n_paths).filter(|&i| exercise_values[i] > 0.0).collect();
        let split_sets: Option<(Vec<usize>, Vec<usize>)> =
            split.map(|p| itm.iter().copied().partition(|&i| p.is_training(i)));
        let (fit_set, decide_set): (&[usize], &[usize]) = match &split_sets {
            Some((training, evaluation)) => (training.as_slice(), evaluation.as_slice()),
            None => (itm.as_slice(), itm.as_slice()),
        };

        let mut level: Option<f64> = None;
        let mut exercised = 0usize;
        let fitted = !fit_set.is_empty() && !decide_set.is_empty();

        if fitted {
            let fit_spots: Vec<f64> = fit_set.iter().map(|&i| spots[i]).collect();
            let targets: Vec<f64> = fit_set.iter().map(|&i| cash_flows[i]).collect();
            let beta = regression::fit(&basis.design_matrix(&fit_spots), &targets);

            let decide_spots: Vec<f64> = decide_set.iter().map(|&i| spots[i]).collect();
            let continuation = regression::predict(&basis.design_matrix(&decide_spots), &beta);

            for (&i, &c) in decide_set.iter().zip(&continuation) {
                if exercise_now(exercise_values[i], c) {
                    cash_flows[i] = exercise_values[i];
                    exercise_step[i] = Some(step);
                    exercised += 1;
                    level = Some(boundary_level(payoff, level, spots[i]));
                }
            }
        } else if split.is_some() && !itm.is_empty() {
            warn!(
                step,
                training_itm = fit_set.len(),
                evaluation_itm = decide_set.len(),
                "split leaves one side without in-the-money paths; holding"
            );
        }

        trace!(step, itm = itm.len(), fit = fit_set.len(), exercised, "induction step");

        if track_boundary {
            boundary_rev.push(level);
        }
        if track_stats {
            stats_rev.push(StepStats {
                step,
                time: step as f64 * dt,
                itm_paths: itm.len(),
                fit_paths: if fitted { fit_set.len() } else { 0 },
                exercised_paths: exercised,
            });
        }
    }

    let boundary = track_boundary.then(|| {
        boundary_rev.reverse();
        ExerciseBoundary {
            times: (1..n_steps).map(|t| t as f64 * dt).collect(),
            levels: boundary_rev,
        }
    });
    let step_stats = track_stats.then(|| {
        stats_rev.reverse();
        stats_rev
    });

    InductionOutcome {
        cash_flows,
        exercise_step,
        boundary,
        step_stats,
    }
}
