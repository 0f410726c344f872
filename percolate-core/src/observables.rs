//! Order-parameter series recorded during evolution and the transition-width
//! estimators computed from them.
//!
//! Series index `t` holds the state after `t` committed edges; index 0 is the
//! all-singleton starting state, so every series has `step_count + 1` entries.

use tracing::debug;

use crate::{
    cluster::ClusterTracker,
    error::{DeltaMethod, PercolationError, Result},
};

/// Width estimate of the percolation transition, in steps.
///
/// `delta` is signed because the extremum method may place `t1` before `t0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    delta: i64,
    t0: usize,
    t1: usize,
}

impl Transition {
    fn between(t0: usize, t1: usize) -> Self {
        let signed = |value: usize| i64::try_from(value).unwrap_or(i64::MAX);
        Self {
            delta: signed(t1) - signed(t0),
            t0,
            t1,
        }
    }

    /// Returns `t1 - t0`.
    #[rustfmt::skip]
    #[must_use]
    pub const fn delta(&self) -> i64 { self.delta }

    /// Returns the step marking the start of the transition window.
    #[rustfmt::skip]
    #[must_use]
    pub const fn t0(&self) -> usize { self.t0 }

    /// Returns the step marking the end of the transition window.
    #[rustfmt::skip]
    #[must_use]
    pub const fn t1(&self) -> usize { self.t1 }
}

/// Per-step observables of an evolving graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Observables {
    node_count: usize,
    largest_cluster_size: Vec<usize>,
    avg_cluster_size: Vec<f64>,
    heterogeneity: Vec<usize>,
    delta_method_1: Option<Transition>,
    delta_method_2: Option<Transition>,
}

impl Observables {
    /// Creates the recorder with the initial entry taken from `tracker`.
    #[must_use]
    pub fn new(tracker: &ClusterTracker) -> Self {
        let mut observables = Self {
            node_count: tracker.node_count(),
            largest_cluster_size: Vec::new(),
            avg_cluster_size: Vec::new(),
            heterogeneity: Vec::new(),
            delta_method_1: None,
            delta_method_2: None,
        };
        observables.record(tracker);
        observables
    }

    /// Appends one entry per series from the current tracker state.
    pub(crate) fn record(&mut self, tracker: &ClusterTracker) {
        self.largest_cluster_size
            .push(tracker.largest_cluster_size());
        self.avg_cluster_size.push(tracker.average_cluster_size());
        self.heterogeneity.push(tracker.heterogeneity());
    }

    /// Largest cluster size after each step.
    #[must_use]
    pub fn largest_cluster_size(&self) -> &[usize] {
        &self.largest_cluster_size
    }

    /// Mean cluster size (over live clusters) after each step.
    #[must_use]
    pub fn avg_cluster_size(&self) -> &[f64] {
        &self.avg_cluster_size
    }

    /// Number of distinct cluster sizes after each step.
    #[must_use]
    pub fn heterogeneity(&self) -> &[usize] {
        &self.heterogeneity
    }

    /// Threshold-crossing estimate, available after finalisation.
    #[must_use]
    pub fn delta_method_1(&self) -> Option<Transition> {
        self.delta_method_1
    }

    /// Extremum estimate, available after finalisation.
    #[must_use]
    pub fn delta_method_2(&self) -> Option<Transition> {
        self.delta_method_2
    }

    /// Number of recorded entries (`step_count + 1`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.largest_cluster_size.len()
    }

    /// Always `false`: the initial state is recorded on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.largest_cluster_size.is_empty()
    }

    /// Computes and stores the threshold-crossing estimate.
    ///
    /// `t0` is the last step with `C < √n` and `t1` the first step with
    /// `C > n / 2`, where `C` is the largest cluster size. Both comparisons
    /// are evaluated exactly as `C² < n` and `2C > n`.
    ///
    /// # Errors
    /// Returns [`PercolationError::UndefinedTransition`] when either threshold
    /// is never met; previously stored estimates are left untouched.
    pub fn compute_delta_method_1(&mut self) -> Result<Transition> {
        let transition = threshold_crossing(&self.largest_cluster_size, self.node_count)?;
        self.delta_method_1 = Some(transition);
        Ok(transition)
    }

    /// Computes and stores the extremum estimate.
    ///
    /// `t0` is the first step where heterogeneity peaks; `t1` is the first
    /// step `t` whose increase `C[t] - C[t - 1]` is maximal.
    ///
    /// # Errors
    /// Returns [`PercolationError::UndefinedTransition`] when fewer than two
    /// entries have been recorded.
    pub fn compute_delta_method_2(&mut self) -> Result<Transition> {
        let transition = extremum(&self.heterogeneity, &self.largest_cluster_size)?;
        self.delta_method_2 = Some(transition);
        Ok(transition)
    }

    /// Runs both estimators. Safe to call repeatedly; an unchanged series
    /// yields the same result.
    ///
    /// # Errors
    /// Returns the first [`PercolationError::UndefinedTransition`]; an estimate
    /// that succeeds is stored even when the other fails.
    pub fn finalize(&mut self) -> Result<(Transition, Transition)> {
        let first = self.compute_delta_method_1();
        let second = self.compute_delta_method_2();
        debug!(
            delta_method_1 = ?first.as_ref().ok(),
            delta_method_2 = ?second.as_ref().ok(),
            "observables finalised"
        );
        Ok((first?, second?))
    }
}

fn first_argmax(values: impl Iterator<Item = usize>) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, value) in values.enumerate() {
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

fn threshold_crossing(largest: &[usize], node_count: usize) -> Result<Transition> {
    let t0 = largest
        .iter()
        .rposition(|&size| size.saturating_mul(size) < node_count)
        .ok_or(PercolationError::UndefinedTransition {
            method: DeltaMethod::ThresholdCrossing,
            reason: "largest cluster never stays below sqrt(n)",
        })?;
    let t1 = largest
        .iter()
        .position(|&size| size.saturating_mul(2) > node_count)
        .ok_or(PercolationError::UndefinedTransition {
            method: DeltaMethod::ThresholdCrossing,
            reason: "largest cluster never exceeds n / 2",
        })?;
    Ok(Transition::between(t0, t1))
}

fn extremum(heterogeneity: &[usize], largest: &[usize]) -> Result<Transition> {
    let too_short = PercolationError::UndefinedTransition {
        method: DeltaMethod::Extremum,
        reason: "at least one committed step is required",
    };
    if largest.len() < 2 {
        return Err(too_short);
    }
    let t0 = first_argmax(heterogeneity.iter().copied()).ok_or_else(|| too_short.clone())?;
    let jumps = largest
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0]));
    let t1 = first_argmax(jumps).ok_or(too_short)? + 1;
    Ok(Transition::between(t0, t1))
}
