//! Edge-addition rules driving the evolution.
//!
//! Every model commits exactly one edge per step between two different
//! clusters. The Achlioptas-style models draw two candidates and pick one of
//! them; when only a single mergeable edge remains that edge is committed
//! directly.

use tracing::{info, instrument, trace, warn};

use crate::{
    cluster::Merge,
    error::{PercolationError, Result},
    graph::Graph,
    topology::{Edge, Topology},
};

/// Default cluster-size bound for [`EvolutionModel::BohmanFrieze`].
pub const DEFAULT_BOUND: usize = 2;

/// Default minimum acceptance probability for
/// [`EvolutionModel::StochasticEdgeAcceptance`].
pub const DEFAULT_MIN_ACCEPTANCE: f64 = 0.5;

/// The edge-selection rule applied on each step.
///
/// # Examples
/// ```
/// use percolate_core::{EvolutionModel, Graph};
///
/// let mut graph = Graph::new_network(16, 8)?;
/// EvolutionModel::ProductRule.step(&mut graph, 10)?;
/// assert_eq!(graph.step_count(), 10);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum EvolutionModel {
    /// Commit one uniformly random edge per step.
    #[default]
    ErdosRenyi,
    /// Accept the first candidate while its larger endpoint cluster has at most
    /// `bound` nodes, otherwise the second.
    BohmanFrieze {
        /// Largest cluster size still accepted for the first candidate.
        bound: usize,
    },
    /// Accept the candidate with the smaller product of endpoint cluster sizes.
    ProductRule,
    /// Accept the first candidate with probability
    /// `max(min_acceptance, P2 / (P1 + P2))`, where `Pi` is the product of the
    /// endpoint cluster sizes of candidate `i`.
    StochasticEdgeAcceptance {
        /// Lower bound on the acceptance probability of the first candidate.
        min_acceptance: f64,
    },
}

impl EvolutionModel {
    /// Bohman-Frieze with [`DEFAULT_BOUND`].
    #[must_use]
    pub const fn bohman_frieze() -> Self {
        Self::BohmanFrieze {
            bound: DEFAULT_BOUND,
        }
    }

    /// Stochastic edge acceptance with [`DEFAULT_MIN_ACCEPTANCE`].
    #[must_use]
    pub const fn stochastic_edge_acceptance() -> Self {
        Self::StochasticEdgeAcceptance {
            min_acceptance: DEFAULT_MIN_ACCEPTANCE,
        }
    }

    /// Short name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ErdosRenyi => "erdos_renyi",
            Self::BohmanFrieze { .. } => "bohman_frieze",
            Self::ProductRule => "product_rule",
            Self::StochasticEdgeAcceptance { .. } => "stochastic_edge_acceptance",
        }
    }

    /// Checks the model parameters.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] when the Bohman-Frieze
    /// bound is zero or the minimum acceptance lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::BohmanFrieze { bound: 0 } => Err(PercolationError::InvalidArgument {
                name: "bound",
                reason: "must be at least 1".to_owned(),
            }),
            Self::StochasticEdgeAcceptance { min_acceptance }
                if !(0.0..=1.0).contains(&min_acceptance) =>
            {
                Err(PercolationError::InvalidArgument {
                    name: "min_acceptance",
                    reason: format!("must lie in [0, 1], got {min_acceptance}"),
                })
            }
            _ => Ok(()),
        }
    }

    /// Commits `n_steps` edges to `graph`.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] for invalid parameters
    /// (before any edge is added) and [`PercolationError::Exhausted`] once no
    /// edge joins two different clusters. Edges committed before exhaustion
    /// are kept.
    #[instrument(
        name = "core.evolve",
        err,
        skip(self, graph),
        fields(
            model = self.name(),
            topology = graph.topology().name(),
            n_steps = n_steps,
            start = graph.step_count()
        ),
    )]
    pub fn step<T: Topology>(&self, graph: &mut Graph<T>, n_steps: usize) -> Result<()> {
        self.validate()?;
        for _ in 0..n_steps {
            if let Err(err) = self.step_once(graph) {
                if let PercolationError::Exhausted { step_count } = err {
                    warn!(
                        step_count,
                        requested = n_steps,
                        "no mergeable edge remains; stopping early"
                    );
                }
                return Err(err);
            }
        }
        info!(
            steps = graph.step_count(),
            clusters = graph.tracker().cluster_count(),
            largest = graph.tracker().largest_cluster_size(),
            "evolution finished"
        );
        Ok(())
    }

    fn step_once<T: Topology>(&self, graph: &mut Graph<T>) -> Result<Merge> {
        let first = graph.sample_mergeable(None)?;
        if matches!(self, Self::ErdosRenyi) || graph.mergeable_edge_count() < 2 {
            return graph.add_edge(first);
        }
        let second = graph.sample_mergeable(Some(first))?;
        let chosen = match *self {
            Self::ErdosRenyi => first,
            Self::BohmanFrieze { bound } => {
                let (left, right) = graph.endpoint_sizes(first)?;
                if left.max(right) <= bound {
                    first
                } else {
                    second
                }
            }
            Self::ProductRule => {
                if size_product(graph, first)? <= size_product(graph, second)? {
                    first
                } else {
                    second
                }
            }
            Self::StochasticEdgeAcceptance { min_acceptance } => {
                let acceptance = acceptance_probability(
                    min_acceptance,
                    size_product(graph, first)?,
                    size_product(graph, second)?,
                );
                if graph.draw_unit() < acceptance {
                    first
                } else {
                    second
                }
            }
        };
        trace!(
            step = graph.step_count(),
            first = %first,
            second = %second,
            chosen = %chosen,
            "candidates compared"
        );
        graph.add_edge(chosen)
    }
}

fn size_product<T: Topology>(graph: &Graph<T>, edge: Edge) -> Result<usize> {
    let (left, right) = graph.endpoint_sizes(edge)?;
    Ok(left.saturating_mul(right))
}

/// Probability of committing the first candidate: `max(q, P2 / (P1 + P2))`.
fn acceptance_probability(min_acceptance: f64, first: usize, second: usize) -> f64 {
    let p1 = first as f64;
    let p2 = second as f64;
    min_acceptance.max(p2 / (p1 + p2))
}

/// Evolves `graph` by `n_steps` Erdos-Renyi steps.
///
/// # Errors
/// Returns [`PercolationError::Exhausted`] once no mergeable edge remains.
pub fn erdos_renyi<T: Topology>(graph: &mut Graph<T>, n_steps: usize) -> Result<()> {
    EvolutionModel::ErdosRenyi.step(graph, n_steps)
}

/// Evolves `graph` by `n_steps` Bohman-Frieze steps with cluster bound `bound`.
///
/// # Errors
/// Returns [`PercolationError::InvalidArgument`] when `bound` is zero and
/// [`PercolationError::Exhausted`] once no mergeable edge remains.
pub fn bohman_frieze<T: Topology>(
    graph: &mut Graph<T>,
    n_steps: usize,
    bound: usize,
) -> Result<()> {
    EvolutionModel::BohmanFrieze { bound }.step(graph, n_steps)
}

/// Evolves `graph` by `n_steps` Product Rule steps.
///
/// # Errors
/// Returns [`PercolationError::Exhausted`] once no mergeable edge remains.
pub fn product_rule<T: Topology>(graph: &mut Graph<T>, n_steps: usize) -> Result<()> {
    EvolutionModel::ProductRule.step(graph, n_steps)
}

/// Evolves `graph` by `n_steps` Stochastic Edge Acceptance steps.
///
/// # Errors
/// Returns [`PercolationError::InvalidArgument`] when `min_acceptance` lies
/// outside `[0, 1]` and [`PercolationError::Exhausted`] once no mergeable edge
/// remains.
pub fn stochastic_edge_acceptance<T: Topology>(
    graph: &mut Graph<T>,
    n_steps: usize,
    min_acceptance: f64,
) -> Result<()> {
    EvolutionModel::StochasticEdgeAcceptance { min_acceptance }.step(graph, n_steps)
}
