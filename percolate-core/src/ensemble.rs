//! Parallel evolution of independent graphs, one per seed.
//!
//! Each graph stays single-threaded; only distinct instances run concurrently
//! on the rayon pool, so results match a sequential run seed for seed.

use rayon::prelude::*;
use tracing::{info, instrument};

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
    models::EvolutionModel,
    topology::Topology,
};

/// Evolves one graph per seed on `topology` with `model` for up to `n_steps`
/// steps and finalises their observables.
///
/// Graphs are returned in seed order. A graph that runs out of mergeable
/// edges keeps its partial evolution; an undefined transition leaves the
/// corresponding estimate unset.
///
/// # Errors
/// Returns [`PercolationError::InvalidArgument`] when the model parameters are
/// invalid.
///
/// # Examples
/// ```
/// use percolate_core::{EvolutionModel, Network, run_ensemble};
///
/// let topology = Network::new(32)?;
/// let graphs = run_ensemble(&topology, EvolutionModel::ProductRule, &[1, 2, 3], 20)?;
/// assert_eq!(graphs.len(), 3);
/// assert_eq!(graphs[1].seed(), 2);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[instrument(
    name = "core.ensemble",
    err,
    skip(topology, seeds),
    fields(topology = topology.name(), model = model.name(), runs = seeds.len()),
)]
pub fn run_ensemble<T>(
    topology: &T,
    model: EvolutionModel,
    seeds: &[u64],
    n_steps: usize,
) -> Result<Vec<Graph<T>>>
where
    T: Topology + Clone + Send + Sync,
{
    model.validate()?;
    let graphs = seeds
        .par_iter()
        .map(|&seed| {
            let mut graph = Graph::with_topology(topology.clone(), seed);
            match model.step(&mut graph, n_steps) {
                Ok(()) | Err(PercolationError::Exhausted { .. }) => {}
                Err(err) => return Err(err),
            }
            match graph.finalize_observables() {
                Ok(_) | Err(PercolationError::UndefinedTransition { .. }) => Ok(graph),
                Err(err) => Err(err),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    info!(runs = graphs.len(), "ensemble finished");
    Ok(graphs)
}

/// Averages of an ensemble's observables.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleSummary {
    runs: usize,
    mean_order_parameter: Vec<f64>,
    mean_delta_method_1: Option<f64>,
    mean_delta_method_2: Option<f64>,
}

impl EnsembleSummary {
    /// Summarises `graphs`.
    ///
    /// The order parameter series is truncated to the shortest run.
    #[must_use]
    pub fn from_graphs<T: Topology>(graphs: &[Graph<T>]) -> Self {
        let shortest = graphs
            .iter()
            .map(|graph| graph.observables().len())
            .min()
            .unwrap_or(0);
        let mut totals = vec![0.0; shortest];
        for graph in graphs {
            let nodes = graph.node_count() as f64;
            for (total, &largest) in totals
                .iter_mut()
                .zip(graph.observables().largest_cluster_size())
            {
                *total += largest as f64 / nodes;
            }
        }
        let runs = graphs.len() as f64;
        for total in &mut totals {
            *total /= runs;
        }
        let first = graphs
            .iter()
            .filter_map(|graph| graph.observables().delta_method_1());
        let second = graphs
            .iter()
            .filter_map(|graph| graph.observables().delta_method_2());
        Self {
            runs: graphs.len(),
            mean_order_parameter: totals,
            mean_delta_method_1: mean(first.map(|transition| transition.delta())),
            mean_delta_method_2: mean(second.map(|transition| transition.delta())),
        }
    }

    /// Number of runs summarised.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Mean largest-cluster fraction `C[t] / n` at each step.
    #[must_use]
    pub fn mean_order_parameter(&self) -> &[f64] {
        &self.mean_order_parameter
    }

    /// Mean threshold-crossing width over runs where it is defined.
    #[must_use]
    pub fn mean_delta_method_1(&self) -> Option<f64> {
        self.mean_delta_method_1
    }

    /// Mean extremum width over runs where it is defined.
    #[must_use]
    pub fn mean_delta_method_2(&self) -> Option<f64> {
        self.mean_delta_method_2
    }
}

fn mean(values: impl Iterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), value| {
        (sum + value as f64, count + 1)
    });
    (count > 0).then(|| sum / count as f64)
}
