//! Workload generators shared by the benchmarks.

use percolate_core::{EvolutionModel, Graph, GraphBuilder, PercolationError, Topology};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    error::BenchSetupError,
    params::{BenchTopology, EvolutionBenchParams},
};

/// Generates `count` random node pairs over `node_count` nodes.
///
/// The pairs may repeat or fall inside one cluster; the tracker benchmark
/// skips such pairs the same way graph evolution does.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `node_count` is zero.
pub fn random_pairs(
    node_count: usize,
    count: usize,
    seed: u64,
) -> Result<Vec<(usize, usize)>, BenchSetupError> {
    if node_count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "node_count",
        });
    }
    let mut rng = SmallRng::seed_from_u64(seed);
    Ok((0..count)
        .map(|_| (rng.gen_range(0..node_count), rng.gen_range(0..node_count)))
        .collect())
}

/// Builds a fresh graph for `params`, evolves it under `model`, and returns
/// the number of committed steps.
///
/// Running out of mergeable edges is not an error here: the benchmark still
/// measures the work done up to that point.
///
/// # Errors
/// Returns [`BenchSetupError::Percolation`] when the size or model parameters
/// are invalid.
pub fn run_evolution(
    params: &EvolutionBenchParams,
    model: EvolutionModel,
    seed: u64,
) -> Result<usize, BenchSetupError> {
    let builder = GraphBuilder::new().with_seed(seed).with_model(model);
    match params.topology {
        BenchTopology::Network => {
            evolve(&builder, &mut builder.network(params.size)?, params.steps)
        }
        BenchTopology::Square => {
            evolve(&builder, &mut builder.lattice_2d(params.size)?, params.steps)
        }
        BenchTopology::Cubic => {
            evolve(&builder, &mut builder.lattice_3d(params.size)?, params.steps)
        }
    }
}

fn evolve<T: Topology>(
    builder: &GraphBuilder,
    graph: &mut Graph<T>,
    steps: usize,
) -> Result<usize, BenchSetupError> {
    match builder.evolve(graph, steps) {
        Ok(()) | Err(PercolationError::Exhausted { .. }) => Ok(graph.step_count()),
        Err(err) => Err(err.into()),
    }
}
