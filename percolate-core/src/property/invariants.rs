//! Property runners for graph evolution.
//!
//! - **Structural invariants**: the tracker partitions the nodes, the size
//!   histogram conserves the node count, active edges are unique, allowed and
//!   internal to a cluster, and the observable series stay aligned with the
//!   step count.
//! - **Determinism**: identical seeds give identical edges and series.
//! - **Chunking**: `step(a)` followed by `step(b)` equals `step(a + b)`.

use std::collections::{BTreeMap, HashSet};

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{Graph, PercolationError, Topology};

use super::types::{EvolutionFixture, TopologyKind};

/// A property evaluated on a freshly constructed graph of any topology.
pub(super) trait GraphProperty {
    fn check<T: Topology + Clone>(
        &self,
        fixture: &EvolutionFixture,
        graph: Graph<T>,
    ) -> TestCaseResult;
}

/// Builds the fixture's graph and evaluates `property` on it.
pub(super) fn run_property(
    fixture: &EvolutionFixture,
    property: &impl GraphProperty,
) -> TestCaseResult {
    let construction = |error: PercolationError| {
        TestCaseError::fail(format!("construction failed: {error} ({fixture:?})"))
    };
    match fixture.topology {
        TopologyKind::Network => property.check(
            fixture,
            Graph::new_network(fixture.size, fixture.seed).map_err(construction)?,
        ),
        TopologyKind::Square => property.check(
            fixture,
            Graph::new_lattice_2d(fixture.size, fixture.seed).map_err(construction)?,
        ),
        TopologyKind::Cubic => property.check(
            fixture,
            Graph::new_lattice_3d(fixture.size, fixture.seed).map_err(construction)?,
        ),
    }
}

/// Checks the structural invariants after every chunk of steps.
pub(super) struct StructuralInvariants;

impl GraphProperty for StructuralInvariants {
    fn check<T: Topology + Clone>(
        &self,
        fixture: &EvolutionFixture,
        mut graph: Graph<T>,
    ) -> TestCaseResult {
        validate_graph(&graph)?;
        for requested in fixture.chunks {
            let before = graph.step_count();
            let exhausted = evolve(fixture, &mut graph, requested)?;
            validate_graph(&graph)?;
            let committed = graph.step_count() - before;
            if exhausted {
                if graph.tracker().cluster_count() != 1 || graph.mergeable_edge_count() != 0 {
                    return Err(TestCaseError::fail(format!(
                        "exhausted with {} clusters and {} mergeable edges",
                        graph.tracker().cluster_count(),
                        graph.mergeable_edge_count(),
                    )));
                }
            } else if committed != requested {
                return Err(TestCaseError::fail(format!(
                    "committed {committed} of {requested} steps without exhaustion"
                )));
            }
        }
        Ok(())
    }
}

/// Checks that two graphs with the same seed evolve identically.
pub(super) struct Determinism;

impl GraphProperty for Determinism {
    fn check<T: Topology + Clone>(
        &self,
        fixture: &EvolutionFixture,
        mut graph: Graph<T>,
    ) -> TestCaseResult {
        let mut twin = graph.clone();
        let total = fixture.chunks.iter().sum();
        evolve(fixture, &mut graph, total)?;
        evolve(fixture, &mut twin, total)?;
        compare(&graph, &twin)
    }
}

/// Checks that splitting a run into chunks does not change it.
pub(super) struct ChunkingEquivalence;

impl GraphProperty for ChunkingEquivalence {
    fn check<T: Topology + Clone>(
        &self,
        fixture: &EvolutionFixture,
        mut graph: Graph<T>,
    ) -> TestCaseResult {
        let mut whole = graph.clone();
        for requested in fixture.chunks {
            if evolve(fixture, &mut graph, requested)? {
                break;
            }
        }
        evolve(fixture, &mut whole, fixture.chunks.iter().sum())?;
        compare(&graph, &whole)
    }
}

/// Runs one `step` call, returning whether the graph was exhausted.
fn evolve<T: Topology>(
    fixture: &EvolutionFixture,
    graph: &mut Graph<T>,
    steps: usize,
) -> Result<bool, TestCaseError> {
    match fixture.model.step(graph, steps) {
        Ok(()) => Ok(false),
        Err(PercolationError::Exhausted { step_count }) if step_count == graph.step_count() => {
            Ok(true)
        }
        Err(error) => Err(TestCaseError::fail(format!("step failed: {error} ({fixture:?})"))),
    }
}

fn compare<T: Topology>(left: &Graph<T>, right: &Graph<T>) -> TestCaseResult {
    if left.active_edges() != right.active_edges() {
        return Err(TestCaseError::fail("edge sequences diverged"));
    }
    if left.observables() != right.observables() {
        return Err(TestCaseError::fail("observable series diverged"));
    }
    Ok(())
}

fn validate_graph<T: Topology>(graph: &Graph<T>) -> TestCaseResult {
    validate_partition(graph)?;
    validate_histogram(graph)?;
    validate_edges(graph)?;
    validate_series(graph)
}

fn validate_partition<T: Topology>(graph: &Graph<T>) -> TestCaseResult {
    let tracker = graph.tracker();
    let mut seen = vec![false; graph.node_count()];
    for (id, members) in tracker.clusters() {
        if members.is_empty() {
            return Err(TestCaseError::fail(format!("cluster {id} is empty")));
        }
        for &node in members {
            let slot = seen
                .get_mut(node)
                .ok_or_else(|| TestCaseError::fail(format!("node {node} out of range")))?;
            if *slot {
                return Err(TestCaseError::fail(format!("node {node} appears twice")));
            }
            *slot = true;
            let found = tracker
                .find(node)
                .map_err(|error| TestCaseError::fail(error.to_string()))?;
            if found != id {
                return Err(TestCaseError::fail(format!(
                    "node {node} listed in {id} but found in {found}"
                )));
            }
        }
    }
    if let Some(missing) = seen.iter().position(|&present| !present) {
        return Err(TestCaseError::fail(format!("node {missing} is in no cluster")));
    }
    Ok(())
}

fn validate_histogram<T: Topology>(graph: &Graph<T>) -> TestCaseResult {
    let tracker = graph.tracker();
    let mut expected = BTreeMap::new();
    for (_, members) in tracker.clusters() {
        *expected.entry(members.len()).or_insert(0_usize) += 1;
    }
    if &expected != tracker.size_histogram() {
        return Err(TestCaseError::fail(format!(
            "histogram {:?} does not match clusters {expected:?}",
            tracker.size_histogram()
        )));
    }
    let total: usize = expected.iter().map(|(size, count)| size * count).sum();
    if total != graph.node_count() {
        return Err(TestCaseError::fail(format!(
            "histogram accounts for {total} of {} nodes",
            graph.node_count()
        )));
    }
    Ok(())
}

fn validate_edges<T: Topology>(graph: &Graph<T>) -> TestCaseResult {
    let edges = graph.active_edges();
    if edges.len() != graph.step_count()
        || graph.step_count() + graph.tracker().cluster_count() != graph.node_count()
    {
        return Err(TestCaseError::fail(format!(
            "{} edges, {} steps and {} clusters over {} nodes",
            edges.len(),
            graph.step_count(),
            graph.tracker().cluster_count(),
            graph.node_count()
        )));
    }
    let mut unique = HashSet::with_capacity(edges.len());
    for &edge in edges {
        if edge.is_loop() || !graph.topology().allows(edge) {
            return Err(TestCaseError::fail(format!("{edge} is not allowed")));
        }
        if !unique.insert(edge) {
            return Err(TestCaseError::fail(format!("{edge} committed twice")));
        }
        let internal = graph
            .joins_same_cluster(edge)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        if !internal {
            return Err(TestCaseError::fail(format!("{edge} spans two clusters")));
        }
    }
    Ok(())
}

fn validate_series<T: Topology>(graph: &Graph<T>) -> TestCaseResult {
    let observables = graph.observables();
    let largest = observables.largest_cluster_size();
    if observables.len() != graph.step_count() + 1
        || observables.avg_cluster_size().len() != observables.len()
        || observables.heterogeneity().len() != observables.len()
    {
        return Err(TestCaseError::fail("series lengths diverge from step count"));
    }
    if largest.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(TestCaseError::fail(format!("largest cluster size decreased: {largest:?}")));
    }
    let tracker = graph.tracker();
    if largest.last() != Some(&tracker.largest_cluster_size())
        || observables.heterogeneity().last() != Some(&tracker.heterogeneity())
        || observables.avg_cluster_size().last() != Some(&tracker.average_cluster_size())
    {
        return Err(TestCaseError::fail("latest observables disagree with tracker"));
    }
    Ok(())
}
