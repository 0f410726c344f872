//! The evolving graph: a topology plus cluster tracking, active edges, an
//! owned random number generator and the observable series.

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{instrument, trace};

use crate::{
    cluster::{ClusterId, ClusterTracker, Merge},
    error::{PercolationError, Result},
    observables::{Observables, Transition},
    topology::{Edge, Lattice2D, Lattice3D, Network, Topology},
};

/// Seed used when callers do not supply one.
pub const DEFAULT_SEED: u64 = 8;

/// A graph evolving on topology `T`.
///
/// The graph is mutated in place by the evolution models; every committed edge
/// merges two clusters and appends one entry to each observable series.
///
/// # Examples
/// ```
/// use percolate_core::{Graph, Topology};
///
/// let mut graph = Graph::new_network(4, 8)?;
/// graph.add_edge(percolate_core::Edge::new(0, 3))?;
/// assert_eq!(graph.step_count(), 1);
/// assert_eq!(graph.observables().largest_cluster_size(), &[1, 2]);
/// assert_eq!(graph.topology().node_count(), 4);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Graph<T> {
    topology: T,
    seed: u64,
    rng: SmallRng,
    tracker: ClusterTracker,
    edges: Vec<Edge>,
    active: HashSet<Edge>,
    intra_cluster_edges: usize,
    observables: Observables,
}

impl<T: Topology> Graph<T> {
    /// Creates an unevolved graph on `topology` with a seeded generator.
    #[must_use]
    pub fn with_topology(topology: T, seed: u64) -> Self {
        let tracker = ClusterTracker::new(topology.node_count());
        let observables = Observables::new(&tracker);
        Self {
            topology,
            seed,
            rng: SmallRng::seed_from_u64(seed),
            tracker,
            edges: Vec::new(),
            active: HashSet::new(),
            intra_cluster_edges: 0,
            observables,
        }
    }

    /// Returns the topology the graph evolves on.
    #[must_use]
    pub fn topology(&self) -> &T {
        &self.topology
    }

    /// Returns the seed the generator was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.tracker.node_count()
    }

    /// Returns the number of committed edges.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the committed edges in commit order.
    #[must_use]
    pub fn active_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns whether `edge` has been committed.
    #[must_use]
    pub fn is_active(&self, edge: Edge) -> bool {
        self.active.contains(&edge)
    }

    /// Returns the number of allowed edges not yet committed.
    #[must_use]
    pub fn inactive_edge_count(&self) -> usize {
        self.topology.edge_count() - self.edges.len()
    }

    /// Returns the number of allowed edges whose endpoints lie in different
    /// clusters, i.e. the edges a model may still commit.
    #[must_use]
    pub fn mergeable_edge_count(&self) -> usize {
        self.topology.edge_count() - self.intra_cluster_edges
    }

    /// Returns the cluster tracker.
    #[must_use]
    pub fn tracker(&self) -> &ClusterTracker {
        &self.tracker
    }

    /// Returns the recorded observables.
    #[must_use]
    pub fn observables(&self) -> &Observables {
        &self.observables
    }

    /// Returns up to `k` clusters ordered by size (descending) then id.
    #[must_use]
    pub fn largest_clusters(&self, k: usize) -> Vec<(ClusterId, usize)> {
        self.tracker.largest_clusters(k)
    }

    /// Returns the nodes sharing a cluster with `node`, `node` included.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] when `node` is outside the
    /// graph.
    pub fn cluster_of(&self, node: usize) -> Result<&[usize]> {
        self.tracker.members_of(node)
    }

    /// Returns the sizes of the clusters containing the endpoints of `edge`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for endpoints outside the
    /// graph.
    pub fn endpoint_sizes(&self, edge: Edge) -> Result<(usize, usize)> {
        Ok((
            self.tracker.size_of_node(edge.low())?,
            self.tracker.size_of_node(edge.high())?,
        ))
    }

    /// Returns whether both endpoints of `edge` share a cluster.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for endpoints outside the
    /// graph.
    pub fn joins_same_cluster(&self, edge: Edge) -> Result<bool> {
        self.tracker.same_cluster(edge.low(), edge.high())
    }

    /// Draws one allowed edge from the topology, active or not.
    pub(crate) fn draw_edge(&mut self) -> Edge {
        self.topology.random_edge(&mut self.rng)
    }

    /// Draws a uniform value in `[0, 1)` from the graph's generator.
    pub(crate) fn draw_unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Commits `edge`, merging the clusters of its endpoints and appending the
    /// new observables.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidEdge`] when the topology does not
    /// allow the edge or it is already active,
    /// [`PercolationError::NodeOutOfBounds`] for endpoints outside the graph
    /// and [`PercolationError::InvalidOperation`] when both endpoints already
    /// share a cluster. The graph is unchanged on error.
    pub fn add_edge(&mut self, edge: Edge) -> Result<Merge> {
        self.tracker.find(edge.high())?;
        if !self.topology.allows(edge) {
            return Err(PercolationError::InvalidEdge {
                edge,
                reason: "the topology does not allow it",
            });
        }
        if self.active.contains(&edge) {
            return Err(PercolationError::InvalidEdge {
                edge,
                reason: "it is already active",
            });
        }

        let left = self.tracker.find(edge.low())?;
        let right = self.tracker.find(edge.high())?;
        let (absorbed, into) = match (
            self.tracker.cluster_size(left),
            self.tracker.cluster_size(right),
        ) {
            (Some(left_size), Some(right_size)) if left_size < right_size => (left, right),
            _ => (right, left),
        };
        let newly_internal = if left == right {
            0
        } else {
            self.topology.edges_between(&self.tracker, absorbed, into)
        };

        let merge = self.tracker.merge(edge.low(), edge.high())?;
        self.intra_cluster_edges += newly_internal;
        self.edges.push(edge);
        self.active.insert(edge);
        self.observables.record(&self.tracker);

        trace!(
            step = self.edges.len(),
            %edge,
            larger = %merge.larger(),
            smaller = %merge.smaller(),
            size = merge.size(),
            "edge committed"
        );
        #[cfg(feature = "metrics")]
        metrics::counter!("percolate_edges_committed").increment(1);

        Ok(merge)
    }

    /// Computes both transition-width estimates from the recorded series.
    ///
    /// # Errors
    /// Returns [`PercolationError::UndefinedTransition`] when an estimator's
    /// threshold is never met.
    #[instrument(
        name = "core.finalize",
        err,
        skip(self),
        fields(topology = self.topology.name(), steps = self.edges.len()),
    )]
    pub fn finalize_observables(&mut self) -> Result<(Transition, Transition)> {
        self.observables.finalize()
    }

    /// Computes the threshold-crossing estimate only.
    ///
    /// # Errors
    /// Returns [`PercolationError::UndefinedTransition`] when a threshold is
    /// never met.
    pub fn compute_delta_method_1(&mut self) -> Result<Transition> {
        self.observables.compute_delta_method_1()
    }

    /// Computes the extremum estimate only.
    ///
    /// # Errors
    /// Returns [`PercolationError::UndefinedTransition`] when no step has been
    /// committed.
    pub fn compute_delta_method_2(&mut self) -> Result<Transition> {
        self.observables.compute_delta_method_2()
    }
}

impl Graph<Network> {
    /// Creates a random network over `node_count` nodes.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] when `node_count` is zero.
    pub fn new_network(node_count: usize, seed: u64) -> Result<Self> {
        Ok(Self::with_topology(Network::new(node_count)?, seed))
    }
}

impl Graph<Lattice2D> {
    /// Creates a periodic `L × L` lattice.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] when `side_length` is zero.
    pub fn new_lattice_2d(side_length: usize, seed: u64) -> Result<Self> {
        Ok(Self::with_topology(Lattice2D::new(side_length)?, seed))
    }
}

impl Graph<Lattice3D> {
    /// Creates a periodic `L × L × L` lattice.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] when `side_length` is zero
    /// or the node count overflows.
    pub fn new_lattice_3d(side_length: usize, seed: u64) -> Result<Self> {
        Ok(Self::with_topology(Lattice3D::new(side_length)?, seed))
    }
}

/// Creates a random network; see [`Graph::new_network`].
///
/// # Errors
/// Returns [`PercolationError::InvalidArgument`] when `node_count` is zero.
pub fn new_network(node_count: usize, seed: u64) -> Result<Graph<Network>> {
    Graph::new_network(node_count, seed)
}

/// Creates a periodic square lattice; see [`Graph::new_lattice_2d`].
///
/// # Errors
/// Returns [`PercolationError::InvalidArgument`] when `side_length` is zero.
pub fn new_lattice_2d(side_length: usize, seed: u64) -> Result<Graph<Lattice2D>> {
    Graph::new_lattice_2d(side_length, seed)
}

/// Creates a periodic cubic lattice; see [`Graph::new_lattice_3d`].
///
/// # Errors
/// Returns [`PercolationError::InvalidArgument`] when `side_length` is zero.
pub fn new_lattice_3d(side_length: usize, seed: u64) -> Result<Graph<Lattice3D>> {
    Graph::new_lattice_3d(side_length, seed)
}

/// Returns up to `k` clusters of `graph`; see [`Graph::largest_clusters`].
#[must_use]
pub fn get_largest_clusters<T: Topology>(graph: &Graph<T>, k: usize) -> Vec<(ClusterId, usize)> {
    graph.largest_clusters(k)
}

/// Returns the members of the cluster containing `node`; see
/// [`Graph::cluster_of`].
///
/// # Errors
/// Returns [`PercolationError::NodeOutOfBounds`] when `node` is outside the
/// graph.
pub fn get_cluster<T: Topology>(graph: &Graph<T>, node: usize) -> Result<&[usize]> {
    graph.cluster_of(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[test]
    fn add_edge_updates_every_view() {
        let mut graph = Graph::new_network(4, DEFAULT_SEED).expect("valid size");
        let merge = graph.add_edge(Edge::new(2, 1)).expect("edge is valid");
        assert_eq!(merge.larger(), ClusterId::new(1));
        assert_eq!(graph.step_count(), 1);
        assert_eq!(graph.active_edges(), &[Edge::new(1, 2)]);
        assert!(graph.is_active(Edge::new(1, 2)));
        assert_eq!(graph.observables().largest_cluster_size(), &[1, 2]);
        assert_eq!(graph.observables().heterogeneity(), &[1, 2]);
        assert_eq!(graph.observables().avg_cluster_size(), &[1.0, 4.0 / 3.0]);
        assert_eq!(graph.mergeable_edge_count(), 5);
        assert_eq!(graph.inactive_edge_count(), 5);
    }

    #[test]
    fn cluster_of_lists_every_member() {
        let mut graph = Graph::new_lattice_2d(3, DEFAULT_SEED).expect("valid side");
        graph.add_edge(Edge::new(0, 1)).expect("first edge");
        graph.add_edge(Edge::new(4, 1)).expect("second edge");
        let mut members = graph.cluster_of(4).expect("node exists").to_vec();
        members.sort_unstable();
        assert_eq!(members, vec![0, 1, 4]);
        assert_eq!(get_cluster(&graph, 8).expect("node exists"), &[8]);
        assert_eq!(
            graph.cluster_of(9),
            Err(PercolationError::NodeOutOfBounds {
                node: 9,
                node_count: 9
            })
        );
    }

    #[test]
    fn add_edge_rejects_same_cluster() {
        let mut graph = Graph::new_network(3, DEFAULT_SEED).expect("valid size");
        graph.add_edge(Edge::new(0, 1)).expect("first edge");
        graph.add_edge(Edge::new(1, 2)).expect("second edge");
        let err = graph
            .add_edge(Edge::new(0, 2))
            .expect_err("0 and 2 already share a cluster");
        assert!(matches!(err, PercolationError::InvalidOperation { .. }));
        assert_eq!(graph.step_count(), 2);
        assert_eq!(graph.observables().len(), 3);
        assert_eq!(graph.mergeable_edge_count(), 0);
    }

    #[rstest]
    #[case(Edge::new(1, 1), "the topology does not allow it")]
    #[case(Edge::new(0, 4), "the topology does not allow it")]
    fn add_edge_rejects_non_lattice_edges(#[case] edge: Edge, #[case] reason: &'static str) {
        let mut graph = Graph::new_lattice_2d(3, DEFAULT_SEED).expect("valid side");
        let err = graph.add_edge(edge).expect_err("edge is not allowed");
        assert_eq!(err, PercolationError::InvalidEdge { edge, reason });
        assert_eq!(graph.step_count(), 0);
    }

    #[test]
    fn add_edge_rejects_out_of_bounds_endpoints() {
        let mut graph = Graph::new_network(3, DEFAULT_SEED).expect("valid size");
        let err = graph
            .add_edge(Edge::new(0, 7))
            .expect_err("node 7 does not exist");
        assert_eq!(
            err,
            PercolationError::NodeOutOfBounds {
                node: 7,
                node_count: 3
            }
        );
    }

    #[test]
    fn lattice_mergeable_count_tracks_internal_bonds() {
        let mut graph = Graph::new_lattice_2d(2, DEFAULT_SEED).expect("valid side");
        assert_eq!(graph.mergeable_edge_count(), 4);
        graph.add_edge(Edge::new(0, 1)).expect("bond 0-1");
        graph.add_edge(Edge::new(2, 3)).expect("bond 2-3");
        assert_eq!(graph.mergeable_edge_count(), 2);
        graph.add_edge(Edge::new(0, 2)).expect("bond 0-2");
        assert_eq!(graph.mergeable_edge_count(), 0);
        assert_eq!(graph.inactive_edge_count(), 1);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 8)]
    #[case(3, 27)]
    fn cubic_lattice_node_count(#[case] side: usize, #[case] nodes: usize) {
        let graph = new_lattice_3d(side, DEFAULT_SEED).expect("valid side");
        assert_eq!(graph.node_count(), nodes);
        assert_eq!(graph.topology().side_length(), side);
    }
}
