//! Fixture types for the evolution property suite.

use test_strategy::Arbitrary;

use crate::EvolutionModel;

/// Topology family a fixture evolves on.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum TopologyKind {
    /// Unstructured network over `size` nodes.
    #[weight(3)]
    Network,
    /// Periodic square lattice with side `size`.
    #[weight(3)]
    Square,
    /// Periodic cubic lattice with side `size`.
    #[weight(1)]
    Cubic,
}

/// Evolution model family; parameters are drawn separately.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum ModelKind {
    ErdosRenyi,
    BohmanFrieze,
    ProductRule,
    StochasticEdgeAcceptance,
}

/// One generated evolution run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) struct EvolutionFixture {
    /// Topology family.
    pub topology: TopologyKind,
    /// Node count for networks, side length for lattices.
    pub size: usize,
    /// Model and parameters.
    pub model: EvolutionModel,
    /// Step counts for consecutive `step` calls.
    pub chunks: [usize; 2],
    /// Generator seed.
    pub seed: u64,
}
