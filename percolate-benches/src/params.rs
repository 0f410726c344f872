//! Benchmark parameter types.
//!
//! Groups related benchmark parameters into structs so that benchmark ids
//! render consistently in Criterion reports.

use std::fmt;

/// Topologies exercised by the evolution benchmarks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BenchTopology {
    /// Unstructured network of `size` nodes.
    Network,
    /// Periodic square lattice with side `size`.
    Square,
    /// Periodic cubic lattice with side `size`.
    Cubic,
}

impl BenchTopology {
    /// Returns the short label used in benchmark ids.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Square => "lattice2d",
            Self::Cubic => "lattice3d",
        }
    }
}

/// Parameters for one evolution benchmark run.
#[derive(Clone, Debug)]
pub struct EvolutionBenchParams {
    /// Topology to evolve on.
    pub topology: BenchTopology,
    /// Node count for networks, side length for lattices.
    pub size: usize,
    /// Steps committed per iteration.
    pub steps: usize,
}

impl fmt::Display for EvolutionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},size={},steps={}",
            self.topology.label(),
            self.size,
            self.steps
        )
    }
}

/// Parameters for a tracker merge benchmark run.
#[derive(Clone, Debug)]
pub struct MergeBenchParams {
    /// Number of nodes in the tracker.
    pub node_count: usize,
}

impl fmt::Display for MergeBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.node_count)
    }
}
