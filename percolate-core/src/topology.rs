//! Topology providers: which node pairs may ever carry an edge.
//!
//! The unstructured [`Network`] allows an edge between any two distinct nodes.
//! [`Lattice2D`] and [`Lattice3D`] only allow nearest-neighbour edges on a
//! periodic square or cubic lattice, addressed through a deterministic
//! cartesian ⇄ linear index mapping.

use std::fmt;

use rand::Rng;

use crate::{
    cluster::{ClusterId, ClusterTracker},
    error::{PercolationError, Result},
};

/// An undirected edge in canonical form (`low < high`).
///
/// # Examples
/// ```
/// use percolate_core::Edge;
///
/// let edge = Edge::new(5, 2);
/// assert_eq!(edge.low(), 2);
/// assert_eq!(edge.high(), 5);
/// assert_eq!(edge, Edge::new(2, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    low: usize,
    high: usize,
}

impl Edge {
    /// Creates an edge between `left` and `right`, ordering the endpoints.
    #[must_use]
    pub const fn new(left: usize, right: usize) -> Self {
        if left <= right {
            Self {
                low: left,
                high: right,
            }
        } else {
            Self {
                low: right,
                high: left,
            }
        }
    }

    /// Returns the smaller endpoint.
    #[rustfmt::skip]
    #[must_use]
    pub const fn low(&self) -> usize { self.low }

    /// Returns the larger endpoint.
    #[rustfmt::skip]
    #[must_use]
    pub const fn high(&self) -> usize { self.high }

    /// Returns both endpoints as a tuple.
    #[rustfmt::skip]
    #[must_use]
    pub const fn endpoints(&self) -> (usize, usize) { (self.low, self.high) }

    /// Returns `true` when both endpoints coincide.
    #[rustfmt::skip]
    #[must_use]
    pub const fn is_loop(&self) -> bool { self.low == self.high }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// The fixed vertex set and edge rule a graph evolves on.
///
/// Implementations must be deterministic: the same RNG state yields the same
/// edge.
pub trait Topology {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of distinct edges the topology allows.
    fn edge_count(&self) -> usize;

    /// Returns whether `edge` is allowed by the topology.
    fn allows(&self, edge: Edge) -> bool;

    /// Draws a uniformly random allowed edge. Only called when
    /// [`Self::edge_count`] is positive.
    fn random_edge<R: Rng>(&self, rng: &mut R) -> Edge;

    /// Counts the allowed edges with one endpoint in `absorbed` and the other
    /// in `into`. Called just before the two clusters merge.
    fn edges_between(
        &self,
        tracker: &ClusterTracker,
        absorbed: ClusterId,
        into: ClusterId,
    ) -> usize;
}

/// Unstructured network: every pair of distinct nodes is a potential edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    node_count: usize,
}

impl Network {
    /// Creates a network over `node_count` nodes.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] when `node_count` is zero.
    pub fn new(node_count: usize) -> Result<Self> {
        if node_count == 0 {
            return Err(PercolationError::InvalidArgument {
                name: "node_count",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(Self { node_count })
    }
}

impl Topology for Network {
    fn name(&self) -> &'static str {
        "network"
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn edge_count(&self) -> usize {
        self.node_count * (self.node_count - 1) / 2
    }

    fn allows(&self, edge: Edge) -> bool {
        !edge.is_loop() && edge.high() < self.node_count
    }

    fn random_edge<R: Rng>(&self, rng: &mut R) -> Edge {
        let first = rng.gen_range(0..self.node_count);
        let mut second = rng.gen_range(0..self.node_count - 1);
        if second >= first {
            second += 1;
        }
        Edge::new(first, second)
    }

    fn edges_between(
        &self,
        tracker: &ClusterTracker,
        absorbed: ClusterId,
        into: ClusterId,
    ) -> usize {
        let absorbed_size = tracker.cluster_size(absorbed).unwrap_or(0);
        let into_size = tracker.cluster_size(into).unwrap_or(0);
        absorbed_size * into_size
    }
}

/// Periodic hypercubic lattice with side length `L` in `D` dimensions.
///
/// Node coordinates are `[x0, x1, ..]` with `x0` varying fastest in the
/// linear index. Neighbours are listed per axis as (minus, plus), i.e. up,
/// down, left, right, front, back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lattice<const D: usize> {
    side_length: usize,
    node_count: usize,
}

/// Square lattice with periodic boundaries.
pub type Lattice2D = Lattice<2>;

/// Cubic lattice with periodic boundaries.
pub type Lattice3D = Lattice<3>;

impl<const D: usize> Lattice<D> {
    /// Creates a lattice with `side_length` nodes along every axis.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] when `side_length` is zero
    /// or `side_length^D` overflows `usize`.
    pub fn new(side_length: usize) -> Result<Self> {
        if side_length == 0 {
            return Err(PercolationError::InvalidArgument {
                name: "side_length",
                reason: "must be at least 1".to_owned(),
            });
        }
        let node_count = u32::try_from(D)
            .ok()
            .and_then(|dims| side_length.checked_pow(dims))
            .ok_or_else(|| PercolationError::InvalidArgument {
                name: "side_length",
                reason: format!("{side_length}^{D} nodes overflow the address space"),
            })?;
        Ok(Self {
            side_length,
            node_count,
        })
    }

    /// Returns the side length `L`.
    #[must_use]
    pub const fn side_length(&self) -> usize {
        self.side_length
    }

    /// Converts cartesian coordinates into a linear node index.
    ///
    /// # Errors
    /// Returns [`PercolationError::InvalidArgument`] when a coordinate is not
    /// below the side length.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::Lattice2D;
    ///
    /// let lattice = Lattice2D::new(3)?;
    /// assert_eq!(lattice.linear_index([2, 1])?, 5);
    /// assert_eq!(lattice.coordinates(5), [2, 1]);
    /// # Ok::<(), percolate_core::PercolationError>(())
    /// ```
    pub fn linear_index(&self, coordinates: [usize; D]) -> Result<usize> {
        let mut index = 0;
        for &coordinate in coordinates.iter().rev() {
            if coordinate >= self.side_length {
                return Err(PercolationError::InvalidArgument {
                    name: "coordinates",
                    reason: format!(
                        "coordinate {coordinate} is outside a lattice of side {}",
                        self.side_length
                    ),
                });
            }
            index = index * self.side_length + coordinate;
        }
        Ok(index)
    }

    /// Converts a linear node index into cartesian coordinates.
    #[must_use]
    pub fn coordinates(&self, node: usize) -> [usize; D] {
        let mut coordinates = [0; D];
        let mut rest = node;
        for coordinate in &mut coordinates {
            *coordinate = rest % self.side_length;
            rest /= self.side_length;
        }
        coordinates
    }

    /// Returns the endpoints of `edge` as cartesian coordinates.
    #[must_use]
    pub fn edge_coordinates(&self, edge: Edge) -> ([usize; D], [usize; D]) {
        (self.coordinates(edge.low()), self.coordinates(edge.high()))
    }

    /// Returns the linear indices of the `2 * D` nearest neighbours of `node`
    /// under periodic boundaries, two per axis.
    ///
    /// For `L = 2` the two neighbours along an axis coincide; for `L = 1` every
    /// neighbour is `node` itself.
    #[must_use]
    pub fn nearest_neighbors(&self, node: usize) -> Vec<usize> {
        let mut neighbours = Vec::with_capacity(2 * D);
        let mut stride = 1;
        let side = self.side_length;
        for axis_coordinate in self.coordinates(node) {
            let base = node - axis_coordinate * stride;
            let minus = (axis_coordinate + side - 1) % side;
            let plus = (axis_coordinate + 1) % side;
            neighbours.push(base + minus * stride);
            neighbours.push(base + plus * stride);
            stride *= side;
        }
        neighbours
    }

    fn distinct_neighbors(&self, node: usize) -> Vec<usize> {
        let mut neighbours = self.nearest_neighbors(node);
        neighbours.retain(|&neighbour| neighbour != node);
        neighbours.sort_unstable();
        neighbours.dedup();
        neighbours
    }

    fn distinct_neighbors_per_axis(&self) -> usize {
        match self.side_length {
            1 => 0,
            2 => 1,
            _ => 2,
        }
    }
}

impl<const D: usize> Topology for Lattice<D> {
    fn name(&self) -> &'static str {
        match D {
            2 => "lattice2d",
            3 => "lattice3d",
            _ => "lattice",
        }
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn edge_count(&self) -> usize {
        self.node_count * D * self.distinct_neighbors_per_axis() / 2
    }

    fn allows(&self, edge: Edge) -> bool {
        !edge.is_loop()
            && edge.high() < self.node_count
            && self.nearest_neighbors(edge.low()).contains(&edge.high())
    }

    fn random_edge<R: Rng>(&self, rng: &mut R) -> Edge {
        let node = rng.gen_range(0..self.node_count);
        let direction = rng.gen_range(0..2 * D);
        let neighbours = self.nearest_neighbors(node);
        Edge::new(node, neighbours.get(direction).copied().unwrap_or(node))
    }

    fn edges_between(
        &self,
        tracker: &ClusterTracker,
        absorbed: ClusterId,
        into: ClusterId,
    ) -> usize {
        let Some(members) = tracker.cluster_members(absorbed) else {
            return 0;
        };
        members
            .iter()
            .map(|&node| {
                self.distinct_neighbors(node)
                    .into_iter()
                    .filter(|&neighbour| tracker.find(neighbour).is_ok_and(|id| id == into))
                    .count()
            })
            .sum()
    }
}
