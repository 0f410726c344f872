//! Incremental cluster tracking for edge-by-edge graph evolution.
//!
//! Every node starts as the sole member of its own cluster, identified by the
//! node id. Merges relabel the members of the smaller cluster so that
//! [`ClusterTracker::find`] stays O(1); because a node is only relabelled when
//! its cluster is the smaller side, its cluster at least doubles each time and
//! the total relabelling work over a whole evolution is O(n log n).
//!
//! A size histogram (cluster size → number of clusters with that size) backs
//! the per-step observables so that neither the average size nor the number of
//! distinct sizes requires a scan over all clusters.

use std::{collections::BTreeMap, fmt};

use crate::error::{PercolationError, Result};

/// Identifier assigned to a cluster.
///
/// Cluster ids are node ids: a cluster keeps the id of the node it started
/// from for as long as it survives merges.
///
/// # Examples
/// ```
/// use percolate_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Creates a new cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a successful merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    larger: ClusterId,
    smaller: ClusterId,
    size: usize,
}

impl Merge {
    /// Returns the surviving cluster.
    #[rustfmt::skip]
    #[must_use]
    pub const fn larger(&self) -> ClusterId { self.larger }

    /// Returns the cluster that was absorbed and is no longer live.
    #[rustfmt::skip]
    #[must_use]
    pub const fn smaller(&self) -> ClusterId { self.smaller }

    /// Returns the size of the merged cluster.
    #[rustfmt::skip]
    #[must_use]
    pub const fn size(&self) -> usize { self.size }
}

/// Disjoint-set structure with explicit membership and a size histogram.
///
/// # Examples
/// ```
/// use percolate_core::ClusterTracker;
///
/// let mut tracker = ClusterTracker::new(4);
/// let merge = tracker.merge(0, 1)?;
/// assert_eq!(merge.size(), 2);
/// assert!(tracker.same_cluster(0, 1)?);
/// assert_eq!(tracker.cluster_count(), 3);
/// assert_eq!(tracker.largest_cluster_size(), 2);
/// # Ok::<(), percolate_core::PercolationError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTracker {
    cluster_of: Vec<usize>,
    members: Vec<Option<Vec<usize>>>,
    size_histogram: BTreeMap<usize, usize>,
    cluster_count: usize,
    largest: usize,
}

impl ClusterTracker {
    /// Creates a tracker with `node_count` singleton clusters.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        let mut size_histogram = BTreeMap::new();
        if node_count > 0 {
            size_histogram.insert(1, node_count);
        }
        Self {
            cluster_of: (0..node_count).collect(),
            members: (0..node_count).map(|node| Some(vec![node])).collect(),
            size_histogram,
            cluster_count: node_count,
            largest: usize::from(node_count > 0),
        }
    }

    /// Returns the number of tracked nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.cluster_of.len()
    }

    /// Returns the number of live clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_count
    }

    /// Returns the cluster containing `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] when `node` is not tracked.
    pub fn find(&self, node: usize) -> Result<ClusterId> {
        self.cluster_of
            .get(node)
            .copied()
            .map(ClusterId)
            .ok_or(PercolationError::NodeOutOfBounds {
                node,
                node_count: self.node_count(),
            })
    }

    /// Returns whether `left` and `right` belong to the same cluster.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] when either node is not
    /// tracked.
    pub fn same_cluster(&self, left: usize, right: usize) -> Result<bool> {
        Ok(self.find(left)? == self.find(right)?)
    }

    /// Returns the size of the live cluster `id`, or `None` for ids that have
    /// been absorbed or were never valid.
    #[must_use]
    pub fn cluster_size(&self, id: ClusterId) -> Option<usize> {
        self.cluster_members(id).map(<[usize]>::len)
    }

    /// Returns the members of the live cluster `id` in merge order.
    #[must_use]
    pub fn cluster_members(&self, id: ClusterId) -> Option<&[usize]> {
        self.members.get(id.0)?.as_deref()
    }

    /// Returns the size of the cluster that contains `node`.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] when `node` is not tracked.
    pub fn size_of_node(&self, node: usize) -> Result<usize> {
        let id = self.find(node)?;
        Ok(self.cluster_size(id).unwrap_or(0))
    }

    /// Returns the members of the cluster that contains `node`, in merge order.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] when `node` is not tracked.
    pub fn members_of(&self, node: usize) -> Result<&[usize]> {
        let id = self.find(node)?;
        Ok(self.cluster_members(id).unwrap_or_default())
    }

    /// Returns the size of the largest live cluster.
    #[must_use]
    pub fn largest_cluster_size(&self) -> usize {
        self.largest
    }

    /// Returns the mean size over live clusters (`node_count / cluster_count`).
    #[must_use]
    pub fn average_cluster_size(&self) -> f64 {
        if self.cluster_count == 0 {
            return 0.0;
        }
        self.node_count() as f64 / self.cluster_count as f64
    }

    /// Returns the number of distinct cluster sizes currently present.
    #[must_use]
    pub fn heterogeneity(&self) -> usize {
        self.size_histogram.len()
    }

    /// Returns the cluster size distribution ordered by size.
    #[must_use]
    pub fn size_histogram(&self) -> &BTreeMap<usize, usize> {
        &self.size_histogram
    }

    /// Iterates live clusters in id order.
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterId, &[usize])> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(id, members)| Some((ClusterId(id), members.as_deref()?)))
    }

    /// Returns up to `k` clusters ordered by size (descending) then id
    /// (ascending).
    ///
    /// # Examples
    /// ```
    /// use percolate_core::{ClusterId, ClusterTracker};
    ///
    /// let mut tracker = ClusterTracker::new(5);
    /// tracker.merge(3, 4)?;
    /// let top = tracker.largest_clusters(2);
    /// assert_eq!(top, vec![(ClusterId::new(3), 2), (ClusterId::new(0), 1)]);
    /// # Ok::<(), percolate_core::PercolationError>(())
    /// ```
    #[must_use]
    pub fn largest_clusters(&self, k: usize) -> Vec<(ClusterId, usize)> {
        let mut ranked: Vec<(ClusterId, usize)> = self
            .clusters()
            .map(|(id, members)| (id, members.len()))
            .collect();
        ranked.sort_unstable_by(|(left_id, left_size), (right_id, right_size)| {
            right_size
                .cmp(left_size)
                .then_with(|| left_id.cmp(right_id))
        });
        ranked.truncate(k);
        ranked
    }

    /// Merges the clusters containing `left` and `right`.
    ///
    /// The smaller cluster is absorbed into the larger one; on equal sizes the
    /// cluster with the lower id survives.
    ///
    /// # Errors
    /// Returns [`PercolationError::NodeOutOfBounds`] for untracked nodes and
    /// [`PercolationError::InvalidOperation`] when both nodes already share a
    /// cluster.
    pub fn merge(&mut self, left: usize, right: usize) -> Result<Merge> {
        let left_id = self.find(left)?;
        let right_id = self.find(right)?;
        if left_id == right_id {
            return Err(PercolationError::InvalidOperation {
                left,
                right,
                cluster: left_id,
            });
        }

        let left_size = self.cluster_size(left_id).unwrap_or(0);
        let right_size = self.cluster_size(right_id).unwrap_or(0);
        let (larger, smaller) = order_by_size(left_id, left_size, right_id, right_size);
        let smaller_size = left_size.min(right_size);
        let larger_size = left_size.max(right_size);

        let absorbed = self.members[smaller.0].take().unwrap_or_default();
        for &node in &absorbed {
            self.cluster_of[node] = larger.0;
        }
        if let Some(target) = self.members[larger.0].as_mut() {
            target.extend(absorbed);
        }

        let size = larger_size + smaller_size;
        self.decrement_size(larger_size);
        self.decrement_size(smaller_size);
        *self.size_histogram.entry(size).or_insert(0) += 1;
        self.cluster_count -= 1;
        self.largest = self.largest.max(size);

        Ok(Merge {
            larger,
            smaller,
            size,
        })
    }

    fn decrement_size(&mut self, size: usize) {
        if let Some(count) = self.size_histogram.get_mut(&size) {
            *count -= 1;
            if *count == 0 {
                self.size_histogram.remove(&size);
            }
        }
    }
}

fn order_by_size(
    left: ClusterId,
    left_size: usize,
    right: ClusterId,
    right_size: usize,
) -> (ClusterId, ClusterId) {
    match left_size.cmp(&right_size) {
        std::cmp::Ordering::Greater => (left, right),
        std::cmp::Ordering::Less => (right, left),
        std::cmp::Ordering::Equal if left <= right => (left, right),
        std::cmp::Ordering::Equal => (right, left),
    }
}
