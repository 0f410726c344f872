//! Rejection sampling of candidate edges.
//!
//! The raw samplers return edges that are allowed by the topology and not yet
//! active. The models additionally need candidates that join two different
//! clusters; [`Graph::sample_mergeable`] discards and redraws the rest.

use crate::{
    error::{PercolationError, Result},
    graph::Graph,
    topology::{Edge, Topology},
};

impl<T: Topology> Graph<T> {
    /// Draws a uniformly random inactive edge.
    ///
    /// # Errors
    /// Returns [`PercolationError::Exhausted`] when every allowed edge is
    /// already active.
    pub fn sample_candidate(&mut self) -> Result<Edge> {
        if self.inactive_edge_count() == 0 {
            return Err(self.exhausted());
        }
        loop {
            let edge = self.draw_edge();
            if !self.is_active(edge) {
                return Ok(edge);
            }
        }
    }

    /// Draws a uniformly random inactive edge different from `first`.
    ///
    /// # Errors
    /// Returns [`PercolationError::Exhausted`] when no inactive edge other than
    /// `first` remains.
    pub fn sample_second_candidate(&mut self, first: Edge) -> Result<Edge> {
        let excluded = usize::from(!self.is_active(first) && self.topology().allows(first));
        if self.inactive_edge_count() <= excluded {
            return Err(self.exhausted());
        }
        loop {
            let edge = self.draw_edge();
            if edge != first && !self.is_active(edge) {
                return Ok(edge);
            }
        }
    }

    /// Draws a candidate joining two different clusters, skipping `exclude`.
    ///
    /// Candidates inside a single cluster are discarded and redrawn.
    pub(crate) fn sample_mergeable(&mut self, exclude: Option<Edge>) -> Result<Edge> {
        let excluded = match exclude {
            Some(edge) => usize::from(!self.joins_same_cluster(edge)?),
            None => 0,
        };
        if self.mergeable_edge_count() <= excluded {
            return Err(self.exhausted());
        }
        loop {
            let edge = match exclude {
                Some(first) => self.sample_second_candidate(first)?,
                None => self.sample_candidate()?,
            };
            if !self.joins_same_cluster(edge)? {
                return Ok(edge);
            }
            #[cfg(feature = "metrics")]
            metrics::counter!("percolate_candidates_rejected").increment(1);
        }
    }

    fn exhausted(&self) -> PercolationError {
        PercolationError::Exhausted {
            step_count: self.step_count(),
        }
    }
}

/// Draws a uniformly random inactive edge; see [`Graph::sample_candidate`].
///
/// # Errors
/// Returns [`PercolationError::Exhausted`] when every allowed edge is active.
pub fn sample_candidate<T: Topology>(graph: &mut Graph<T>) -> Result<Edge> {
    graph.sample_candidate()
}

/// Draws a second inactive edge different from `first`; see
/// [`Graph::sample_second_candidate`].
///
/// # Errors
/// Returns [`PercolationError::Exhausted`] when no other inactive edge remains.
pub fn sample_second_candidate<T: Topology>(graph: &mut Graph<T>, first: Edge) -> Result<Edge> {
    graph.sample_second_candidate(first)
}
