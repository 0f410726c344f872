//! Builder utilities for configuring graph construction.
//!
//! Carries the seed and evolution model, validating both before any graph
//! state is allocated.

use crate::{
    Result,
    graph::{DEFAULT_SEED, Graph},
    models::EvolutionModel,
    topology::{Lattice2D, Lattice3D, Network, Topology},
};

/// Configures and constructs [`Graph`] instances.
///
/// # Examples
/// ```
/// use percolate_core::{EvolutionModel, GraphBuilder};
///
/// let builder = GraphBuilder::new()
///     .with_seed(42)
///     .with_model(EvolutionModel::ProductRule);
/// let mut graph = builder.network(64).expect("builder configuration is valid");
/// builder.evolve(&mut graph, 16).expect("network has room");
/// assert_eq!(graph.seed(), 42);
/// assert_eq!(graph.step_count(), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphBuilder {
    seed: u64,
    model: EvolutionModel,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            model: EvolutionModel::ErdosRenyi,
        }
    }
}

impl GraphBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::{DEFAULT_SEED, EvolutionModel, GraphBuilder};
    ///
    /// let builder = GraphBuilder::new();
    /// assert_eq!(builder.seed(), DEFAULT_SEED);
    /// assert_eq!(builder.model(), EvolutionModel::ErdosRenyi);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the generator seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sets the evolution model applied by [`GraphBuilder::evolve`].
    #[must_use]
    pub fn with_model(mut self, model: EvolutionModel) -> Self {
        self.model = model;
        self
    }

    /// Returns the configured evolution model.
    #[must_use]
    pub fn model(&self) -> EvolutionModel {
        self.model
    }

    /// Validates the configuration without building anything.
    ///
    /// # Errors
    /// Returns [`crate::PercolationError::InvalidArgument`] when the model
    /// parameters are out of range.
    ///
    /// # Examples
    /// ```
    /// use percolate_core::{EvolutionModel, GraphBuilder, PercolationErrorCode};
    ///
    /// let err = GraphBuilder::new()
    ///     .with_model(EvolutionModel::BohmanFrieze { bound: 0 })
    ///     .validate()
    ///     .expect_err("zero bound is rejected");
    /// assert_eq!(err.code(), PercolationErrorCode::InvalidArgument);
    /// ```
    pub fn validate(&self) -> Result<()> {
        self.model.validate()
    }

    /// Builds an unstructured network over `node_count` nodes.
    ///
    /// # Errors
    /// Returns [`crate::PercolationError::InvalidArgument`] for a zero node
    /// count or invalid model parameters.
    pub fn network(&self, node_count: usize) -> Result<Graph<Network>> {
        self.build(Network::new(node_count)?)
    }

    /// Builds a periodic `L × L` lattice.
    ///
    /// # Errors
    /// Returns [`crate::PercolationError::InvalidArgument`] for a zero side or
    /// invalid model parameters.
    pub fn lattice_2d(&self, side_length: usize) -> Result<Graph<Lattice2D>> {
        self.build(Lattice2D::new(side_length)?)
    }

    /// Builds a periodic `L × L × L` lattice.
    ///
    /// # Errors
    /// Returns [`crate::PercolationError::InvalidArgument`] for a zero side,
    /// an overflowing node count or invalid model parameters.
    pub fn lattice_3d(&self, side_length: usize) -> Result<Graph<Lattice3D>> {
        self.build(Lattice3D::new(side_length)?)
    }

    /// Builds a graph on an arbitrary topology.
    ///
    /// # Errors
    /// Returns [`crate::PercolationError::InvalidArgument`] for invalid model
    /// parameters.
    pub fn build<T: Topology>(&self, topology: T) -> Result<Graph<T>> {
        self.validate()?;
        Ok(Graph::with_topology(topology, self.seed))
    }

    /// Applies the configured model to `graph` for `n_steps` steps.
    ///
    /// # Errors
    /// Propagates the errors of [`EvolutionModel::step`].
    pub fn evolve<T: Topology>(&self, graph: &mut Graph<T>, n_steps: usize) -> Result<()> {
        self.model.step(graph, n_steps)
    }
}
