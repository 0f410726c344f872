//! Percolate core library.
//!
//! Simulates cluster growth on random networks and periodic lattices under
//! Erdos-Renyi, Bohman-Frieze, Product Rule and Stochastic Edge Acceptance
//! edge addition, recording order-parameter observables after every merge.
//!
//! # Examples
//! ```
//! use percolate_core::{DEFAULT_SEED, new_lattice_2d, product_rule};
//!
//! let mut graph = new_lattice_2d(16, DEFAULT_SEED)?;
//! product_rule(&mut graph, 200)?;
//! assert_eq!(graph.step_count(), 200);
//! assert_eq!(graph.observables().len(), 201);
//! # Ok::<(), percolate_core::PercolationError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cluster;
#[cfg(feature = "parallel")]
mod ensemble;
mod error;
mod graph;
mod models;
mod observables;
mod sampler;
mod topology;

#[cfg(test)]
mod property;
#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(feature = "parallel")]
#[cfg_attr(docsrs, doc(cfg(feature = "parallel")))]
pub use crate::ensemble::{EnsembleSummary, run_ensemble};
pub use crate::{
    builder::GraphBuilder,
    cluster::{ClusterId, ClusterTracker, Merge},
    error::{DeltaMethod, PercolationError, PercolationErrorCode, Result},
    graph::{
        DEFAULT_SEED, Graph, get_cluster, get_largest_clusters, new_lattice_2d, new_lattice_3d,
        new_network,
    },
    models::{
        DEFAULT_BOUND, DEFAULT_MIN_ACCEPTANCE, EvolutionModel, bohman_frieze, erdos_renyi,
        product_rule, stochastic_edge_acceptance,
    },
    observables::{Observables, Transition},
    sampler::{sample_candidate, sample_second_candidate},
    topology::{Edge, Lattice, Lattice2D, Lattice3D, Network, Topology},
};
