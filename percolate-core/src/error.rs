//! Error types for the percolate core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes and
//! a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::{cluster::ClusterId, topology::Edge};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Which transition-width estimator failed to find its threshold.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DeltaMethod {
    /// Threshold crossing of the largest cluster size (`√n` and `n / 2`).
    ThresholdCrossing,
    /// Heterogeneity peak versus the largest jump of the largest cluster.
    Extremum,
}

impl fmt::Display for DeltaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ThresholdCrossing => "method 1",
            Self::Extremum => "method 2",
        })
    }
}

/// Error type produced when constructing, evolving or analysing a graph.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PercolationError {
    /// A construction or model parameter was out of range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter.
        name: &'static str,
        /// Human-readable description of the accepted range.
        reason: String,
    },
    /// A merge was requested for two nodes that already share a cluster.
    #[error("nodes {left} and {right} already belong to cluster {cluster}")]
    InvalidOperation {
        /// First endpoint of the rejected merge.
        left: usize,
        /// Second endpoint of the rejected merge.
        right: usize,
        /// Cluster that already contains both endpoints.
        cluster: ClusterId,
    },
    /// A node id was outside `0..node_count`.
    #[error("node {node} is out of bounds for {node_count} nodes")]
    NodeOutOfBounds {
        /// The requested node id.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// An edge is not allowed by the topology or is already active.
    #[error("edge {edge} cannot be added: {reason}")]
    InvalidEdge {
        /// The rejected edge.
        edge: Edge,
        /// Why the edge was rejected.
        reason: &'static str,
    },
    /// No edge remains that the sampler or model could select.
    #[error("no selectable edge remains after {step_count} steps")]
    Exhausted {
        /// Number of edges committed when sampling ran dry.
        step_count: usize,
    },
    /// A transition-width estimator found no step satisfying its threshold.
    #[error("transition is undefined for {method}: {reason}")]
    UndefinedTransition {
        /// Estimator that failed.
        method: DeltaMethod,
        /// Which threshold could not be met.
        reason: &'static str,
    },
}

define_error_codes! {
    /// Stable codes describing [`PercolationError`] variants.
    enum PercolationErrorCode for PercolationError {
        /// A construction or model parameter was out of range.
        InvalidArgument => InvalidArgument { .. } => "PERCOLATE_INVALID_ARGUMENT",
        /// A merge was requested for two nodes that already share a cluster.
        InvalidOperation => InvalidOperation { .. } => "PERCOLATE_INVALID_OPERATION",
        /// A node id was outside `0..node_count`.
        NodeOutOfBounds => NodeOutOfBounds { .. } => "PERCOLATE_NODE_OUT_OF_BOUNDS",
        /// An edge is not allowed by the topology or is already active.
        InvalidEdge => InvalidEdge { .. } => "PERCOLATE_INVALID_EDGE",
        /// No edge remains that the sampler or model could select.
        Exhausted => Exhausted { .. } => "PERCOLATE_EXHAUSTED",
        /// A transition-width estimator found no step satisfying its threshold.
        UndefinedTransition => UndefinedTransition { .. } => "PERCOLATE_UNDEFINED_TRANSITION",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, PercolationError>;
