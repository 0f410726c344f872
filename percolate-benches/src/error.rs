//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of using
//! `.expect()`.

use percolate_core::PercolationError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Graph construction or evolution failed.
    #[error("percolation operation failed: {0}")]
    Percolation(#[from] PercolationError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
