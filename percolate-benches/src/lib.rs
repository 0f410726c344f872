//! Benchmark support crate for percolate.
//!
//! Provides parameter types and workload generators used by the Criterion
//! benchmarks for graph evolution under each model and for raw cluster
//! merging.

pub mod error;
pub mod params;
pub mod workload;
