//! Property-based tests for graph evolution.
//!
//! Evolves random topologies under every model and checks the structural
//! invariants of the cluster tracker and observables after each chunk of
//! steps, plus determinism and chunking equivalence for a fixed seed.

mod invariants;
mod strategies;
#[cfg(test)]
mod tests;
mod types;
