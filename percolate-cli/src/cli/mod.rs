//! Command-line interface for evolving a single graph.
//!
//! The `run` command builds a network or periodic lattice, applies one
//! evolution model for a number of steps and prints the resulting observables.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, ModelArg, RunCommand, TopologyArg, render_summary,
    run_cli,
};

#[cfg(test)]
mod test_helpers;
