//! Small helpers shared across CLI tests.

use super::commands::run_command;
use super::{Cli, CliError, Command, ModelArg, RunCommand, TopologyArg, run_cli};

/// Builds a `run` command with default options.
pub(super) fn run_args(
    topology: TopologyArg,
    size: usize,
    steps: usize,
    model: ModelArg,
) -> RunCommand {
    RunCommand {
        topology,
        size,
        steps,
        model,
        bound: percolate_core::DEFAULT_BOUND,
        min_acceptance: percolate_core::DEFAULT_MIN_ACCEPTANCE,
        seed: percolate_core::DEFAULT_SEED,
        largest: 3,
    }
}

pub(super) fn wrap(command: RunCommand) -> Cli {
    Cli {
        command: Command::Run(command),
    }
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn run_command_expecting_error(cmd: &RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
