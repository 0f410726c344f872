//! Command implementations and argument parsing for the percolate CLI.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use percolate_core::{
    ClusterId, DEFAULT_BOUND, DEFAULT_MIN_ACCEPTANCE, DEFAULT_SEED, EvolutionModel, Graph,
    GraphBuilder, PercolationError, Topology, Transition,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

const DEFAULT_LARGEST: usize = 5;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "percolate",
    about = "Evolve clusters on random networks and periodic lattices."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Evolve one graph and report its observables.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Topology to evolve on.
    #[arg(value_enum)]
    pub topology: TopologyArg,

    /// Node count for networks, side length for lattices.
    pub size: usize,

    /// Number of edges to commit.
    pub steps: usize,

    /// Edge-addition rule.
    #[arg(value_enum)]
    pub model: ModelArg,

    /// Cluster-size bound for Bohman-Frieze.
    #[arg(long, default_value_t = DEFAULT_BOUND)]
    pub bound: usize,

    /// Minimum acceptance probability for stochastic edge acceptance.
    #[arg(long = "min-acceptance", default_value_t = DEFAULT_MIN_ACCEPTANCE)]
    pub min_acceptance: f64,

    /// Seed for the graph's random number generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of largest clusters to list.
    #[arg(long, default_value_t = DEFAULT_LARGEST)]
    pub largest: usize,
}

/// Supported topologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopologyArg {
    /// Unstructured network; any two nodes may connect.
    Network,
    /// Periodic square lattice.
    #[value(name = "lattice2d")]
    Lattice2d,
    /// Periodic cubic lattice.
    #[value(name = "lattice3d")]
    Lattice3d,
}

/// Supported evolution models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelArg {
    /// Accept every sampled edge.
    ErdosRenyi,
    /// Bounded-size Achlioptas rule.
    BohmanFrieze,
    /// Accept the candidate with the smaller size product.
    ProductRule,
    /// Soft product rule with a minimum acceptance probability.
    StochasticEdgeAcceptance,
}

impl RunCommand {
    fn evolution_model(&self) -> EvolutionModel {
        match self.model {
            ModelArg::ErdosRenyi => EvolutionModel::ErdosRenyi,
            ModelArg::BohmanFrieze => EvolutionModel::BohmanFrieze { bound: self.bound },
            ModelArg::ProductRule => EvolutionModel::ProductRule,
            ModelArg::StochasticEdgeAcceptance => EvolutionModel::StochasticEdgeAcceptance {
                min_acceptance: self.min_acceptance,
            },
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Graph construction or evolution failed.
    #[error(transparent)]
    Core(#[from] PercolationError),
}

/// Summarises the outcome of a `run` command.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionSummary {
    /// Topology name.
    pub topology: &'static str,
    /// Model name.
    pub model: &'static str,
    /// Seed the graph was created with.
    pub seed: u64,
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges the topology allows.
    pub edge_count: usize,
    /// Steps requested on the command line.
    pub requested_steps: usize,
    /// Steps actually committed; lower than requested when the graph ran out
    /// of mergeable edges.
    pub step_count: usize,
    /// Number of clusters after evolution.
    pub cluster_count: usize,
    /// Largest clusters as `(id, size)`.
    pub largest_clusters: Vec<(ClusterId, usize)>,
    /// Threshold-crossing estimate, if defined.
    pub delta_method_1: Option<Transition>,
    /// Extremum estimate, if defined.
    pub delta_method_2: Option<Transition>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the arguments are out of range.
///
/// # Examples
/// ```
/// use percolate_cli::cli::{Cli, Command, ModelArg, RunCommand, TopologyArg, run_cli};
///
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         topology: TopologyArg::Network,
///         size: 32,
///         steps: 31,
///         model: ModelArg::ProductRule,
///         bound: 2,
///         min_acceptance: 0.5,
///         seed: 8,
///         largest: 3,
///     }),
/// };
/// let summary = run_cli(cli).expect("arguments are valid");
/// assert_eq!(summary.step_count, 31);
/// assert_eq!(summary.cluster_count, 1);
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(&run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(topology = field::Empty, model = field::Empty, size = command.size),
)]
pub(super) fn run_command(command: &RunCommand) -> Result<ExecutionSummary, CliError> {
    let model = command.evolution_model();
    let builder = GraphBuilder::new()
        .with_seed(command.seed)
        .with_model(model);

    let span = Span::current();
    span.record("model", field::display(model.name()));

    let summary = match command.topology {
        TopologyArg::Network => execute(&builder, builder.network(command.size)?, command)?,
        TopologyArg::Lattice2d => execute(&builder, builder.lattice_2d(command.size)?, command)?,
        TopologyArg::Lattice3d => execute(&builder, builder.lattice_3d(command.size)?, command)?,
    };
    span.record("topology", field::display(summary.topology));

    info!(
        steps = summary.step_count,
        clusters = summary.cluster_count,
        "command completed"
    );
    Ok(summary)
}

fn execute<T: Topology>(
    builder: &GraphBuilder,
    mut graph: Graph<T>,
    command: &RunCommand,
) -> Result<ExecutionSummary, CliError> {
    match builder.evolve(&mut graph, command.steps) {
        Ok(()) | Err(PercolationError::Exhausted { .. }) => {}
        Err(err) => return Err(err.into()),
    }
    match graph.finalize_observables() {
        Ok(_) => {}
        Err(err @ PercolationError::UndefinedTransition { .. }) => {
            warn!(error = %err, "transition width is undefined for this run");
        }
        Err(err) => return Err(err.into()),
    }

    let observables = graph.observables();
    Ok(ExecutionSummary {
        topology: graph.topology().name(),
        model: builder.model().name(),
        seed: graph.seed(),
        node_count: graph.node_count(),
        edge_count: graph.topology().edge_count(),
        requested_steps: command.steps,
        step_count: graph.step_count(),
        cluster_count: graph.tracker().cluster_count(),
        largest_clusters: graph.largest_clusters(command.largest),
        delta_method_1: observables.delta_method_1(),
        delta_method_2: observables.delta_method_2(),
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::io::Cursor;
/// # use percolate_cli::cli::{ExecutionSummary, render_summary};
/// # use percolate_core::ClusterId;
/// let summary = ExecutionSummary {
///     topology: "network",
///     model: "erdos_renyi",
///     seed: 8,
///     node_count: 2,
///     edge_count: 1,
///     requested_steps: 1,
///     step_count: 1,
///     cluster_count: 1,
///     largest_clusters: vec![(ClusterId::new(0), 2)],
///     delta_method_1: None,
///     delta_method_2: None,
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner()).expect("utf-8 output");
/// assert!(text.starts_with("topology: network (2 nodes, 1 edges)\n"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(
        writer,
        "topology: {} ({} nodes, {} edges)",
        summary.topology, summary.node_count, summary.edge_count
    )?;
    writeln!(writer, "model: {} (seed {})", summary.model, summary.seed)?;
    if summary.step_count < summary.requested_steps {
        writeln!(
            writer,
            "steps: {} of {} (no mergeable edge remained)",
            summary.step_count, summary.requested_steps
        )?;
    } else {
        writeln!(writer, "steps: {}", summary.step_count)?;
    }
    writeln!(writer, "clusters: {}", summary.cluster_count)?;
    write_transition(&mut writer, "delta method 1", summary.delta_method_1)?;
    write_transition(&mut writer, "delta method 2", summary.delta_method_2)?;
    writeln!(writer, "largest clusters:")?;
    for (id, size) in &summary.largest_clusters {
        writeln!(writer, "{id}\t{size}")?;
    }
    Ok(())
}

fn write_transition(
    writer: &mut impl Write,
    label: &str,
    transition: Option<Transition>,
) -> io::Result<()> {
    match transition {
        Some(transition) => writeln!(
            writer,
            "{label}: {} (t0 = {}, t1 = {})",
            transition.delta(),
            transition.t0(),
            transition.t1()
        ),
        None => writeln!(writer, "{label}: undefined"),
    }
}
