use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use sensornet_core::{dimacs, units::MicroJoules, Network, NetworkParams};
use solver_impls::MinilpSolver;

#[derive(Debug, clap::Parser)]
#[clap(about = "Generate and analyze sensor networks with overflow storage")]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Generate a connected network and save it
    Generate(GenerateArgs),
    /// Load a network and report on it
    Analyze(AnalyzeArgs),
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// Read the parameters from a JSON file instead of the flags below
    #[clap(long)]
    params: Option<PathBuf>,
    /// Field width, in meters
    #[clap(long, default_value_t = 50.0)]
    width: f64,
    /// Field length, in meters
    #[clap(long, default_value_t = 50.0)]
    length: f64,
    /// Number of nodes
    #[clap(long, default_value_t = 10)]
    nodes: usize,
    /// Transmission range, in meters
    #[clap(long, default_value_t = 25.0)]
    range: f64,
    /// Number of data nodes
    #[clap(long, default_value_t = 3)]
    data_nodes: usize,
    /// Overflow packets per data node
    #[clap(long, default_value_t = 5)]
    packets: u64,
    /// Storage capacity per storage node, in packets
    #[clap(long, default_value_t = 5)]
    capacity: u64,
    /// Battery capacity per node, in micro-joules
    #[clap(long, default_value_t = 100_000)]
    battery: u64,
    /// Seed for node placement
    #[clap(long, default_value_t = 0)]
    seed: u64,
    /// Give up after this many disconnected networks (default: 1000 per node)
    #[clap(long)]
    max_attempts: Option<usize>,
    /// Where to save the network (.sn or .json)
    #[clap(long, short, default_value = "network.sn")]
    output: PathBuf,
    /// Also export the network as a DIMACS min-cost flow problem
    #[clap(long)]
    dimacs: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct AnalyzeArgs {
    /// A network file (.sn or .json)
    network: PathBuf,
    /// Override the overflow packets per data node
    #[clap(long)]
    packets: Option<u64>,
    /// Override the storage capacity per storage node
    #[clap(long)]
    capacity: Option<u64>,
    /// Override the battery capacity per node, in micro-joules
    #[clap(long)]
    battery: Option<u64>,
    /// Print the min-cost path between two named nodes
    #[clap(long, num_args = 2, value_names = ["FROM", "TO"])]
    path: Option<Vec<String>>,
    /// Solve the max-flow feasibility program
    #[clap(long)]
    max_flow: bool,
    /// Solve the min-cost flow program
    #[clap(long)]
    min_cost: bool,
    /// Export the network as a DIMACS min-cost flow problem
    #[clap(long)]
    dimacs: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match args.command {
        Command::Generate(args) => generate(args),
        Command::Analyze(args) => analyze(args),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let params = match &args.params {
        Some(path) => sensornet_utils::read_params(path)
            .with_context(|| format!("failed to read parameters from {}", path.display()))?,
        None => NetworkParams::builder()
            .width(args.width)
            .length(args.length)
            .nr_nodes(args.nodes)
            .transmission_range(args.range)
            .nr_data_nodes(args.data_nodes)
            .packets_per_node(args.packets)
            .storage_capacity(args.capacity)
            .battery_capacity(MicroJoules::new(args.battery))
            .build(),
    };
    let max_attempts = args
        .max_attempts
        .unwrap_or_else(|| params.default_max_attempts());
    log::info!(
        "Placing {} nodes ({} data) with seed {}",
        params.nr_nodes,
        params.nr_data_nodes,
        args.seed
    );
    let rng = StdRng::seed_from_u64(args.seed);
    let network = Network::generate_connected(params, rng, max_attempts)
        .context("failed to generate a network")?;
    sensornet_utils::write_network(&network, &args.output)
        .with_context(|| format!("failed to save network to {}", args.output.display()))?;
    if let Some(path) = &args.dimacs {
        dimacs::save(&network, path)
            .with_context(|| format!("failed to save DIMACS export to {}", path.display()))?;
    }
    Ok(())
}

fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let mut network = sensornet_utils::read_network(&args.network)
        .with_context(|| format!("failed to read network from {}", args.network.display()))?;
    if let Some(packets) = args.packets {
        network.set_overflow_packets(packets);
    }
    if let Some(capacity) = args.capacity {
        network.set_storage_capacity(capacity);
    }
    if let Some(battery) = args.battery {
        network.set_battery_capacity(MicroJoules::new(battery));
    }

    for node in network.nodes() {
        println!("{node}");
    }
    println!("Links: {}", network.nr_edges());
    println!("Connected: {}", network.is_connected());
    println!(
        "Enough storage: {} ({} packets, {} slots)",
        network.is_feasible(),
        network.total_supply(),
        network.total_storage()
    );

    if let Some([from, to]) = args.path.as_deref() {
        let find = |name: &str| {
            network
                .node_by_name(name)
                .map(|n| n.id())
                .with_context(|| format!("no node named {name}"))
        };
        let path = network.min_cost_path(find(from)?, find(to)?);
        if path.is_empty() {
            println!("No path from {from} to {to}");
        } else {
            let names = path
                .iter()
                .filter_map(|&id| network.node(id).map(|n| n.name()))
                .collect::<Vec<_>>();
            println!("Min-cost path: {}", names.join(" -> "));
            println!("Cost of path: {}", network.cost_of_path(&path));
        }
    }

    let solver = MinilpSolver::default();
    if args.max_flow {
        let feasible = network
            .is_max_flow_feasible(&solver)
            .context("max-flow feasibility failed")?;
        println!("Max-flow feasible: {feasible}");
    }
    if args.min_cost {
        let cost = network
            .min_cost_flow(&solver)
            .context("min-cost flow failed")?;
        println!("Min-cost flow: {cost}");
    }
    if let Some(path) = &args.dimacs {
        dimacs::save(&network, path)
            .with_context(|| format!("failed to save DIMACS export to {}", path.display()))?;
    }
    Ok(())
}
