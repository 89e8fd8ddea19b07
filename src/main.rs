use clap::{Args, Parser, Subcommand, ValueEnum};
use phylo_shapley::{
    IndexSession, NodeIndex, NodeValue, PhyloNetwork, Result, SetIndex, WeightTable,
    parse_enewick, report::node_values,
};
use std::io::{self, Read, Write};
use std::process::ExitCode;
use tabled::{Table, settings::Style};
use tracing_subscriber::EnvFilter;

const COPH_USAGE_EXAMPLE: &str = "\
Usage example:

  # Computing the cophenetic value of {3,4}
  $ phylo-shapley cophenetic-value '((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;' -w - 3 4 <<EOF
      H,4,0.5
      a,c,0.3
      b,d,0.4
      r,a,0.1
      r,b,0.2
  EOF
  0.4
";

const RPSD_USAGE_EXAMPLE: &str = "\
Usage example:

  # Computing the rooted phylogenetic diversity of {3,4}
  $ phylo-shapley rpsd '((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;' -w - 3 4 <<EOF
      H,4,0.5
      a,c,0.3
      b,d,0.4
      r,a,0.1
      r,b,0.2
  EOF
  1.5000000000000002
";

const UPSD_USAGE_EXAMPLE: &str = "\
Usage example:

  # Computing the unrooted phylogenetic diversity of {3,4}
  $ phylo-shapley upsd '((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;' -w - 3 4 <<EOF
      H,4,0.5
      a,c,0.3
      b,d,0.4
      r,a,0.1
      r,b,0.2
  EOF
  1.1
";

const FP_USAGE_EXAMPLE: &str = "\
Usage example:

  # Computing the fair proportion of all the leaves
  $ phylo-shapley fair-proportion '((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;' -w - 1 2 3 4 5 <<EOF
      H,4,0.5
      a,c,0.3
      b,d,0.4
      r,a,0.1
      r,b,0.2
  EOF
  1\t0.03333333333333333
  2\t0.06666666666666667
  3\t0.18333333333333332
  4\t0.95
  5\t0.26666666666666666
";

const CSV_USAGE_EXAMPLE: &str = "\
Usage example:

  # Computing the cophenetic Shapley value of all the leaves
  $ phylo-shapley cophenetic-shapley-value '((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;' -w weights.csv 1 2 3 4 5
  1\t-0.15833333333333321
  2\t-0.10833333333333323
  3\t-0.05833333333333324
  4\t0.30000000000000004
  5\t0.025000000000000078
";

const USV_USAGE_EXAMPLE: &str = "\
Usage example:

  # Computing the unrooted Shapley value of all the leaves
  $ phylo-shapley unrooted-shapley-value '((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;' -w weights.csv 1 2 3 4 5
  1\t0.19166666666666654
  2\t0.17499999999999988
  3\t0.24166666666666656
  4\t0.6499999999999999
  5\t0.24166666666666659
";

#[derive(Parser, Debug)]
#[command(
    name = "phylo-shapley",
    version,
    about = "Compute phylogenetic network indices"
)]
struct Cli {
    /// Log more to stderr (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the cophenetic value of a subnet
    #[command(after_help = COPH_USAGE_EXAMPLE)]
    CopheneticValue(SetArgs),

    /// Compute the (rooted) phylogenetic subnet diversity
    #[command(after_help = RPSD_USAGE_EXAMPLE)]
    Rpsd(SetArgs),

    /// Compute the unrooted phylogenetic subnet diversity
    #[command(after_help = UPSD_USAGE_EXAMPLE)]
    Upsd(SetArgs),

    /// Compute the fair proportion of nodes
    #[command(after_help = FP_USAGE_EXAMPLE)]
    FairProportion(NodeArgs),

    /// Compute the cophenetic Shapley value of nodes
    #[command(after_help = CSV_USAGE_EXAMPLE)]
    CopheneticShapleyValue(NodeArgs),

    /// Compute the unrooted Shapley value of nodes
    #[command(after_help = USV_USAGE_EXAMPLE)]
    UnrootedShapleyValue(NodeArgs),
}

#[derive(Args, Debug)]
struct NetworkArgs {
    /// Phylogenetic network in eNewick format; branch lengths are used as weights
    network: String,

    /// Edge weights file in CSV format with three columns and no header:
    /// node1, node2, weight. Use '-' to read from stdin. When given, it
    /// replaces the branch lengths and unlisted edges weigh 0.
    #[arg(short, long, value_name = "FILE")]
    weights: Option<String>,
}

#[derive(Args, Debug)]
struct SetArgs {
    #[command(flatten)]
    input: NetworkArgs,

    /// Bottom nodes in the subnet
    nodes: Vec<String>,
}

#[derive(Args, Debug)]
struct NodeArgs {
    #[command(flatten)]
    input: NetworkArgs,

    /// Target nodes
    #[arg(required = true)]
    nodes: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// One `name<TAB>value` line per node
    Plain,
    Json,
    Table,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli.command, io::stdin().lock(), &mut io::stdout().lock());
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run<R: Read>(command: Commands, stdin: R, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::CopheneticValue(args) => {
            run_set_index(SetIndex::CopheneticValue, args, stdin, out)
        }
        Commands::Rpsd(args) => run_set_index(SetIndex::RootedDiversity, args, stdin, out),
        Commands::Upsd(args) => run_set_index(SetIndex::UnrootedDiversity, args, stdin, out),
        Commands::FairProportion(args) => {
            run_node_index(NodeIndex::FairProportion, args, stdin, out)
        }
        Commands::CopheneticShapleyValue(args) => {
            run_node_index(NodeIndex::CopheneticShapley, args, stdin, out)
        }
        Commands::UnrootedShapleyValue(args) => {
            run_node_index(NodeIndex::UnrootedShapley, args, stdin, out)
        }
    }
}

/// Parse the network and apply the weight table, if one was given
fn load_network<R: Read>(args: &NetworkArgs, stdin: R) -> Result<PhyloNetwork> {
    let mut network = parse_enewick(&args.network)?;

    if let Some(source) = &args.weights {
        let table = if source == "-" {
            WeightTable::from_reader(stdin)?
        } else {
            WeightTable::from_path(source)?
        };
        let matched = network.assign_weights(&table);
        tracing::info!(
            source = %source,
            entries = table.len(),
            matched,
            "loaded weight table"
        );
    }

    Ok(network)
}

fn run_set_index<R: Read>(
    index: SetIndex,
    args: SetArgs,
    stdin: R,
    out: &mut impl Write,
) -> Result<()> {
    let network = load_network(&args.input, stdin)?;
    let targets = network.nodes_by_taxa(&args.nodes)?;
    let session = IndexSession::new(&network);

    tracing::info!(?index, targets = targets.len(), "computing set index");
    writeln!(out, "{}", session.set_index(index, &targets))?;
    Ok(())
}

fn run_node_index<R: Read>(
    index: NodeIndex,
    args: NodeArgs,
    stdin: R,
    out: &mut impl Write,
) -> Result<()> {
    let network = load_network(&args.input, stdin)?;
    let targets = network.nodes_by_taxa(&args.nodes)?;
    let session = IndexSession::new(&network);

    tracing::info!(?index, targets = targets.len(), "computing node index");
    let values = session.node_indices(index, &targets)?;
    write_node_values(&node_values(&args.nodes, values), args.format, out)
}

fn write_node_values(
    rows: &[NodeValue],
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    match format {
        OutputFormat::Plain => {
            for row in rows {
                writeln!(out, "{row}")?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(rows).map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Table => {
            let mut table = Table::new(rows);
            table.with(Style::psql());
            writeln!(out, "{table}")?;
        }
    }
    Ok(())
}
