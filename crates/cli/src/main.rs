use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod command;
mod data;
mod eval;
mod report;

#[derive(Parser)]
#[command(name = "convo")]
#[command(about = "Causal analysis for customer-service call transcripts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus file (JSON). When absent, data/sample_conversations.json and
    /// sample_conversations.json are tried before the built-in sample
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout stays machine-readable)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one query: retrieve relevant transcripts and explain the cause
    Query(QueryArgs),

    /// Interactive query loop ('quit', 'list', 'help')
    Repl,

    /// List loaded transcripts (id, domain, outcome, reason)
    List,

    /// Show the pattern-library view of one transcript
    Inspect(InspectArgs),

    /// Score retrieval and analysis against a labeled query dataset
    Eval(EvalArgs),

    /// Write the built-in sample corpus to a file
    Sample(SampleArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// The natural-language question to answer
    text: String,

    /// How many transcripts to retrieve
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Print the explanation as JSON instead of a text report
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct InspectArgs {
    /// Transcript id to inspect
    transcript_id: String,
}

#[derive(Args)]
struct EvalArgs {
    /// Query dataset file ({"queries": [...]})
    #[arg(long)]
    dataset: PathBuf,

    /// Write the full report as pretty JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,

    /// How many transcripts to retrieve per query
    #[arg(long, default_value_t = 1)]
    top_k: usize,

    /// Print the report as JSON instead of a summary table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SampleArgs {
    /// Destination path for the sample corpus
    #[arg(long)]
    output: PathBuf,
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let data = cli.data.as_deref();
    match cli.command {
        Commands::Query(args) => command::query::run(data, &args.text, args.top_k, args.json),
        Commands::Repl => command::repl::run(data),
        Commands::List => command::list::run(data),
        Commands::Inspect(args) => command::inspect::run(data, &args.transcript_id),
        Commands::Eval(args) => command::eval::run(
            data,
            &args.dataset,
            args.output.as_deref(),
            args.top_k,
            args.json,
        ),
        Commands::Sample(args) => command::sample::run(&args.output),
    }
}
