use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use commands::{charts, clusters, experiments, pool, predict, settings};
use context::AppContext;

#[derive(Parser)]
#[command(name = "aptaview")]
#[command(about = "Aptaview - SELEX experiment data explorer", long_about = None)]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, inspect, create and delete experiments
    Experiments {
        #[command(subcommand)]
        action: experiments::ExperimentsAction,
    },
    /// Query the derived aptamer pool table of an experiment
    Pool(pool::PoolArgs),
    /// Cluster analyses and the aptamer family table
    Clusters {
        #[command(subcommand)]
        action: clusters::ClustersAction,
    },
    /// Print chart specifications as JSON
    Chart {
        #[command(subcommand)]
        action: charts::ChartAction,
    },
    /// Secondary structure predictions for a single sequence
    Predict {
        #[command(subcommand)]
        action: predict::PredictAction,
    },
    /// Local settings: backend URL and theme
    Settings {
        #[command(subcommand)]
        action: settings::SettingsAction,
    },
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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = AppContext::init()?;

    match cli.command {
        Commands::Experiments { action } => experiments::run(&ctx, action).await,
        Commands::Pool(args) => pool::run(&ctx, args).await,
        Commands::Clusters { action } => clusters::run(&ctx, action).await,
        Commands::Chart { action } => charts::run(&ctx, action).await,
        Commands::Predict { action } => predict::run(&ctx, action).await,
        Commands::Settings { action } => settings::run(&ctx, action).await,
    }
}
