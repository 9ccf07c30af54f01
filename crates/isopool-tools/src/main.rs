// isopool CLI
// Deployment tasks for isolated lending pools

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(name = "isopool", about = "Deployment tasks for isolated lending pools", version)]
struct Cli {
    /// Named network to run against
    #[arg(long, global = true, default_value = "localhost")]
    network: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Market tasks
    #[command(subcommand)]
    Market(MarketCommand),
    /// Pool tasks
    #[command(subcommand)]
    Pool(PoolCommand),
}

#[derive(Subcommand, Debug)]
enum MarketCommand {
    /// Create a market in an existing pool
    Create {
        /// Whole asset config as one comma-separated string
        /// (pool,creator,delegate,underlying,irm,rate,cf,rf,fee,bypass,plugin,distributor,reward)
        #[arg(long)]
        asset_config: String,
    },
}

#[derive(Subcommand, Debug)]
enum PoolCommand {
    /// Deploy a new isolated pool
    Create(commands::PoolCreateArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let network = config::network(&cli.network)?;
    match cli.command {
        Command::Market(MarketCommand::Create { asset_config }) => {
            commands::market_create(&asset_config, &network).await
        }
        Command::Pool(PoolCommand::Create(args)) => commands::pool_create(args, &network).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(error) = run(cli).await {
        eprintln!("{} {error:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}
