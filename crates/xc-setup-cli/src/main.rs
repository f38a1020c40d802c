//! xc-setup CLI: zero-friction x402 project setup on Solana.
//!
//! Three commands take a developer from nothing to a verified payment:
//! `init` scaffolds a project with fresh key-pairs, `fund` airdrops SOL and
//! mints a test token, and `test` sends a small payment between the wallets.

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use xc_setup_core::config::Cluster;
use xc_setup_core::workflow::DEFAULT_PROJECT_NAME;

#[derive(Parser)]
#[command(
    name = "xc-setup",
    about = "Set up an x402 payment project on Solana: init, fund, test",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory for `fund` and `test`; parent directory for `init`
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    /// JSON-RPC endpoint (overrides the project's NETWORK)
    #[arg(long, global = true, env = "SOLANA_RPC_URL")]
    rpc_url: Option<String>,

    /// Attempts for airdrops and balance reads
    #[arg(long, global = true, env = "XC_SETUP_RETRIES", default_value_t = 3)]
    retries: u32,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new x402 project with payer and facilitator key-pairs
    Init {
        /// Project name (creates a directory with this name)
        #[arg(default_value = DEFAULT_PROJECT_NAME)]
        name: String,

        /// Cluster recorded in the project's .env
        #[arg(long, value_enum, default_value = "devnet")]
        network: NetworkChoice,
    },

    /// Airdrop SOL to both wallets and mint a test token to the payer
    Fund,

    /// Send a test payment from payer to facilitator
    Test,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum NetworkChoice {
    Devnet,
    Testnet,
    Localnet,
}

impl From<NetworkChoice> for Cluster {
    fn from(choice: NetworkChoice) -> Self {
        match choice {
            NetworkChoice::Devnet => Cluster::Devnet,
            NetworkChoice::Testnet => Cluster::Testnet,
            NetworkChoice::Localnet => Cluster::Localnet,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    if let Err(err) = run(cli).await {
        output::print_error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let rpc_url = cli.rpc_url.as_deref();
    match cli.command {
        Commands::Init { name, network } => {
            commands::init::run(&cli.dir, &name, network.into(), rpc_url).await?;
        }
        Commands::Fund => {
            commands::fund::run(&cli.dir, rpc_url, cli.retries).await?;
        }
        Commands::Test => {
            commands::test::run(&cli.dir, rpc_url, cli.retries).await?;
        }
    }
    Ok(())
}
