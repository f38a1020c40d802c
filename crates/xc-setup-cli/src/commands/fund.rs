use std::path::Path;

use anyhow::Result;

use xc_setup_core::config::NetworkConfig;
use xc_setup_core::network::SolanaNetwork;
use xc_setup_core::workflow::fund;

use crate::output::ConsoleProgress;

/// Fund the project in `dir`: airdrop SOL to both wallets, create a test
/// token mint, and mint tokens to the payer.
pub async fn run(dir: &Path, rpc_url: Option<&str>, retries: u32) -> Result<()> {
    run_with(dir, rpc_url, retries, super::rpc_network).await
}

pub(crate) async fn run_with<N: SolanaNetwork>(
    dir: &Path,
    rpc_url: Option<&str>,
    retries: u32,
    connect: impl FnOnce(&NetworkConfig) -> N,
) -> Result<()> {
    let (project, config, network) = super::open_then_connect(dir, rpc_url, retries, connect)?;

    {
        let progress = ConsoleProgress::new();
        fund::run(&project, &network, &config.retry, &progress).await?;
    }

    println!();
    println!("  Next step:");
    println!("    xc-setup test");
    println!();

    Ok(())
}
