use std::path::Path;

use anyhow::Result;

use xc_setup_core::config::Cluster;
use xc_setup_core::deploy::PlaceholderDeployer;
use xc_setup_core::workflow::init::{self, InitOptions};

use crate::output::ConsoleProgress;

/// Initialize a new x402 project in `<parent>/<name>`.
///
/// Generates payer and facilitator key-pairs, renders the starter project,
/// records a facilitator program id, and writes the project's `.env`. Nothing
/// is sent to the network.
pub async fn run(parent: &Path, name: &str, cluster: Cluster, rpc_url: Option<&str>) -> Result<()> {
    let options = InitOptions {
        name: name.to_string(),
        cluster,
        rpc_url: rpc_url.map(str::to_string),
    };

    let report = {
        let progress = ConsoleProgress::new();
        init::run(parent, &options, &PlaceholderDeployer::new(), &progress).await?
    };

    println!();
    println!("  Next steps:");
    println!("    cd {}", report.project_dir.display());
    println!("    xc-setup fund");
    println!("    xc-setup test");
    println!();

    Ok(())
}
