//! CLI command implementations for xc-setup.
//!
//! Each module corresponds to a subcommand (`xc-setup <command>`).

pub mod fund;
pub mod init;

use std::path::Path;

use anyhow::{Context, Result};

use xc_setup_core::config::NetworkConfig;
use xc_setup_core::network::RpcNetwork;
use xc_setup_core::project::Project;
use xc_setup_core::retry::RetryPolicy;

/// Open the project in `dir`, then build its network client with `connect`.
///
/// `connect` only runs once the project opened, so an uninitialized
/// directory fails without ever creating a client.
fn open_then_connect<N>(
    dir: &Path,
    rpc_override: Option<&str>,
    retries: u32,
    connect: impl FnOnce(&NetworkConfig) -> N,
) -> Result<(Project, NetworkConfig, N)> {
    let project = Project::open(dir)
        .with_context(|| format!("cannot open project in {}", dir.display()))?;
    let config = NetworkConfig::resolve(
        &project.env,
        rpc_override,
        RetryPolicy::with_attempts(retries),
    );
    tracing::info!("using {} at {}", config.cluster, config.rpc_url);
    let network = connect(&config);
    Ok((project, config, network))
}

fn rpc_network(config: &NetworkConfig) -> RpcNetwork {
    RpcNetwork::new(&config.rpc_url)
}
