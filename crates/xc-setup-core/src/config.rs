//! Cluster selection and network settings.
//!
//! The RPC endpoint is resolved in this order: an explicit override (the
//! `SOLANA_RPC_URL` environment variable or `--rpc-url`), then the default URL
//! of the `NETWORK` recorded in the project's `.env`, then devnet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::env_file::{self, EnvFile};
use crate::retry::RetryPolicy;

/// A Solana cluster that offers a faucet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    /// A `solana-test-validator` on this machine.
    Localnet,
}

impl Cluster {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::Localnet => "localnet",
        }
    }

    /// Default JSON-RPC endpoint for this cluster.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Resolve a cluster by name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "devnet" => Some(Self::Devnet),
            "testnet" => Some(Self::Testnet),
            "localnet" | "localhost" => Some(Self::Localnet),
            _ => None,
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the workflows need to reach the cluster.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub cluster: Cluster,
    pub rpc_url: String,
    pub retry: RetryPolicy,
}

impl NetworkConfig {
    /// Build the settings for a project from its `.env` and an optional override.
    ///
    /// An unrecognized `NETWORK` value falls back to devnet with a warning.
    pub fn resolve(env: &EnvFile, rpc_override: Option<&str>, retry: RetryPolicy) -> Self {
        let cluster = match env.get(env_file::NETWORK) {
            Some(name) => Cluster::from_name(name).unwrap_or_else(|| {
                tracing::warn!("unknown NETWORK '{name}' in .env, using devnet");
                Cluster::Devnet
            }),
            None => Cluster::Devnet,
        };
        let rpc_url = rpc_override
            .filter(|url| !url.trim().is_empty())
            .map(|url| url.trim().to_string())
            .unwrap_or_else(|| cluster.default_rpc_url().to_string());
        Self {
            cluster,
            rpc_url,
            retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_valid_clusters() {
        assert_eq!(Cluster::from_name("devnet"), Some(Cluster::Devnet));
        assert_eq!(Cluster::from_name("testnet"), Some(Cluster::Testnet));
        assert_eq!(Cluster::from_name("localnet"), Some(Cluster::Localnet));
    }

    #[test]
    fn test_from_name_invalid() {
        assert!(Cluster::from_name("mainnet-beta").is_none());
        assert!(Cluster::from_name("").is_none());
    }

    #[test]
    fn test_resolve_defaults_to_devnet() {
        let config = NetworkConfig::resolve(&EnvFile::default(), None, RetryPolicy::none());
        assert_eq!(config.cluster, Cluster::Devnet);
        assert_eq!(config.rpc_url, "https://api.devnet.solana.com");
    }

    #[test]
    fn test_resolve_uses_project_network() {
        let env = EnvFile::parse("NETWORK=localnet\n");
        let config = NetworkConfig::resolve(&env, None, RetryPolicy::none());
        assert_eq!(config.cluster, Cluster::Localnet);
        assert_eq!(config.rpc_url, "http://127.0.0.1:8899");
    }

    #[test]
    fn test_resolve_override_wins() {
        let env = EnvFile::parse("NETWORK=testnet\n");
        let config = NetworkConfig::resolve(
            &env,
            Some("https://rpc.example.com"),
            RetryPolicy::none(),
        );
        assert_eq!(config.cluster, Cluster::Testnet);
        assert_eq!(config.rpc_url, "https://rpc.example.com");
    }

    #[test]
    fn test_resolve_blank_override_ignored() {
        let config = NetworkConfig::resolve(&EnvFile::default(), Some("  "), RetryPolicy::none());
        assert_eq!(config.rpc_url, Cluster::Devnet.default_rpc_url());
    }
}
