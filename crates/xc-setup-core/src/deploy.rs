//! Facilitator program deployment.
//!
//! Only a placeholder deployer exists today: it reports whether the `solana`
//! CLI is installed and returns the facilitator's public key as the program
//! id. Real deployers plug in through the [`Deployer`] trait without changes
//! to the `init` workflow.

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::error::Result;
use crate::version::{detect_version, Version};

/// Information about a missing external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTool {
    pub tool_name: String,
    pub install_instructions: String,
}

/// Outcome of a deployment.
#[derive(Debug, Clone)]
pub struct Deployment {
    /// Identifier written to `FACILITATOR_PROGRAM_ID`.
    pub program_id: Pubkey,
    /// `true` when no program was actually deployed.
    pub placeholder: bool,
    /// Version of the deploy toolchain, when one was found.
    pub toolchain: Option<Version>,
    /// The toolchain that would be needed for a real deployment, if absent.
    pub missing: Option<MissingTool>,
}

/// Every deployment strategy implements this trait.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Deploy the facilitator program owned by `facilitator`.
    async fn deploy(&self, facilitator: &Keypair) -> Result<Deployment>;
}

/// Stand-in deployer that never touches the network.
pub struct PlaceholderDeployer {
    binary: String,
}

impl Default for PlaceholderDeployer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceholderDeployer {
    pub const INSTALL_URL: &'static str =
        "https://docs.solana.com/cli/install-solana-cli-tools";

    pub fn new() -> Self {
        Self {
            binary: "solana".into(),
        }
    }

    /// Look for a different CLI binary name.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl Deployer for PlaceholderDeployer {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    async fn deploy(&self, facilitator: &Keypair) -> Result<Deployment> {
        let program_id = facilitator.pubkey();

        if which::which(&self.binary).is_err() {
            tracing::warn!("{} not found, using placeholder program id", self.binary);
            return Ok(Deployment {
                program_id,
                placeholder: true,
                toolchain: None,
                missing: Some(MissingTool {
                    tool_name: self.binary.clone(),
                    install_instructions: Self::INSTALL_URL.into(),
                }),
            });
        }

        let toolchain = detect_version(&self.binary);
        tracing::info!(
            "{} {} found; program deployment not implemented, using placeholder program id",
            self.binary,
            toolchain.map(|v| v.to_string()).unwrap_or_else(|| "(unknown version)".into())
        );
        Ok(Deployment {
            program_id,
            placeholder: true,
            toolchain,
            missing: None,
        })
    }
}
