//! `xc-setup fund`: airdrop SOL to both wallets and mint a test token.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Signature, Signer};

use crate::env_file::{self, TEST_TOKEN_MINT};
use crate::error::Result;
use crate::network::SolanaNetwork;
use crate::progress::Progress;
use crate::project::Project;
use crate::retry::RetryPolicy;

use super::{format_sol, test_token_base_units, AIRDROP_LAMPORTS, TEST_TOKEN_DECIMALS, TEST_TOKEN_SUPPLY};

const STEPS: u32 = 5;

/// Signatures and addresses produced by a funding run.
#[derive(Debug, Clone)]
pub struct FundReport {
    pub payer_airdrop: Signature,
    pub facilitator_airdrop: Signature,
    pub mint: Pubkey,
    pub payer_token_account: Pubkey,
    pub mint_to: Signature,
}

/// Fund the project's wallets and record the new mint in `.env`.
///
/// Airdrop requests are retried according to `retry`; their confirmation is
/// awaited once, so a failed wait never triggers a second faucet request.
/// Transactions that move funds or create accounts are sent once.
pub async fn run(
    project: &Project,
    network: &dyn SolanaNetwork,
    retry: &RetryPolicy,
    progress: &dyn Progress,
) -> Result<FundReport> {
    progress.header("xc-setup fund");
    progress.key_value("RPC", network.endpoint());

    let payer = project.payer.pubkey();
    let facilitator = project.facilitator.pubkey();
    let sol = format_sol(AIRDROP_LAMPORTS);

    progress.step(1, STEPS, &format!("Airdropping {sol} SOL to payer"));
    let payer_airdrop = retry
        .run("airdrop to payer", || network.request_airdrop(&payer, AIRDROP_LAMPORTS))
        .await?;
    network.confirm(&payer_airdrop).await?;
    progress.success(&format!("Payer funded: {payer}"));
    progress.key_value("Tx", &payer_airdrop.to_string());

    progress.step(2, STEPS, &format!("Airdropping {sol} SOL to facilitator"));
    let facilitator_airdrop = retry
        .run("airdrop to facilitator", || {
            network.request_airdrop(&facilitator, AIRDROP_LAMPORTS)
        })
        .await?;
    network.confirm(&facilitator_airdrop).await?;
    progress.success(&format!("Facilitator funded: {facilitator}"));
    progress.key_value("Tx", &facilitator_airdrop.to_string());

    progress.step(3, STEPS, "Creating test token mint");
    let mint = network
        .create_mint(&project.payer, &payer, TEST_TOKEN_DECIMALS)
        .await?;
    progress.success(&format!("Test token mint created: {mint}"));

    progress.step(
        4,
        STEPS,
        &format!("Minting {TEST_TOKEN_SUPPLY} test tokens to payer"),
    );
    let payer_token_account = network
        .get_or_create_associated_token_account(&project.payer, &mint, &payer)
        .await?;
    let mint_to = network
        .mint_to(&project.payer, &mint, &payer_token_account, test_token_base_units())
        .await?;
    progress.success("Test tokens minted to payer");
    progress.key_value("Token account", &payer_token_account.to_string());

    progress.step(5, STEPS, "Recording mint in .env");
    env_file::append(&project.env_path, TEST_TOKEN_MINT, &mint.to_string())?;
    tracing::info!("funded {payer} and {facilitator}; mint {mint}");

    progress.success("All wallets funded");
    progress.key_value("Test token mint", &mint.to_string());

    Ok(FundReport {
        payer_airdrop,
        facilitator_airdrop,
        mint,
        payer_token_account,
        mint_to,
    })
}
