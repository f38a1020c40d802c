//! `xc-setup test`: send one small payment from payer to facilitator.

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Signature, Signer};

use crate::env_file::TEST_TOKEN_MINT;
use crate::error::{Result, XcSetupError};
use crate::network::{associated_token_address, SolanaNetwork, TokenAmount};
use crate::progress::Progress;
use crate::project::Project;
use crate::retry::RetryPolicy;

use super::{format_sol, MIN_PAYER_BALANCE, TEST_PAYMENT_LAMPORTS};

const STEPS: u32 = 3;

/// Result of a successful test payment.
#[derive(Debug, Clone)]
pub struct TestReport {
    pub payer_balance: u64,
    pub facilitator_balance: u64,
    pub signature: Signature,
    /// Payer's test token balance, when a mint is configured and readable.
    pub token_balance: Option<TokenAmount>,
}

/// Check balances, pay [`TEST_PAYMENT_LAMPORTS`] to the facilitator, and
/// report the payer's test token balance if `TEST_TOKEN_MINT` is set.
///
/// A payer balance below [`MIN_PAYER_BALANCE`] fails with
/// [`XcSetupError::InsufficientFunds`] before any transaction is built.
pub async fn run(
    project: &Project,
    network: &dyn SolanaNetwork,
    retry: &RetryPolicy,
    progress: &dyn Progress,
) -> Result<TestReport> {
    progress.header("xc-setup test");
    progress.key_value("RPC", network.endpoint());

    let payer = project.payer.pubkey();
    let facilitator = project.facilitator.pubkey();

    progress.step(1, STEPS, "Checking wallet balances");
    let payer_balance = retry
        .run("payer balance", || network.balance(&payer))
        .await?;
    let facilitator_balance = retry
        .run("facilitator balance", || network.balance(&facilitator))
        .await?;
    progress.key_value("Payer balance", &format!("{} SOL", format_sol(payer_balance)));
    progress.key_value(
        "Facilitator balance",
        &format!("{} SOL", format_sol(facilitator_balance)),
    );

    if payer_balance < MIN_PAYER_BALANCE {
        return Err(XcSetupError::InsufficientFunds {
            balance: payer_balance,
            required: MIN_PAYER_BALANCE,
        });
    }

    progress.step(
        2,
        STEPS,
        &format!("Sending {} SOL test payment", format_sol(TEST_PAYMENT_LAMPORTS)),
    );
    let signature = network
        .transfer(&project.payer, &facilitator, TEST_PAYMENT_LAMPORTS)
        .await?;
    progress.success("Payment confirmed");
    progress.key_value("Tx", &signature.to_string());

    let token_balance = match project.env.get(TEST_TOKEN_MINT) {
        Some(mint) => {
            progress.step(3, STEPS, "Verifying test token balance");
            match token_balance(network, retry, &payer, mint).await {
                Ok(amount) => {
                    progress.success(&format!(
                        "Token balance verified: {} tokens",
                        amount.ui_amount
                    ));
                    Some(amount)
                }
                Err(e) => {
                    tracing::debug!("token balance lookup failed: {e}");
                    progress.warning(
                        "Could not verify token balance (token account may not exist)",
                    );
                    None
                }
            }
        }
        None => {
            progress.step(3, STEPS, "No TEST_TOKEN_MINT configured, skipping token check");
            None
        }
    };

    progress.success("All tests passed. The x402 setup is ready to use.");

    Ok(TestReport {
        payer_balance,
        facilitator_balance,
        signature,
        token_balance,
    })
}

async fn token_balance(
    network: &dyn SolanaNetwork,
    retry: &RetryPolicy,
    owner: &Pubkey,
    mint: &str,
) -> Result<TokenAmount> {
    let mint = Pubkey::from_str(mint).map_err(|_| XcSetupError::InvalidPubkey {
        key: TEST_TOKEN_MINT.into(),
        value: mint.into(),
    })?;
    let account = associated_token_address(owner, &mint);
    retry
        .run("token balance", || network.token_balance(&account))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::deploy::PlaceholderDeployer;
    use crate::env_file::{self, ENV_FILE};
    use crate::progress::recording::Recorder;
    use crate::workflow::init::{self, InitOptions};
    use crate::workflow::mock::{Call, MockNetwork};
    use crate::workflow::{fund, test_token_base_units};

    fn no_wait() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
        }
    }

    async fn initialized(root: &std::path::Path) -> Project {
        let options = InitOptions {
            name: "demo".into(),
            cluster: crate::config::Cluster::Devnet,
            rpc_url: None,
        };
        let deployer = PlaceholderDeployer::with_binary("this_tool_does_not_exist_xyz");
        init::run(root, &options, &deployer, &Recorder::default())
            .await
            .unwrap();
        Project::open(&root.join("demo")).unwrap()
    }

    #[tokio::test]
    async fn test_insufficient_balance_submits_nothing() {
        let root = tempfile::tempdir().unwrap();
        let project = initialized(root.path()).await;
        let network = MockNetwork::with_balance(project.payer.pubkey(), MIN_PAYER_BALANCE - 1);

        let result = run(&project, &network, &no_wait(), &Recorder::default()).await;

        match result {
            Err(XcSetupError::InsufficientFunds { balance, required }) => {
                assert_eq!(balance, MIN_PAYER_BALANCE - 1);
                assert_eq!(required, MIN_PAYER_BALANCE);
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
        assert!(!network
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Transfer { .. })));
    }

    #[tokio::test]
    async fn test_sufficient_balance_sends_one_transfer() {
        let root = tempfile::tempdir().unwrap();
        let project = initialized(root.path()).await;
        let network = MockNetwork::with_balance(project.payer.pubkey(), MIN_PAYER_BALANCE);

        let report = run(&project, &network, &no_wait(), &Recorder::default())
            .await
            .unwrap();

        let transfers: Vec<Call> = network
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Transfer { .. }))
            .collect();
        assert_eq!(
            transfers,
            vec![Call::Transfer {
                from: project.payer.pubkey(),
                to: project.facilitator.pubkey(),
                lamports: TEST_PAYMENT_LAMPORTS,
            }]
        );
        assert!(!report.signature.to_string().is_empty());
        assert!(report.token_balance.is_none());
    }

    #[tokio::test]
    async fn test_reports_token_balance_after_fund() {
        let root = tempfile::tempdir().unwrap();
        let network = MockNetwork::default();
        let project = initialized(root.path()).await;
        fund::run(&project, &network, &no_wait(), &Recorder::default())
            .await
            .unwrap();
        let project = Project::open(&project.dir).unwrap();

        let report = run(&project, &network, &no_wait(), &Recorder::default())
            .await
            .unwrap();

        let token = report.token_balance.unwrap();
        assert_eq!(token.amount, test_token_base_units());
        assert_eq!(token.ui_amount, "100");
    }

    #[tokio::test]
    async fn test_token_lookup_failure_is_only_a_warning() {
        let root = tempfile::tempdir().unwrap();
        let project = initialized(root.path()).await;
        env_file::append(
            &project.dir.join(ENV_FILE),
            env_file::TEST_TOKEN_MINT,
            &Pubkey::new_unique().to_string(),
        )
        .unwrap();
        let project = Project::open(&project.dir).unwrap();
        let network = MockNetwork::with_balance(project.payer.pubkey(), MIN_PAYER_BALANCE * 10);
        let progress = Recorder::default();

        let report = run(&project, &network, &no_wait(), &progress).await.unwrap();

        assert!(report.token_balance.is_none());
        assert_eq!(progress.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_mint_is_only_a_warning() {
        let root = tempfile::tempdir().unwrap();
        let project = initialized(root.path()).await;
        env_file::append(&project.dir.join(ENV_FILE), env_file::TEST_TOKEN_MINT, "not-a-key")
            .unwrap();
        let project = Project::open(&project.dir).unwrap();
        let network = MockNetwork::with_balance(project.payer.pubkey(), MIN_PAYER_BALANCE);
        let progress = Recorder::default();

        let report = run(&project, &network, &no_wait(), &progress).await.unwrap();

        assert!(report.token_balance.is_none());
        assert!(!network
            .calls()
            .iter()
            .any(|c| matches!(c, Call::TokenBalance(_))));
        assert_eq!(progress.warnings().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_mint_skips_token_check() {
        let root = tempfile::tempdir().unwrap();
        let project = initialized(root.path()).await;
        env_file::append(&project.dir.join(ENV_FILE), env_file::TEST_TOKEN_MINT, " ").unwrap();
        let project = Project::open(&project.dir).unwrap();
        let network = MockNetwork::with_balance(project.payer.pubkey(), MIN_PAYER_BALANCE);
        let progress = Recorder::default();

        let report = run(&project, &network, &no_wait(), &progress).await.unwrap();

        assert!(report.token_balance.is_none());
        assert!(progress.warnings().is_empty());
        assert!(!network
            .calls()
            .iter()
            .any(|c| matches!(c, Call::TokenBalance(_))));
    }
}
