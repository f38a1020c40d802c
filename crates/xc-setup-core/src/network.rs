//! Solana cluster access.
//!
//! Workflows talk to the cluster through the [`SolanaNetwork`] trait so they
//! can be exercised against an in-memory fake. [`RpcNetwork`] is the real
//! implementation over the non-blocking JSON-RPC client, using `confirmed`
//! commitment for every read and every confirmation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::{Transaction, TransactionError};
use solana_system_interface::instruction as system_instruction;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token::state::Mint;

use crate::error::{Result, XcSetupError};

/// Balance of an SPL token account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAmount {
    /// Raw amount in base units.
    pub amount: u64,
    pub decimals: u8,
    /// Human-readable amount, e.g. `"100"` for 100 × 10⁹ base units at 9 decimals.
    pub ui_amount: String,
}

/// The cluster operations the workflows need.
///
/// Methods that submit a transaction return only after it reached `confirmed`.
#[async_trait]
pub trait SolanaNetwork: Send + Sync {
    /// The RPC endpoint, for display.
    fn endpoint(&self) -> &str;

    /// Lamport balance of `address`.
    async fn balance(&self, address: &Pubkey) -> Result<u64>;

    /// Request `lamports` from the cluster faucet. Returns as soon as the
    /// faucet accepts the request; pair with [`SolanaNetwork::confirm`].
    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature>;

    /// Wait until `signature` reaches `confirmed`. A transaction that landed
    /// but failed is an error.
    async fn confirm(&self, signature: &Signature) -> Result<()>;

    /// Create a new SPL mint paid for by `payer`, with `authority` as mint
    /// authority and no freeze authority.
    async fn create_mint(&self, payer: &Keypair, authority: &Pubkey, decimals: u8)
        -> Result<Pubkey>;

    /// Return `owner`'s associated token account for `mint`, creating it if needed.
    async fn get_or_create_associated_token_account(
        &self,
        payer: &Keypair,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Pubkey>;

    /// Mint `amount` base units into `destination`. `authority` signs and pays.
    async fn mint_to(
        &self,
        authority: &Keypair,
        mint: &Pubkey,
        destination: &Pubkey,
        amount: u64,
    ) -> Result<Signature>;

    /// Transfer `lamports` from `from` to `to`.
    async fn transfer(&self, from: &Keypair, to: &Pubkey, lamports: u64) -> Result<Signature>;

    /// Balance of an existing token account.
    async fn token_balance(&self, token_account: &Pubkey) -> Result<TokenAmount>;
}

/// Address of `owner`'s associated token account for `mint` under the SPL
/// token program.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// [`SolanaNetwork`] backed by a JSON-RPC endpoint.
pub struct RpcNetwork {
    client: RpcClient,
    endpoint: String,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl RpcNetwork {
    /// Default time to wait for a signature to reach `confirmed`.
    pub const CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(rpc_url: &str) -> Self {
        Self {
            client: RpcClient::new_with_commitment(
                rpc_url.to_string(),
                CommitmentConfig::confirmed(),
            ),
            endpoint: rpc_url.to_string(),
            confirm_timeout: Self::CONFIRM_TIMEOUT,
            poll_interval: Duration::from_millis(500),
        }
    }

    async fn wait_for_confirmation(&self, signature: &Signature) -> Result<()> {
        let deadline = Instant::now() + self.confirm_timeout;
        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(signature, CommitmentConfig::confirmed())
                .await
                .map_err(|e| rpc_error("getSignatureStatuses", e));
            match status {
                Ok(status) => {
                    if confirmation_status(signature, status)? {
                        return Ok(());
                    }
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!("polling {signature} failed: {e}; still waiting");
                }
                Err(e) => return Err(e),
            }
            if Instant::now() >= deadline {
                return Err(XcSetupError::ConfirmationTimeout {
                    signature: signature.to_string(),
                    seconds: self.confirm_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn send(
        &self,
        operation: &'static str,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
    ) -> Result<Signature> {
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| rpc_error("getLatestBlockhash", e))?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&payer.pubkey()),
            signers,
            blockhash,
        );
        tracing::debug!("sending {operation} transaction {}", tx.signatures[0]);
        self.client
            .send_and_confirm_transaction(&tx)
            .await
            .map_err(|e| rpc_error(operation, e))
    }
}

#[async_trait]
impl SolanaNetwork for RpcNetwork {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        tracing::debug!("getBalance {address}");
        self.client
            .get_balance(address)
            .await
            .map_err(|e| rpc_error("getBalance", e))
    }

    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature> {
        tracing::debug!("requestAirdrop {lamports} lamports to {address}");
        self.client
            .request_airdrop(address, lamports)
            .await
            .map_err(|e| rpc_error("requestAirdrop", e))
    }

    async fn confirm(&self, signature: &Signature) -> Result<()> {
        tracing::debug!("waiting for {signature} to confirm");
        self.wait_for_confirmation(signature).await
    }

    async fn create_mint(
        &self,
        payer: &Keypair,
        authority: &Pubkey,
        decimals: u8,
    ) -> Result<Pubkey> {
        let mint = Keypair::new();
        let rent = self
            .client
            .get_minimum_balance_for_rent_exemption(Mint::LEN)
            .await
            .map_err(|e| rpc_error("getMinimumBalanceForRentExemption", e))?;

        let instructions = [
            system_instruction::create_account(
                &payer.pubkey(),
                &mint.pubkey(),
                rent,
                Mint::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_mint2(
                &spl_token::id(),
                &mint.pubkey(),
                authority,
                None,
                decimals,
            )
            .map_err(|e| XcSetupError::TokenProgram(e.to_string()))?,
        ];

        self.send("createMint", &instructions, payer, &[payer, &mint])
            .await?;
        Ok(mint.pubkey())
    }

    async fn get_or_create_associated_token_account(
        &self,
        payer: &Keypair,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Pubkey> {
        let address = associated_token_address(owner, mint);
        let existing = self
            .client
            .get_account_with_commitment(&address, CommitmentConfig::confirmed())
            .await
            .map_err(|e| rpc_error("getAccountInfo", e))?;
        if existing.value.is_some() {
            tracing::debug!("associated token account {address} already exists");
            return Ok(address);
        }

        let instruction =
            create_associated_token_account_idempotent(&payer.pubkey(), owner, mint, &spl_token::id());
        self.send("createAssociatedTokenAccount", &[instruction], payer, &[payer])
            .await?;
        Ok(address)
    }

    async fn mint_to(
        &self,
        authority: &Keypair,
        mint: &Pubkey,
        destination: &Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        let instruction = spl_token::instruction::mint_to(
            &spl_token::id(),
            mint,
            destination,
            &authority.pubkey(),
            &[],
            amount,
        )
        .map_err(|e| XcSetupError::TokenProgram(e.to_string()))?;
        self.send("mintTo", &[instruction], authority, &[authority])
            .await
    }

    async fn transfer(&self, from: &Keypair, to: &Pubkey, lamports: u64) -> Result<Signature> {
        let instruction = system_instruction::transfer(&from.pubkey(), to, lamports);
        self.send("transfer", &[instruction], from, &[from]).await
    }

    async fn token_balance(&self, token_account: &Pubkey) -> Result<TokenAmount> {
        let balance = self
            .client
            .get_token_account_balance(token_account)
            .await
            .map_err(|e| rpc_error("getTokenAccountBalance", e))?;
        let amount = balance.amount.parse::<u64>().map_err(|e| XcSetupError::Rpc {
            operation: "getTokenAccountBalance",
            message: format!("invalid amount '{}': {e}", balance.amount),
            transient: false,
        })?;
        Ok(TokenAmount {
            amount,
            decimals: balance.decimals,
            ui_amount: balance.ui_amount_string,
        })
    }
}

/// Interpret a signature status: `Ok(true)` once confirmed, `Ok(false)` while
/// still pending, and an error if the transaction landed but failed.
fn confirmation_status(
    signature: &Signature,
    status: Option<std::result::Result<(), TransactionError>>,
) -> Result<bool> {
    match status {
        None => Ok(false),
        Some(Ok(())) => Ok(true),
        Some(Err(e)) => Err(XcSetupError::TransactionFailed {
            signature: signature.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Convert a client error, flagging transport failures and rate limits as transient.
fn rpc_error(operation: &'static str, err: ClientError) -> XcSetupError {
    let message = err.to_string();
    let transient = matches!(
        err.kind(),
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_)
    ) || is_rate_limit(&message);
    XcSetupError::Rpc {
        operation,
        message,
        transient,
    }
}

fn is_rate_limit(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    ["429", "too many requests", "rate limit", "airdrop request failed"]
        .iter()
        .any(|needle| lower.contains(needle))
}
