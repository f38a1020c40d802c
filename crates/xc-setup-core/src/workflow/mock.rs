//! In-memory [`SolanaNetwork`] for workflow tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};

use crate::error::{Result, XcSetupError};
use crate::network::{associated_token_address, SolanaNetwork, TokenAmount};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Balance(Pubkey),
    Airdrop(Pubkey, u64),
    Confirm(Signature),
    CreateMint { payer: Pubkey, authority: Pubkey, decimals: u8 },
    AssociatedAccount { mint: Pubkey, owner: Pubkey },
    MintTo { mint: Pubkey, destination: Pubkey, amount: u64 },
    Transfer { from: Pubkey, to: Pubkey, lamports: u64 },
    TokenBalance(Pubkey),
}

#[derive(Default)]
pub struct MockNetwork {
    pub calls: Mutex<Vec<Call>>,
    pub balances: Mutex<HashMap<Pubkey, u64>>,
    pub tokens: Mutex<HashMap<Pubkey, u64>>,
    /// Airdrops that fail with a rate-limit error before one succeeds.
    pub airdrop_failures: Mutex<u32>,
    /// Confirmations that fail with a transport error.
    pub confirm_failures: Mutex<u32>,
    pub mint: Mutex<Option<Pubkey>>,
}

impl MockNetwork {
    pub fn with_balance(address: Pubkey, lamports: u64) -> Self {
        let network = Self::default();
        network.balances.lock().unwrap().insert(address, lamports);
        network
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SolanaNetwork for MockNetwork {
    fn endpoint(&self) -> &str {
        "mock://"
    }

    async fn balance(&self, address: &Pubkey) -> Result<u64> {
        self.record(Call::Balance(*address));
        Ok(*self.balances.lock().unwrap().get(address).unwrap_or(&0))
    }

    async fn request_airdrop(&self, address: &Pubkey, lamports: u64) -> Result<Signature> {
        self.record(Call::Airdrop(*address, lamports));
        {
            let mut failures = self.airdrop_failures.lock().unwrap();
            if *failures > 0 {
                *failures -= 1;
                return Err(XcSetupError::Rpc {
                    operation: "requestAirdrop",
                    message: "429 Too Many Requests".into(),
                    transient: true,
                });
            }
        }
        *self.balances.lock().unwrap().entry(*address).or_default() += lamports;
        Ok(Signature::default())
    }

    async fn confirm(&self, signature: &Signature) -> Result<()> {
        self.record(Call::Confirm(*signature));
        let mut failures = self.confirm_failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(XcSetupError::Rpc {
                operation: "getSignatureStatuses",
                message: "connection reset by peer".into(),
                transient: true,
            });
        }
        Ok(())
    }

    async fn create_mint(
        &self,
        payer: &Keypair,
        authority: &Pubkey,
        decimals: u8,
    ) -> Result<Pubkey> {
        self.record(Call::CreateMint {
            payer: payer.pubkey(),
            authority: *authority,
            decimals,
        });
        let mint = Pubkey::new_unique();
        *self.mint.lock().unwrap() = Some(mint);
        Ok(mint)
    }

    async fn get_or_create_associated_token_account(
        &self,
        _payer: &Keypair,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Pubkey> {
        self.record(Call::AssociatedAccount {
            mint: *mint,
            owner: *owner,
        });
        let address = associated_token_address(owner, mint);
        self.tokens.lock().unwrap().entry(address).or_default();
        Ok(address)
    }

    async fn mint_to(
        &self,
        _authority: &Keypair,
        mint: &Pubkey,
        destination: &Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        self.record(Call::MintTo {
            mint: *mint,
            destination: *destination,
            amount,
        });
        *self.tokens.lock().unwrap().entry(*destination).or_default() += amount;
        Ok(Signature::default())
    }

    async fn transfer(&self, from: &Keypair, to: &Pubkey, lamports: u64) -> Result<Signature> {
        self.record(Call::Transfer {
            from: from.pubkey(),
            to: *to,
            lamports,
        });
        let mut balances = self.balances.lock().unwrap();
        let source = balances.entry(from.pubkey()).or_default();
        *source = source.saturating_sub(lamports);
        *balances.entry(*to).or_default() += lamports;
        Ok(Signature::default())
    }

    async fn token_balance(&self, token_account: &Pubkey) -> Result<TokenAmount> {
        self.record(Call::TokenBalance(*token_account));
        match self.tokens.lock().unwrap().get(token_account) {
            Some(&amount) => Ok(TokenAmount {
                amount,
                decimals: 9,
                ui_amount: (amount / 1_000_000_000).to_string(),
            }),
            None => Err(XcSetupError::Rpc {
                operation: "getTokenAccountBalance",
                message: "could not find account".into(),
                transient: false,
            }),
        }
    }
}
