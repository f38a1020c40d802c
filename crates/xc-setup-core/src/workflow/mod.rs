//! The three user-facing workflows: [`init`], [`fund`] and [`verify`]
//! (run by `xc-setup test`).
//!
//! Each runs its steps strictly in order and stops at the first error.

pub mod fund;
pub mod init;
pub mod verify;

#[cfg(test)]
pub(crate) mod mock;

use solana_sdk::native_token::LAMPORTS_PER_SOL;

/// Lamports requested from the faucet for each wallet (0.5 SOL).
pub const AIRDROP_LAMPORTS: u64 = LAMPORTS_PER_SOL / 2;

/// Decimals of the test token mint.
pub const TEST_TOKEN_DECIMALS: u8 = 9;

/// Whole test tokens minted to the payer.
pub const TEST_TOKEN_SUPPLY: u64 = 100;

/// Minimum payer balance for `test` to attempt the payment (0.02 SOL).
pub const MIN_PAYER_BALANCE: u64 = LAMPORTS_PER_SOL / 50;

/// Lamports sent by the test payment (0.01 SOL).
pub const TEST_PAYMENT_LAMPORTS: u64 = LAMPORTS_PER_SOL / 100;

/// Default directory name for `init` without an argument.
pub const DEFAULT_PROJECT_NAME: &str = "my-x402-project";

/// Test token supply in base units.
pub fn test_token_base_units() -> u64 {
    TEST_TOKEN_SUPPLY * 10u64.pow(u32::from(TEST_TOKEN_DECIMALS))
}

/// Format lamports as SOL without floating-point rounding, e.g. `0.02`.
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let frac = lamports % LAMPORTS_PER_SOL;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:09}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}
