//! Unified error types for the xc-setup toolkit.

use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur during xc-setup operations.
#[derive(Error, Debug)]
pub enum XcSetupError {
    // --- Project ---

    /// Attempted to create a project in a directory that already exists.
    #[error("directory {0} already exists")]
    ProjectExists(PathBuf),

    /// A file written by `init` is missing (`.env` or one of the key-pairs).
    #[error("{} not found, run `xc-setup init` first", path.display())]
    NotInitialized { path: PathBuf },

    // --- Key-pairs ---

    /// The key-pair file could not be read.
    #[error("key-pair file not found at {path}")]
    KeypairNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The key-pair file is not a JSON array of bytes.
    #[error("failed to parse key-pair at {path}")]
    KeypairParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The bytes do not form a valid ed25519 key-pair.
    #[error("invalid key-pair at {path}: {reason}")]
    InvalidKeypair { path: PathBuf, reason: String },

    /// A configuration value that should be a base58 public key is not one.
    #[error("{key} is not a valid public key: {value}")]
    InvalidPubkey { key: String, value: String },

    // --- Network ---

    /// The payer cannot cover the test payment plus fees.
    #[error(
        "payer wallet has insufficient SOL ({balance} lamports, need {required}), run `xc-setup fund` first"
    )]
    InsufficientFunds { balance: u64, required: u64 },

    /// A JSON-RPC call to the cluster failed.
    #[error("RPC {operation} failed: {message}")]
    Rpc {
        operation: &'static str,
        message: String,
        transient: bool,
    },

    /// A submitted signature did not reach `confirmed` in time.
    #[error("transaction {signature} was not confirmed within {seconds}s")]
    ConfirmationTimeout { signature: String, seconds: u64 },

    /// A transaction reached the cluster but failed.
    #[error("transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    /// An SPL token instruction could not be built.
    #[error("token program error: {0}")]
    TokenProgram(String),

    // --- Templates ---

    /// Handlebars template rendering failed (invalid template or missing variables).
    #[error("template rendering failed: {0}")]
    TemplateRender(String),

    // --- General ---

    /// A filesystem I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A catch-all for errors from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl XcSetupError {
    /// Whether retrying the same request could succeed.
    ///
    /// Only RPC transport failures and rate limits qualify; every other
    /// variant is deterministic.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc { transient: true, .. })
    }
}

/// Alias for `Result<T, XcSetupError>`.
pub type Result<T> = std::result::Result<T, XcSetupError>;
