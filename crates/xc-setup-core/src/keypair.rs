//! Key-pair generation and persistence.
//!
//! Key-pairs are stored the way the Solana CLI stores them: a JSON array of
//! the 64 secret-key bytes (32-byte seed followed by the 32-byte public key).
//! These files are the spending authority for the wallet and are written
//! owner-readable only on Unix.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use solana_sdk::signature::{keypair_from_seed, Keypair, Signer};

use crate::error::{Result, XcSetupError};

/// Length of a serialized ed25519 key-pair.
pub const KEYPAIR_LENGTH: usize = 64;

/// Generate a fresh key-pair from the OS random source.
pub fn generate() -> Keypair {
    Keypair::new()
}

/// Save `keypair` to `path` as a JSON byte array, overwriting any existing file.
pub fn save(keypair: &Keypair, path: &Path) -> Result<()> {
    let bytes = keypair.to_bytes().to_vec();
    let json = serde_json::to_string_pretty(&bytes).map_err(|e| XcSetupError::KeypairParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    tracing::debug!("wrote key-pair to {}", path.display());
    Ok(())
}

/// Load a key-pair from a JSON byte array at `path`.
pub fn load(path: &Path) -> Result<Keypair> {
    let contents = std::fs::read_to_string(path).map_err(|e| XcSetupError::KeypairNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;
    let bytes: Vec<u8> =
        serde_json::from_str(&contents).map_err(|e| XcSetupError::KeypairParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    if bytes.len() != KEYPAIR_LENGTH {
        return Err(XcSetupError::InvalidKeypair {
            path: path.to_path_buf(),
            reason: format!("expected {KEYPAIR_LENGTH} bytes, found {}", bytes.len()),
        });
    }

    let (seed, public) = bytes.split_at(32);
    let keypair = keypair_from_seed(seed).map_err(|e| XcSetupError::InvalidKeypair {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if keypair.pubkey().to_bytes() != public {
        return Err(XcSetupError::InvalidKeypair {
            path: path.to_path_buf(),
            reason: "public key does not match secret key".into(),
        });
    }
    Ok(keypair)
}
