//! Project directory layout and loading.
//!
//! ```text
//! <project>/
//! ├── .env                  # KEY=value settings (init writes, fund appends)
//! ├── keys/
//! │   ├── payer.json        # payer secret key
//! │   └── facilitator.json  # facilitator secret key
//! ├── Cargo.toml
//! ├── src/main.rs
//! ├── README.md
//! └── .gitignore
//! ```
//!
//! `fund` and `test` open a project with [`Project::open`], which fails before
//! anything touches the network if `init` has not run.

use std::path::{Path, PathBuf};

use solana_sdk::signature::Keypair;

use crate::env_file::{self, EnvFile, ENV_FILE};
use crate::error::{Result, XcSetupError};
use crate::keypair;

pub const KEYS_DIR: &str = "keys";
pub const DEFAULT_PAYER_KEYPAIR_PATH: &str = "keys/payer.json";
pub const DEFAULT_FACILITATOR_KEYPAIR_PATH: &str = "keys/facilitator.json";

/// An initialized project with both key-pairs loaded.
pub struct Project {
    pub dir: PathBuf,
    pub env_path: PathBuf,
    pub env: EnvFile,
    pub payer: Keypair,
    pub facilitator: Keypair,
}

impl Project {
    /// Load the project in `dir`.
    ///
    /// Requires `.env` and both key-pair files. Key paths come from
    /// `PAYER_KEYPAIR_PATH` / `FACILITATOR_KEYPAIR_PATH`, defaulting to
    /// `keys/payer.json` / `keys/facilitator.json`; relative paths are taken
    /// relative to `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        let env_path = dir.join(ENV_FILE);
        if !env_path.is_file() {
            return Err(XcSetupError::NotInitialized { path: env_path });
        }
        let env = env_file::read(&env_path)?;

        let payer_path = resolve_key_path(
            dir,
            env.get(env_file::PAYER_KEYPAIR_PATH),
            DEFAULT_PAYER_KEYPAIR_PATH,
        );
        let facilitator_path = resolve_key_path(
            dir,
            env.get(env_file::FACILITATOR_KEYPAIR_PATH),
            DEFAULT_FACILITATOR_KEYPAIR_PATH,
        );
        for path in [&payer_path, &facilitator_path] {
            if !path.is_file() {
                return Err(XcSetupError::NotInitialized { path: path.clone() });
            }
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            env_path,
            payer: keypair::load(&payer_path)?,
            facilitator: keypair::load(&facilitator_path)?,
            env,
        })
    }
}

fn resolve_key_path(dir: &Path, configured: Option<&str>, default: &str) -> PathBuf {
    let path = Path::new(configured.unwrap_or(default));
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

/// Create `<project_dir>` and `<project_dir>/keys`, along with any missing
/// parents.
///
/// Returns the topmost directory that did not exist before, which is what a
/// rollback must remove. Fails with [`XcSetupError::ProjectExists`] without
/// touching anything if `project_dir` already exists.
pub fn create_project_dirs(project_dir: &Path) -> Result<PathBuf> {
    if project_dir.exists() {
        return Err(XcSetupError::ProjectExists(project_dir.to_path_buf()));
    }
    let created_root = project_dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .last()
        .unwrap_or(project_dir)
        .to_path_buf();
    std::fs::create_dir_all(project_dir.join(KEYS_DIR))?;
    Ok(created_root)
}

/// Write rendered template files under `project_dir`, creating parent directories.
pub fn write_files(project_dir: &Path, files: &[(PathBuf, String)]) -> Result<()> {
    for (relative, contents) in files {
        let path = project_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
    }
    Ok(())
}

/// Removes a freshly created project directory on drop unless committed.
///
/// Only ever armed for a directory this process just created, so removal
/// cannot destroy pre-existing user files.
pub struct ScaffoldGuard {
    dir: PathBuf,
    committed: bool,
}

impl ScaffoldGuard {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            committed: false,
        }
    }

    /// Keep the directory.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for ScaffoldGuard {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        tracing::warn!("init failed, removing {}", self.dir.display());
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            tracing::warn!("could not remove {}: {e}", self.dir.display());
        }
    }
}
