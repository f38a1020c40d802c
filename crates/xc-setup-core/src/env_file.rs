//! The project-local `.env` store.
//!
//! `init` creates the file, `fund` appends to it, and `fund`/`test` read it.
//! The format is a flat list of `KEY=value` lines. Reading splits on the first
//! `=` and trims both sides; any line that is not `KEY=value` with a non-empty
//! key and value is skipped. A key that appears twice keeps its first position
//! and its last value. A value that is blank after trimming reads as unset.

use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

/// File name of the environment file inside a project directory.
pub const ENV_FILE: &str = ".env";

pub const PAYER_PUBLIC_KEY: &str = "PAYER_PUBLIC_KEY";
pub const PAYER_KEYPAIR_PATH: &str = "PAYER_KEYPAIR_PATH";
pub const FACILITATOR_PUBLIC_KEY: &str = "FACILITATOR_PUBLIC_KEY";
pub const FACILITATOR_KEYPAIR_PATH: &str = "FACILITATOR_KEYPAIR_PATH";
pub const FACILITATOR_PROGRAM_ID: &str = "FACILITATOR_PROGRAM_ID";
pub const NETWORK: &str = "NETWORK";
pub const TEST_TOKEN_MINT: &str = "TEST_TOKEN_MINT";

static LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=]+)=(.+)$").expect("static pattern"));

/// Values written by `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOptions {
    pub payer_public_key: String,
    pub payer_keypair_path: String,
    pub facilitator_public_key: String,
    pub facilitator_keypair_path: String,
    pub facilitator_program_id: String,
    pub network: String,
}

impl EnvOptions {
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            (PAYER_PUBLIC_KEY, &self.payer_public_key),
            (PAYER_KEYPAIR_PATH, &self.payer_keypair_path),
            (FACILITATOR_PUBLIC_KEY, &self.facilitator_public_key),
            (FACILITATOR_KEYPAIR_PATH, &self.facilitator_keypair_path),
            (FACILITATOR_PROGRAM_ID, &self.facilitator_program_id),
            (NETWORK, &self.network),
        ]
    }
}

/// Ordered key/value mapping loaded from a `.env` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    /// Parse `.env` text.
    pub fn parse(text: &str) -> Self {
        let mut env = Self::default();
        for line in text.lines() {
            if let Some(caps) = LINE.captures(line) {
                env.set(caps[1].trim(), caps[2].trim());
            }
        }
        env
    }

    /// Render as `KEY=value` lines, one per entry, newline-terminated.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect()
    }

    /// Insert or overwrite a value, keeping the key's original position.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value for `key`, or `None` if the key is absent or its value is blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<&EnvOptions> for EnvFile {
    fn from(options: &EnvOptions) -> Self {
        let mut env = Self::default();
        for (key, value) in options.entries() {
            env.set(key, value);
        }
        env
    }
}

/// Write `<dir>/.env` from `options`, replacing any existing file.
pub fn write(dir: &Path, options: &EnvOptions) -> Result<()> {
    let path = dir.join(ENV_FILE);
    std::fs::write(&path, EnvFile::from(options).render())?;
    tracing::debug!("wrote {}", path.display());
    Ok(())
}

/// Read and parse the `.env` file at `path`.
pub fn read(path: &Path) -> Result<EnvFile> {
    let contents = std::fs::read_to_string(path)?;
    Ok(EnvFile::parse(&contents))
}

/// Append a single `KEY=value` line to `path` without touching earlier lines.
pub fn append(path: &Path, key: &str, value: &str) -> Result<()> {
    let existing = std::fs::read(path)?;
    let mut file = std::fs::OpenOptions::new().append(true).open(path)?;
    if !existing.is_empty() && !existing.ends_with(b"\n") {
        file.write_all(b"\n")?;
    }
    writeln!(file, "{key}={value}")?;
    tracing::debug!("appended {key} to {}", path.display());
    Ok(())
}
