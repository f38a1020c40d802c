//! Toolchain version detection.
//!
//! Used by the deploy step to report which `solana` CLI is installed. Failure
//! to run the tool or to find a version number yields `None`; callers treat
//! that as "unknown", never as an error.

use std::fmt;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("static pattern"));

/// A `major.minor.patch` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Parse the first `X.Y.Z` found in `s`.
    ///
    /// Accepts `solana-cli 1.18.26 (src:...; feat:...)`,
    /// `solana-cli 2.1.14 (src:...; client:Agave)` and bare `v2.0.3`.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = SEMVER.captures(s)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Run `tool --version` and parse stdout, falling back to stderr.
pub fn detect_version(tool: &str) -> Option<Version> {
    let output = Command::new(tool).arg("--version").output().ok()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Version::parse(&stdout).or_else(|| Version::parse(&String::from_utf8_lossy(&output.stderr)))
}
