//! Core library for xc-setup.
//!
//! Implements the three workflows behind the CLI (`init`, `fund` and `test`)
//! on top of shared infrastructure: `.env` handling, key-pair files, cluster
//! selection, retry policy, project templates, and a [`network::SolanaNetwork`]
//! trait that isolates every RPC call.
//!
//! Facilitator deployment is pluggable through [`deploy::Deployer`]. The only
//! implementation today records a placeholder program id.

pub mod config;
pub mod deploy;
pub mod env_file;
pub mod error;
pub mod keypair;
pub mod network;
pub mod progress;
pub mod project;
pub mod retry;
pub mod templates;
pub mod version;
pub mod workflow;
