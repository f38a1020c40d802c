//! Starter-project templates.
//!
//! Templates are embedded at compile time ([`embedded`]) and rendered with
//! Handlebars ([`renderer::TemplateRenderer`]). Variables available to every
//! template are the fields of [`TemplateContext`].

pub mod embedded;
pub mod renderer;

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Result;
use renderer::TemplateRenderer;

/// Data passed to every project template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext {
    /// Directory name as typed by the user.
    pub project_name: String,
    /// `project_name` as a quoted, escaped Rust string literal.
    pub project_name_literal: String,
    /// `project_name` sanitized into a valid Cargo package name.
    pub crate_name: String,
    pub network: String,
    pub rpc_url: String,
    pub payer_keypair_path: String,
    pub facilitator_keypair_path: String,
}

/// Relative output path and template source for each generated file.
pub const PROJECT_FILES: &[(&str, &str)] = &[
    ("Cargo.toml", embedded::PROJECT_CARGO_TOML),
    ("src/main.rs", embedded::PROJECT_MAIN_RS),
    ("README.md", embedded::PROJECT_README),
    (".gitignore", embedded::PROJECT_GITIGNORE),
];

/// Render every project file. Nothing is written to disk.
pub fn render_project(context: &TemplateContext) -> Result<Vec<(PathBuf, String)>> {
    let renderer = TemplateRenderer::new();
    PROJECT_FILES
        .iter()
        .map(|(path, source)| -> Result<(PathBuf, String)> {
            Ok((PathBuf::from(path), renderer.render(source, context)?))
        })
        .collect()
}

/// Quote `s` as a Rust string literal, escaping quotes, backslashes and
/// control characters.
pub fn rust_string_literal(s: &str) -> String {
    format!("{s:?}")
}

/// Turn a directory name into a Cargo package name.
///
/// Keeps ASCII alphanumerics, `-` and `_`, lowercases, and replaces anything
/// else with `-`. A name that would start with a digit or be empty gets an
/// `x402-` prefix.
pub fn crate_name(project_name: &str) -> String {
    let base = project_name
        .rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or("");
    let mut name: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    name = name.trim_matches('-').to_string();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name = format!("x402-{name}").trim_end_matches('-').to_string();
    }
    name
}
