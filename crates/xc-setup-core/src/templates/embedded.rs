//! Compile-time embedded templates for the starter project.
//!
//! Paths are relative to this file (`crates/xc-setup-core/src/templates/embedded.rs`).
//! Renaming a file under `templates/project/` without updating the path here
//! fails the build.

pub const PROJECT_CARGO_TOML: &str = include_str!("../../../../templates/project/Cargo.toml.tmpl");
pub const PROJECT_MAIN_RS: &str = include_str!("../../../../templates/project/src/main.rs.tmpl");
pub const PROJECT_README: &str = include_str!("../../../../templates/project/README.md.tmpl");
pub const PROJECT_GITIGNORE: &str = include_str!("../../../../templates/project/gitignore.tmpl");
