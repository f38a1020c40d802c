//! User-facing progress reporting.
//!
//! Workflows describe what they are doing through [`Progress`]; the CLI
//! renders it to the terminal. Every method defaults to a no-op.

pub trait Progress: Send + Sync {
    fn header(&self, _text: &str) {}

    /// A numbered step, e.g. `[2/5] Generating key-pairs`.
    fn step(&self, _step: u32, _total: u32, _text: &str) {}

    fn success(&self, _text: &str) {}

    fn warning(&self, _text: &str) {}

    fn key_value(&self, _key: &str, _value: &str) {}
}
