//! Terminal output formatting for the xc-setup CLI.
//!
//! Provides consistent, colored output using the [`console`] crate, and
//! [`ConsoleProgress`], which renders workflow progress with an [`indicatif`]
//! spinner while a step is waiting on the network.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use xc_setup_core::progress::Progress;

/// Print a bold cyan header with an underline separator.
pub fn print_header(text: &str) {
    println!("\n{}", style(text).bold().cyan());
    println!("{}", style("=".repeat(text.len())).dim());
}

/// Print a success message prefixed with green `[OK]`.
pub fn print_success(text: &str) {
    println!("{} {}", style("[OK]").green().bold(), text);
}

/// Print a warning message prefixed with yellow `[WARN]`.
pub fn print_warning(text: &str) {
    println!("{} {}", style("[WARN]").yellow().bold(), text);
}

/// Print an error message prefixed with red `[ERROR]` to stderr.
pub fn print_error(text: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), text);
}

/// Print a progress step indicator like `[1/5] Generating key-pairs`.
pub fn print_step(step: u32, total: u32, text: &str) {
    println!("{} {}", style(format!("[{step}/{total}]")).dim(), text);
}

/// Print a key-value pair with dimmed key formatting.
pub fn print_key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// [`Progress`] for the terminal.
///
/// Each step leaves a spinner running until the next message is printed.
/// The spinner is hidden automatically when stdout is not a terminal.
pub struct ConsoleProgress {
    spinner: ProgressBar,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    fn print(&self, f: impl FnOnce()) {
        self.spinner.suspend(f);
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ConsoleProgress {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
    }
}

impl Progress for ConsoleProgress {
    fn header(&self, text: &str) {
        self.print(|| print_header(text));
    }

    fn step(&self, step: u32, total: u32, text: &str) {
        self.print(|| print_step(step, total, text));
        self.spinner.set_message("working...");
    }

    fn success(&self, text: &str) {
        self.spinner.set_message("");
        self.print(|| print_success(text));
    }

    fn warning(&self, text: &str) {
        self.print(|| print_warning(text));
    }

    fn key_value(&self, key: &str, value: &str) {
        self.print(|| print_key_value(key, value));
    }
}
