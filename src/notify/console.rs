//! Colored console output for the CLI.

use crate::types::UploadOutcome;
use colored::Colorize;

/// Console output handler with colors and formatting.
pub struct ConsoleOutput {
    verbose: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print info message.
    pub fn print_info(&self, message: &str) {
        println!("{} {}", "[*]".bright_blue(), message);
    }

    /// Print the outcome of every dispatched asset, then a one-line tally.
    pub fn print_summary(&self, outcomes: &[UploadOutcome]) {
        let mut uploaded = 0;
        let mut skipped = 0;
        let mut failed = 0;

        for outcome in outcomes {
            let asset = outcome.asset();
            match outcome {
                UploadOutcome::Uploaded { url, .. } => {
                    uploaded += 1;
                    println!("{} {} -> {}", "[+]".green(), asset.bright_white(), url.dimmed());
                }
                UploadOutcome::Skipped { .. } => {
                    skipped += 1;
                    if self.verbose {
                        println!("{} {} (not emitted)", "[.]".dimmed(), asset.dimmed());
                    }
                }
                UploadOutcome::Failed { error, .. } => {
                    failed += 1;
                    println!("{} {}: {}", "[!]".red().bold(), asset.bright_white(), error);
                }
            }
        }

        println!();
        println!("{}", "=== Upload Summary ===".bright_cyan());
        println!("  Uploaded:  {}", uploaded.to_string().green());
        println!("  Skipped:   {}", skipped);
        if failed > 0 {
            println!("  Failed:    {}", failed.to_string().red().bold());
        } else {
            println!("  Failed:    0");
        }
        println!();
    }

    /// Print the embedded source map reference of one asset.
    pub fn print_reference(&self, asset: &str, reference: &str) {
        if reference.is_empty() {
            if self.verbose {
                println!("{} {}", asset.dimmed(), "(no reference)".dimmed());
            }
            return;
        }

        println!("{} {}", asset.bright_white(), reference.trim().cyan());
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false)
    }
}
