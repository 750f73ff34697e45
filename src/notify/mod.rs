//! Output module for upload results.
//!
//! This module handles:
//! - The logger interface behind the per-file log lines
//! - Colored console summaries for the CLI

pub mod console;
pub mod logger;

pub use console::ConsoleOutput;
pub use logger::{TracingLogger, UploadLogger};
