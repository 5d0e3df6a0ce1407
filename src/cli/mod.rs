//! Command-line interface for rental-cleaner.

pub mod commands;

pub use commands::{parse_cli, run_with_cli, Cli};
