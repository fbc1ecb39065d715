//! Command-line arguments for the price poller.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use price_common::config::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file.
    #[clap(long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Path to a text file with one symbol per line.
    /// Replaces the `symbols` list of the configuration file.
    #[clap(long)]
    pub symbols: Option<String>,

    /// Overrides `max_workers` from the configuration file.
    #[clap(long)]
    pub max_workers: Option<usize>,
}

impl Args {
    /// Configuration path with surrounding quotes removed.
    pub fn config_path(&self) -> PathBuf {
        normalize_path(&self.config)
    }

    /// Symbols file path with surrounding quotes removed, if given.
    pub fn symbols_path(&self) -> Option<PathBuf> {
        self.symbols.as_deref().map(normalize_path)
    }
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}
