//! Poller configuration.
//!
//! Configuration is a YAML document, by default `config.yaml`:
//!
//! ```yaml
//! symbols: [BTCUSDT, ETHUSDT, BNBUSDT]
//! max_workers: 4
//! # optional, defaults shown
//! source: https://api.binance.com/api/v3/ticker/price
//! symbol_param: symbol
//! max_tries: 10
//! stop_word: STOP
//! report_interval_secs: 5
//! request_timeout_secs: 10
//! ```
//!
//! `load_config` reads, parses and validates the file in one go; `read_config`
//! stops before validation so callers can apply overrides first. Validation trims
//! symbols, rejects empty ones, rejects a zero worker count and clamps the worker
//! count down to the available hardware parallelism.
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;

use log::warn;
use serde::Deserialize;

use crate::error::PollerError;
use crate::net::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SOURCE, SYMBOL_PARAM_KEY};
use crate::symbols::normalize_symbols;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Default consecutive transient failures a worker tolerates.
pub const DEFAULT_MAX_TRIES: u32 = 10;
/// Default line that stops the poller when read from stdin.
pub const DEFAULT_STOP_WORD: &str = "STOP";
/// Default period of the aggregate request report.
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 5;

/// Validated poller configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Ordered symbol list; duplicates are polled independently.
    pub symbols: Vec<String>,
    /// Worker count, at least 1 and at most the available parallelism.
    pub max_workers: usize,
    /// Quote endpoint URL.
    #[serde(default = "default_source")]
    pub source: String,
    /// Query parameter name carrying the symbol.
    #[serde(default = "default_symbol_param")]
    pub symbol_param: String,
    /// Consecutive transient failures tolerated per worker.
    #[serde(default = "default_max_tries")]
    pub max_tries: u32,
    /// Line that triggers shutdown.
    #[serde(default = "default_stop_word")]
    pub stop_word: String,
    /// Seconds between aggregate request reports.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
    /// Seconds before an individual request is abandoned by the HTTP client.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_symbol_param() -> String {
    SYMBOL_PARAM_KEY.to_string()
}

fn default_max_tries() -> u32 {
    DEFAULT_MAX_TRIES
}

fn default_stop_word() -> String {
    DEFAULT_STOP_WORD.to_string()
}

fn default_report_interval_secs() -> u64 {
    DEFAULT_REPORT_INTERVAL_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl PollerConfig {
    /// Parse a YAML document without validating it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PollerError> {
        let config = serde_yaml_bw::from_str(yaml)?;
        Ok(config)
    }

    /// Validate against the machine's available parallelism.
    pub fn validate(self) -> Result<Self, PollerError> {
        self.validate_with_parallelism(available_parallelism())
    }

    /// Validate and normalize, clamping `max_workers` to `parallelism`.
    pub fn validate_with_parallelism(mut self, parallelism: usize) -> Result<Self, PollerError> {
        if self.max_workers < 1 {
            return Err(PollerError::Config(
                "max_workers minimum value is 1".to_string(),
            ));
        }
        if self.stop_word.trim().is_empty() {
            return Err(PollerError::Config("stop_word must not be empty".to_string()));
        }
        if self.source.trim().is_empty() {
            return Err(PollerError::Config("source must not be empty".to_string()));
        }
        if self.report_interval_secs == 0 {
            return Err(PollerError::Config(
                "report_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(PollerError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        self.symbols = normalize_symbols(self.symbols)?;
        self.stop_word = self.stop_word.trim().to_string();

        let clamped = clamp_workers(self.max_workers, parallelism);
        if clamped != self.max_workers {
            warn!(
                "max_workers {} exceeds available parallelism, clamped to {}",
                self.max_workers, clamped
            );
            self.max_workers = clamped;
        }
        Ok(self)
    }

    /// Replace the symbol list, e.g. with one read from a symbols file.
    pub fn with_symbols(mut self, symbols: Vec<String>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Override the requested worker count.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Aggregate report period.
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Read and parse the configuration at `path` without validating it.
///
/// Use this when command-line overrides still have to be applied; call
/// [`PollerConfig::validate`] afterwards.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<PollerConfig, PollerError> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|source| PollerError::ConfigRead {
        path: path.display().to_string(),
        source,
    })?;
    PollerConfig::from_yaml_str(&yaml)
}

/// Read, parse and validate the configuration at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PollerConfig, PollerError> {
    read_config(path)?.validate()
}

/// Clamp a requested worker count down to `parallelism`; never raises it.
pub fn clamp_workers(requested: usize, parallelism: usize) -> usize {
    requested.min(parallelism.max(1))
}

/// Hardware parallelism hint, 1 when it cannot be determined.
pub fn available_parallelism() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(yaml: &str) -> PollerConfig {
        PollerConfig::from_yaml_str(yaml).unwrap()
    }

    #[test]
    fn applies_defaults() {
        let config = parse("symbols: [BTCUSDT]\nmax_workers: 1\n")
            .validate_with_parallelism(8)
            .unwrap();
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.symbol_param, "symbol");
        assert_eq!(config.max_tries, 10);
        assert_eq!(config.stop_word, "STOP");
        assert_eq!(config.report_interval(), Duration::from_secs(5));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let config = parse("symbols: [B, A, B]\nmax_workers: 2\n")
            .validate_with_parallelism(8)
            .unwrap();
        assert_eq!(config.symbols, vec!["B", "A", "B"]);
    }

    #[test]
    fn zero_workers_rejected() {
        let err = parse("symbols: [A]\nmax_workers: 0\n")
            .validate_with_parallelism(8)
            .unwrap_err();
        assert!(matches!(err, PollerError::Config(_)));
    }

    #[test]
    fn negative_workers_fail_to_parse() {
        assert!(PollerConfig::from_yaml_str("symbols: [A]\nmax_workers: -3\n").is_err());
    }

    #[test]
    fn missing_symbols_fail_to_parse() {
        let err = PollerConfig::from_yaml_str("max_workers: 2\n").unwrap_err();
        assert!(matches!(err, PollerError::Yaml(_)));
    }

    #[test]
    fn empty_symbol_rejected() {
        let err = parse("symbols: [A, '']\nmax_workers: 1\n")
            .validate_with_parallelism(8)
            .unwrap_err();
        assert!(matches!(err, PollerError::Config(_)));
    }

    #[test]
    fn clamps_down_to_parallelism() {
        let config = parse("symbols: [A]\nmax_workers: 64\n")
            .validate_with_parallelism(4)
            .unwrap();
        assert_eq!(config.max_workers, 4);
    }

    #[test]
    fn never_clamps_up() {
        assert_eq!(clamp_workers(2, 16), 2);
        assert_eq!(clamp_workers(16, 16), 16);
        assert_eq!(clamp_workers(17, 16), 16);
        assert_eq!(clamp_workers(3, 0), 1);
    }

    #[test]
    fn overrides_are_validated() {
        let err = parse("symbols: [A]\nmax_workers: 2\n")
            .with_max_workers(0)
            .validate_with_parallelism(8)
            .unwrap_err();
        assert!(matches!(err, PollerError::Config(_)));

        let config = parse("symbols: [A]\nmax_workers: 2\n")
            .with_symbols(vec![" X ".into(), "Y".into()])
            .validate_with_parallelism(8)
            .unwrap();
        assert_eq!(config.symbols, vec!["X", "Y"]);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "symbols:\n  - BTCUSDT\n  - ETHUSDT\nmax_workers: 1\nmax_tries: 3").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.symbols, vec!["BTCUSDT", "ETHUSDT"]);
        assert_eq!(config.max_workers, 1);
        assert_eq!(config.max_tries, 3);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, PollerError::ConfigRead { .. }));
    }
}
