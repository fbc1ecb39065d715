//! Price poller binary.
//!
//! Loads the configuration, starts the stop word listener and the periodic reporter,
//! then runs the dispatcher until every worker has finished.
//!
//! Usage example (CLI):
//! ```bash
//! RUST_LOG=info price_poller --config ./config.yaml --max-workers 4
//! ```
//!
//! Type `STOP` (or the configured stop word) on stdin, or press Ctrl+C, to stop the
//! workers after their current request. Configuration errors abort startup with a
//! non-zero exit status.
use clap::Parser;
use log::{debug, error, info, warn};
use price_common::config::read_config;
use price_common::symbols::{SymbolFile, SymbolParser};
use price_common::{PollerConfig, PollerError, Result};
use price_poller::args::Args;
use price_poller::reporter::Reporter;
use price_poller::shutdown::{StopListener, install_interrupt_handler};
use price_poller::{Dispatcher, HttpFetcher, SharedState, WorkerExit, WorkerReport};
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

fn main() -> Result<(), PollerError> {
    init_logger();
    let args = Args::parse();

    let config = build_config(&args).inspect_err(|e| error!("error getting config: {}", e))?;
    info!(
        "polling {} symbols with {} workers (max tries {}, source {})",
        config.symbols.len(),
        config.max_workers,
        config.max_tries,
        config.source
    );
    let fetcher = HttpFetcher::from_config(&config)?;

    let shared = SharedState::new();
    install_interrupt_handler(shared.cancel.clone())?;
    StopListener::start(config.stop_word.clone(), shared.cancel.clone())?;
    let reporter = Reporter::start(Arc::clone(&shared.counters), config.report_interval())?;

    let dispatcher = Dispatcher::new(&fetcher, shared.clone(), config.max_workers, config.max_tries);
    let reports = dispatcher.run(&config.symbols);
    if let Err(e) = reporter.stop() {
        warn!("failed to stop reporter: {}", e);
    }
    let reports = reports?;

    log_summary(&reports, &shared);
    info!("all work is done");
    Ok(())
}

fn build_config(args: &Args) -> Result<PollerConfig> {
    let mut config = read_config(args.config_path())?;
    if let Some(path) = args.symbols_path() {
        let file = File::open(&path).map_err(|e| {
            PollerError::ParseSymbolsFile(format!("{}: {}", path.display(), e))
        })?;
        config = config.with_symbols(SymbolFile::parse_from_file(BufReader::new(file))?);
    }
    if let Some(max_workers) = args.max_workers {
        config = config.with_max_workers(max_workers);
    }
    config.validate()
}

fn log_summary(reports: &[WorkerReport], shared: &SharedState) {
    let cancelled = reports
        .iter()
        .filter(|r| r.exit == WorkerExit::Cancelled)
        .count();
    let stopped_early = reports
        .iter()
        .filter(|r| {
            matches!(
                r.exit,
                WorkerExit::RetryBudgetExhausted | WorkerExit::Panicked | WorkerExit::NotStarted
            )
        })
        .count();
    info!(
        "workers requests total: {} ({} workers, {} cancelled, {} stopped early)",
        shared.counters.aggregate(),
        reports.len(),
        cancelled,
        stopped_early
    );

    match shared.cache.snapshot() {
        Ok(prices) if prices.is_empty() => warn!("no prices were fetched"),
        Ok(prices) => {
            info!("price cache holds {} symbols", prices.len());
            for (symbol, price) in prices {
                debug!("{} last price:{}", symbol, price);
            }
        }
        Err(e) => error!("price cache unavailable: {}", e),
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
