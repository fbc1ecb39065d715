//! Worker polling one shard of the symbol list.
//!
//! A worker walks its shard strictly in order. For each symbol it:
//!
//! 1. stops with [`WorkerExit::Cancelled`] if the shared token is cancelled;
//! 2. fetches the symbol once (a failed symbol is never retried in place);
//! 3. on a transport failure bumps its consecutive-failure count and stops with
//!    [`WorkerExit::RetryBudgetExhausted`] once that count exceeds `max_tries`;
//! 4. on success resets the count and decodes the body. A malformed body is
//!    logged and skipped without touching the retry budget, cache or counters;
//! 5. on a decoded price bumps its own counter and the aggregate, then upserts
//!    the cache and logs the price, marking it ` changed` when it moved.
//!
//! Steps 2, 4 and 5 live in [`Worker::poll`], which reports a [`SymbolOutcome`].
//!
//! Cancellation is only checked between symbols, so an in-flight fetch always
//! completes and its result is applied.
use crate::fetcher::Fetch;
use crate::model::counters::{CountReader, WorkerCounter};
use crate::model::shared::SharedState;
use log::{error, info, warn};
use price_common::{PollerError, PriceRecord};

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// Every symbol of the shard was processed.
    ShardExhausted,
    /// The cancellation token was observed before the shard was finished.
    Cancelled,
    /// More than `max_tries` consecutive transport failures.
    RetryBudgetExhausted,
    /// The worker thread panicked.
    Panicked,
    /// The worker thread could not be spawned; its shard was not polled.
    NotStarted,
}

/// Polls a shard of symbols through a fetcher, updating shared state.
pub struct Worker<'a, F: Fetch + ?Sized> {
    id: usize,
    max_tries: u32,
    fetcher: &'a F,
    shared: SharedState,
    requests: WorkerCounter,
}

impl<'a, F: Fetch + ?Sized> Worker<'a, F> {
    /// Create worker `id` tolerating `max_tries` consecutive failures.
    pub fn new(id: usize, max_tries: u32, fetcher: &'a F, shared: SharedState) -> Self {
        Self {
            id,
            max_tries,
            fetcher,
            shared,
            requests: WorkerCounter::new(),
        }
    }

    /// Worker number within its dispatcher run.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Successful requests made so far.
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }

    /// Handle for reading the success count from another thread.
    pub fn requests_reader(&self) -> CountReader {
        self.requests.reader()
    }

    /// Process `shard` until it is exhausted, cancelled or the retry budget runs out.
    pub fn run(&mut self, shard: &[String]) -> WorkerExit {
        let mut failures: u32 = 0;

        for symbol in shard {
            if self.shared.cancel.is_cancelled() {
                info!("worker {} stopping by request", self.id);
                return WorkerExit::Cancelled;
            }

            match self.poll(symbol) {
                SymbolOutcome::FetchFailed(e) => {
                    failures += 1;
                    warn!(
                        "worker {}: fetching {} failed ({} in a row): {}",
                        self.id, symbol, failures, e
                    );
                    if failures > self.max_tries {
                        error!(
                            "worker {} exceeded max retry count ({})",
                            self.id, self.max_tries
                        );
                        return WorkerExit::RetryBudgetExhausted;
                    }
                }
                _ => failures = 0,
            }
        }

        WorkerExit::ShardExhausted
    }

    /// Fetch `symbol` once and apply the result to the shared state.
    ///
    /// Does not look at the cancellation token or the retry budget; `run` owns both.
    pub fn poll(&mut self, symbol: &str) -> SymbolOutcome {
        let body = match self.fetcher.fetch(symbol) {
            Ok(body) => body,
            Err(e) => return SymbolOutcome::FetchFailed(e),
        };

        let record = match PriceRecord::from_json_bytes(&body) {
            Ok(record) => record,
            Err(e) => {
                error!(
                    "worker {}: error decoding response for {}: {}",
                    self.id, symbol, e
                );
                return SymbolOutcome::Malformed;
            }
        };

        self.requests.increment();
        self.shared.counters.increment_aggregate();

        match self.shared.cache.upsert(&record.symbol, &record.price) {
            Ok(changed) => {
                info!("{}", price_event(&record, changed));
                SymbolOutcome::Updated { changed }
            }
            Err(e) => {
                error!(
                    "worker {}: cache update for {} dropped: {}",
                    self.id, record.symbol, e
                );
                SymbolOutcome::CacheUnavailable
            }
        }
    }
}

/// Result of polling a single symbol.
#[derive(Debug)]
pub enum SymbolOutcome {
    /// Price counted and cached; `changed` is the cache's verdict.
    Updated {
        /// The symbol was cached before with a different price.
        changed: bool,
    },
    /// Transport failure; counts toward the retry budget.
    FetchFailed(PollerError),
    /// The body was not a price record; skipped.
    Malformed,
    /// Price counted but the cache lock was poisoned.
    CacheUnavailable,
}

/// Log line emitted for every price update.
pub fn price_event(record: &PriceRecord, changed: bool) -> String {
    if changed {
        format!("{} price:{} changed", record.symbol, record.price)
    } else {
        format!("{} price:{}", record.symbol, record.price)
    }
}
