//! Sharded price poller.
//!
//! Polls a price endpoint once for every configured symbol. The symbol list is split
//! into contiguous shards, one per worker thread, and the caller blocks until every
//! worker is done. The building blocks are:
//!
//! - `Dispatcher` — partitions the symbol list and runs one `Worker` per shard on a
//!   scoped thread.
//! - `Worker` — fetches its shard in order through a `Fetch` implementation, enforces
//!   the consecutive-failure budget and updates the shared state.
//! - `PriceCache` / `RequestCounters` — shared latest prices and aggregate request
//!   count, handed to every worker through `SharedState`.
//! - `StopListener` — reads stdin and cancels the shared `CancellationToken` when the
//!   stop word (default `STOP`) arrives; Ctrl+C does the same.
//! - `Reporter` — logs the aggregate request count on a fixed interval.
//!
//! Per-symbol failures are only logged; workers never propagate errors to the
//! dispatcher.
#![warn(missing_docs)]
pub mod args;
pub mod dispatcher;
pub mod fetcher;
pub mod model;
pub mod reporter;
pub mod shutdown;
pub mod worker;

pub use dispatcher::{Dispatcher, WorkerReport, partition};
pub use fetcher::{Fetch, HttpFetcher};
pub use model::shared::SharedState;
pub use worker::{SymbolOutcome, Worker, WorkerExit, price_event};
