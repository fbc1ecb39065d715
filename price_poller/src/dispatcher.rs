//! Static sharding of the symbol list across a fixed worker pool.
//!
//! `partition` splits `L` symbols into `W` contiguous shards: the first `L % W`
//! shards get `L / W + 1` symbols, the rest `L / W`. The dispatcher spawns one
//! scoped thread per non-empty shard and joins all of them before returning, so
//! the shards can borrow the caller's list. Empty shards (fewer symbols than
//! workers) are reported as finished with zero requests without spawning.
//!
//! Every worker gets exactly one `worker N made M requests` line, whether its
//! shard ran to an end, panicked or never started.
use crate::fetcher::Fetch;
use crate::model::counters::CountReader;
use crate::model::shared::SharedState;
use crate::worker::{Worker, WorkerExit};
use log::{error, info};
use price_common::PollerError;
use std::io;
use std::thread;

/// Outcome of one worker after the dispatcher joined it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    /// Worker number, equal to its shard index.
    pub id: usize,
    /// Successful requests made by the worker.
    pub requests: u64,
    /// Why the worker stopped.
    pub exit: WorkerExit,
}

/// Split `items` into `workers` contiguous shards whose sizes differ by at most one.
pub fn partition<T>(items: &[T], workers: usize) -> Result<Vec<&[T]>, PollerError> {
    if workers == 0 {
        return Err(PollerError::Config(
            "worker count must be at least 1".to_string(),
        ));
    }

    let base = items.len() / workers;
    let extra = items.len() % workers;
    let mut shards = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let mut end = start + base;
        if i < extra {
            end += 1;
        }
        shards.push(&items[start..end]);
        start = end;
    }
    Ok(shards)
}

/// Fans a symbol list out to workers sharing one cache, counter and token.
pub struct Dispatcher<'a, F: Fetch + ?Sized> {
    fetcher: &'a F,
    shared: SharedState,
    workers: usize,
    max_tries: u32,
}

impl<'a, F: Fetch + ?Sized> Dispatcher<'a, F> {
    /// Create a dispatcher running `workers` workers with a `max_tries` budget each.
    pub fn new(fetcher: &'a F, shared: SharedState, workers: usize, max_tries: u32) -> Self {
        Self {
            fetcher,
            shared,
            workers,
            max_tries,
        }
    }

    /// Poll every symbol once and block until all workers are done.
    ///
    /// Reports are ordered by worker id. A panicking worker is reported as
    /// [`WorkerExit::Panicked`] and a worker whose thread could not be spawned
    /// as [`WorkerExit::NotStarted`]; neither affects the others.
    pub fn run(&self, symbols: &[String]) -> Result<Vec<WorkerReport>, PollerError> {
        let shards = partition(symbols, self.workers)?;

        thread::scope(|scope| -> Result<Vec<WorkerReport>, PollerError> {
            let mut pending = Vec::with_capacity(shards.len());
            let mut skipped = Vec::new();

            for (id, shard) in shards.into_iter().enumerate() {
                let mut worker = Worker::new(id, self.max_tries, self.fetcher, self.shared.clone());
                let reader = worker.requests_reader();

                if shard.is_empty() {
                    log_requests(id, 0);
                    pending.push((id, reader, None));
                    continue;
                }

                let spawned = thread::Builder::new()
                    .name(format!("worker-{}", id))
                    .spawn_scoped(scope, move || {
                        let exit = worker.run(shard);
                        log_requests(worker.id(), worker.requests());
                        exit
                    });
                match spawned {
                    Ok(handle) => pending.push((id, reader, Some(handle))),
                    Err(e) => skipped.push(not_started(id, &e)),
                }
            }

            let mut reports: Vec<WorkerReport> = pending
                .into_iter()
                .map(|(id, reader, handle)| {
                    let exit = match handle {
                        None => WorkerExit::ShardExhausted,
                        Some(handle) => handle.join().unwrap_or_else(|_| panicked(id, &reader)),
                    };
                    WorkerReport {
                        id,
                        requests: reader.get(),
                        exit,
                    }
                })
                .collect();
            reports.append(&mut skipped);
            reports.sort_by_key(|r| r.id);
            Ok(reports)
        })
    }
}

fn log_requests(id: usize, requests: u64) {
    info!("worker {} made {} requests", id, requests);
}

fn panicked(id: usize, reader: &CountReader) -> WorkerExit {
    let requests = reader.get();
    error!("worker {} panicked after {} requests", id, requests);
    log_requests(id, requests);
    WorkerExit::Panicked
}

fn not_started(id: usize, err: &io::Error) -> WorkerReport {
    error!("failed to spawn worker {}: {}", id, err);
    log_requests(id, 0);
    WorkerReport {
        id,
        requests: 0,
        exit: WorkerExit::NotStarted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::testing::{ScriptedFetcher, always_ok, price_body, transport_error};
    use proptest::prelude::*;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn uneven_split_front_loads_remainder() {
        let list = symbols(&["A", "B", "C", "D", "E"]);
        let shards = partition(&list, 2).unwrap();
        assert_eq!(shards, vec![&list[0..3], &list[3..5]]);
    }

    #[test]
    fn more_workers_than_symbols_leaves_empty_shards() {
        let list = symbols(&["A", "B"]);
        let sizes: Vec<usize> = partition(&list, 4).unwrap().iter().map(|s| s.len()).collect();
        assert_eq!(sizes, vec![1, 1, 0, 0]);
    }

    #[test]
    fn zero_workers_rejected() {
        let list = symbols(&["A"]);
        assert!(matches!(partition(&list, 0), Err(PollerError::Config(_))));
    }

    proptest! {
        #[test]
        fn shards_cover_list_exactly_once(len in 0usize..200, workers in 1usize..32) {
            let list: Vec<usize> = (0..len).collect();
            let shards = partition(&list, workers).unwrap();

            prop_assert_eq!(shards.len(), workers);
            let rebuilt: Vec<usize> = shards.iter().flat_map(|s| s.iter().copied()).collect();
            prop_assert_eq!(&rebuilt, &list);

            let max = shards.iter().map(|s| s.len()).max().unwrap_or(0);
            let min = shards.iter().map(|s| s.len()).min().unwrap_or(0);
            prop_assert!(max - min <= 1);
        }
    }

    #[test]
    fn five_symbols_two_workers_end_to_end() {
        let fetcher = always_ok("10");
        let shared = SharedState::new();
        let list = symbols(&["A", "B", "C", "D", "E"]);

        let reports = Dispatcher::new(&fetcher, shared.clone(), 2, 10).run(&list).unwrap();

        let counts: Vec<u64> = reports.iter().map(|r| r.requests).collect();
        assert_eq!(counts, vec![3, 2]);
        assert!(reports.iter().all(|r| r.exit == WorkerExit::ShardExhausted));
        assert_eq!(shared.counters.aggregate(), 5);
        assert_eq!(shared.cache.len().unwrap(), 5);
    }

    #[test]
    fn empty_shards_report_zero() {
        let fetcher = always_ok("1");
        let shared = SharedState::new();
        let list = symbols(&["A", "B"]);

        let reports = Dispatcher::new(&fetcher, shared.clone(), 4, 10).run(&list).unwrap();

        assert_eq!(reports.len(), 4);
        assert_eq!(
            reports.iter().map(|r| r.requests).collect::<Vec<_>>(),
            vec![1, 1, 0, 0]
        );
        assert!(reports.iter().all(|r| r.exit == WorkerExit::ShardExhausted));
        assert_eq!(shared.counters.aggregate(), 2);
    }

    #[test]
    fn exhausted_worker_does_not_stop_others() {
        let fetcher = ScriptedFetcher::new(|symbol: &str| {
            if symbol.starts_with('X') {
                Err(transport_error())
            } else {
                Ok(price_body(symbol, "1"))
            }
        });
        let shared = SharedState::new();
        let mut list: Vec<String> = (0..4).map(|i| format!("X{}", i)).collect();
        list.push("AFTER".to_string());
        list.extend(symbols(&["A", "B", "C", "D", "E"]));

        let reports = Dispatcher::new(&fetcher, shared.clone(), 2, 2).run(&list).unwrap();

        assert_eq!(reports[0].exit, WorkerExit::RetryBudgetExhausted);
        assert_eq!(reports[0].requests, 0);
        assert_eq!(reports[1].exit, WorkerExit::ShardExhausted);
        assert_eq!(reports[1].requests, 5);
        assert!(!fetcher.calls().contains(&"AFTER".to_string()));
        assert_eq!(shared.counters.aggregate(), 5);
    }

    #[test]
    fn cancelled_run_starts_no_fetches() {
        let fetcher = always_ok("1");
        let shared = SharedState::new();
        shared.cancel.cancel();
        let list = symbols(&["A", "B", "C"]);

        let reports = Dispatcher::new(&fetcher, shared.clone(), 2, 10).run(&list).unwrap();

        assert!(fetcher.calls().is_empty());
        assert!(reports.iter().all(|r| r.exit == WorkerExit::Cancelled));
        assert_eq!(shared.counters.aggregate(), 0);
    }

    #[test]
    fn cancellation_mid_run_keeps_in_flight_result() {
        let shared = SharedState::new();
        let token = shared.cancel.clone();
        let fetcher = ScriptedFetcher::new(move |symbol: &str| {
            if symbol == "B" {
                token.cancel();
            }
            Ok(price_body(symbol, "5"))
        });
        let list = symbols(&["A", "B", "C", "D"]);

        let reports = Dispatcher::new(&fetcher, shared.clone(), 1, 10).run(&list).unwrap();

        assert_eq!(reports[0].exit, WorkerExit::Cancelled);
        assert_eq!(reports[0].requests, 2);
        assert_eq!(shared.cache.get("B").unwrap().as_deref(), Some("5"));
        assert_eq!(shared.cache.get("C").unwrap(), None);
    }

    #[test]
    fn panicking_worker_is_reported() {
        let fetcher = ScriptedFetcher::new(|symbol: &str| {
            if symbol == "BOOM" {
                panic!("fetcher blew up");
            }
            Ok(price_body(symbol, "1"))
        });
        let shared = SharedState::new();
        let list = symbols(&["A", "BOOM", "C", "D"]);

        let reports = Dispatcher::new(&fetcher, shared.clone(), 2, 10).run(&list).unwrap();

        assert_eq!(reports[0].exit, WorkerExit::Panicked);
        assert_eq!(reports[0].requests, 1);
        assert_eq!(reports[1].exit, WorkerExit::ShardExhausted);
        assert_eq!(reports[1].requests, 2);
    }

    #[test]
    fn panic_report_keeps_count_seen_so_far() {
        let fetcher = always_ok("1");
        let mut worker = Worker::new(3, 10, &fetcher, SharedState::new());
        let reader = worker.requests_reader();
        worker.run(&symbols(&["A", "B"]));

        assert_eq!(panicked(3, &reader), WorkerExit::Panicked);
        assert_eq!(reader.get(), 2);
    }

    #[test]
    fn unspawned_worker_is_reported_not_started() {
        let err = io::Error::other("out of threads");

        let report = not_started(1, &err);

        assert_eq!(
            report,
            WorkerReport {
                id: 1,
                requests: 0,
                exit: WorkerExit::NotStarted,
            }
        );
    }
}
