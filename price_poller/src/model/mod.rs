//! Shared state touched by the workers.
//!
//! - `cancellation` — one-way cancellation latch observed at symbol boundaries.
//! - `counters` — aggregate and per-worker successful request counters.
//! - `price_cache` — latest price per symbol with change detection.
//! - `shared` — bundle of the handles injected into every worker.

pub mod cancellation;
pub mod counters;
pub mod price_cache;
pub mod shared;
