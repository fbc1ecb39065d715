//! Handles shared by every worker of one dispatcher run.
use std::sync::Arc;

use crate::model::cancellation::CancellationToken;
use crate::model::counters::RequestCounters;
use crate::model::price_cache::PriceCache;

/// Cache, aggregate counter and cancellation token, cloned into each worker.
#[derive(Debug, Clone, Default)]
pub struct SharedState {
    /// Latest price per symbol.
    pub cache: Arc<PriceCache>,
    /// Aggregate successful request counter.
    pub counters: Arc<RequestCounters>,
    /// Stop signal checked before each symbol.
    pub cancel: CancellationToken,
}

impl SharedState {
    /// Fresh, empty state with an active token.
    pub fn new() -> Self {
        Self::default()
    }
}
