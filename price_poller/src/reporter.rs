//! Periodic aggregate request report.
//!
//! The reporter thread multiplexes a `crossbeam_channel::tick` with a stop channel:
//! every tick logs the aggregate counter, a message (or a dropped sender) on the
//! stop channel ends the loop.
use crate::model::counters::RequestCounters;
use crossbeam_channel::{Sender, bounded, select, tick};
use log::info;
use price_common::PollerError;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a running reporter thread.
pub struct Reporter {
    stop_tx: Sender<()>,
    handle: JoinHandle<u64>,
}

impl Reporter {
    /// Start logging `counters.aggregate()` every `interval`.
    pub fn start(counters: Arc<RequestCounters>, interval: Duration) -> Result<Self, PollerError> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let handle = thread::Builder::new()
            .name("reporter".to_string())
            .spawn(move || {
                let ticker = tick(interval);
                let mut ticks = 0u64;
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            ticks += 1;
                            info!("workers requests total: {}", counters.aggregate());
                        },
                        recv(stop_rx) -> _ => break,
                    }
                }
                ticks
            })?;
        Ok(Self { stop_tx, handle })
    }

    /// Stop the reporter and return how many reports it emitted.
    pub fn stop(self) -> Result<u64, PollerError> {
        self.stop_tx
            .send(())
            .map_err(|e| PollerError::ChannelSend(format!("reporter stop: {}", e)))?;
        self.handle
            .join()
            .map_err(|_| PollerError::Thread("reporter thread panicked".to_string()))
    }
}
