//! Shutdown triggers.
//!
//! `StopListener` reads a line-oriented stream (stdin in production), echoes each
//! line to the log and cancels the shared token when the stop word arrives. Ctrl+C
//! is wired to the same token through `install_interrupt_handler`.
use crate::model::cancellation::CancellationToken;
use log::{error, info};
use price_common::PollerError;
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

/// Listens for the stop word on a line-oriented input.
pub struct StopListener;

impl StopListener {
    /// Spawn a background thread listening on stdin.
    ///
    /// The thread is detached in practice: it blocks on stdin and simply dies with
    /// the process once the workers are done.
    pub fn start(
        stop_word: String,
        cancel: CancellationToken,
    ) -> Result<JoinHandle<()>, PollerError> {
        let handle = thread::Builder::new()
            .name("stop-listener".to_string())
            .spawn(move || {
                let stdin = io::stdin();
                match Self::listen(stdin.lock(), &stop_word, &cancel) {
                    Ok(true) => {}
                    Ok(false) => info!("stdin closed, stop word listener exiting"),
                    Err(e) => error!("error reading from stdin: {}", e),
                }
            })?;
        Ok(handle)
    }

    /// Consume `reader` until `stop_word` is seen (returns `true`) or input ends
    /// (returns `false`). The line must equal the stop word exactly; only a
    /// trailing carriage return is dropped.
    pub fn listen<R: BufRead>(
        reader: R,
        stop_word: &str,
        cancel: &CancellationToken,
    ) -> Result<bool, PollerError> {
        for line in reader.lines() {
            let line = line?;
            info!("{}", line);
            if line.trim_end_matches('\r') == stop_word {
                if cancel.cancel() {
                    info!("stop word received, workers will stop after their current request");
                }
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Cancel `cancel` on Ctrl+C.
pub fn install_interrupt_handler(cancel: CancellationToken) -> Result<(), PollerError> {
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down workers...");
        cancel.cancel();
    })
    .map_err(|e| PollerError::Io(io::Error::other(e)))
}
