//!
//! Common types and utilities for the price poller.
//!
//! This crate aggregates:
//! - `error` — unified error type `PollerError` used across the workspace.
//! - `result` — handy `Result<T, PollerError>` alias.
//! - `config` — YAML configuration model, loading and validation.
//! - `symbols` — symbol list parsing and normalization.
//! - `price` — `PriceRecord` decoded from endpoint responses.
//! - `net` — remote endpoint defaults.
#![warn(missing_docs)]
pub mod config;
pub mod error;
pub mod net;
pub mod price;
pub mod result;
pub mod symbols;

pub use config::PollerConfig;
pub use error::PollerError;
pub use price::PriceRecord;
pub use result::Result;
