//! Price payload returned by the quote endpoint.
//!
//! The endpoint answers a single-symbol query with a JSON object such as
//! `{"symbol":"BTCUSDT","price":"64000.01000000"}`. Prices stay strings: they are
//! cached and compared verbatim, never used in arithmetic.
use serde::Deserialize;

use crate::error::PollerError;

/// Latest price for one symbol, decoded from a fetch response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceRecord {
    /// Symbol identifier as echoed by the endpoint.
    pub symbol: String,
    /// Last price, kept in the endpoint's textual form.
    pub price: String,
}

impl PriceRecord {
    /// Decode a record from raw response bytes.
    ///
    /// Both `symbol` and `price` must be present and be strings; any other shape
    /// is reported as `PollerError::SerdeJson`.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, PollerError> {
        let record = serde_json::from_slice(bytes)?;
        Ok(record)
    }
}
