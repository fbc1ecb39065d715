//! Remote endpoint defaults used when the configuration leaves them out.

/// Price ticker endpoint queried once per symbol.
pub const DEFAULT_SOURCE: &str = "https://api.binance.com/api/v3/ticker/price";
/// Query parameter carrying the symbol.
pub const SYMBOL_PARAM_KEY: &str = "symbol";
/// Per-request timeout enforced by the HTTP client, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Build a `key=value` query string for logging purposes.
pub fn query(key: &str, value: &str) -> String {
    format!("{}={}", key, value)
}
