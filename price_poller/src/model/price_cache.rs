//! Latest-price cache.
//!
//! A single `RwLock` guards the whole map, so a reader sees either the previous or
//! the new price of a symbol, never a partial write. Entries are never evicted; the
//! map is bounded by the number of distinct symbols being polled.
use price_common::PollerError;
use std::collections::HashMap;
use std::sync::RwLock;

/// Symbol → latest price string.
#[derive(Debug, Default)]
pub struct PriceCache {
    prices: RwLock<HashMap<String, String>>,
}

impl PriceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `price` for `symbol`.
    ///
    /// Returns `true` only when the symbol was already cached with a different
    /// price. A first insertion, or a repeat of the same price, is not a change.
    pub fn upsert(&self, symbol: &str, price: &str) -> Result<bool, PollerError> {
        let mut prices = self.prices.write()?;
        let changed = match prices.get_mut(symbol) {
            Some(previous) if previous.as_str() == price => false,
            Some(previous) => {
                *previous = price.to_string();
                true
            }
            None => {
                prices.insert(symbol.to_string(), price.to_string());
                false
            }
        };
        Ok(changed)
    }

    /// Latest price for `symbol`, if any.
    pub fn get(&self, symbol: &str) -> Result<Option<String>, PollerError> {
        Ok(self.prices.read()?.get(symbol).cloned())
    }

    /// Number of distinct symbols cached.
    pub fn len(&self) -> Result<usize, PollerError> {
        Ok(self.prices.read()?.len())
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> Result<bool, PollerError> {
        Ok(self.prices.read()?.is_empty())
    }

    /// Copy of every entry, sorted by symbol.
    pub fn snapshot(&self) -> Result<Vec<(String, String)>, PollerError> {
        let mut entries: Vec<(String, String)> = self
            .prices
            .read()?
            .iter()
            .map(|(symbol, price)| (symbol.clone(), price.clone()))
            .collect();
        entries.sort();
        Ok(entries)
    }
}
