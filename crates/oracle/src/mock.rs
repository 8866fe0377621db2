//! Mock feed for tests and demos
//!
//! Stores fixed prices that can be moved programmatically, including
//! backdated timestamps for staleness tests.

use chrono::{DateTime, Utc};
use stablebank_core::Asset;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::OracleError;
use crate::types::{PriceFeed, PriceRead};

/// Mock price feed with settable prices
pub struct MockFeed {
    /// Stored reads (asset -> latest read)
    prices: RwLock<HashMap<Asset, PriceRead>>,
}

impl MockFeed {
    /// Create an empty mock feed
    pub fn new() -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
        }
    }

    /// Create a mock feed with default prices for the two stock assets
    pub fn with_defaults() -> Self {
        let feed = Self::new();
        feed.set_price(Asset::weth(), 2_000_00000000); // $2000
        feed.set_price(Asset::wbtc(), 30_000_00000000); // $30000
        feed
    }

    /// Set a price stamped with the current time
    pub fn set_price(&self, asset: Asset, price: i64) {
        self.set_price_at(asset, price, Utc::now());
    }

    /// Set a price with an explicit update timestamp
    pub fn set_price_at(&self, asset: Asset, price: i64, updated_at: DateTime<Utc>) {
        let read = PriceRead {
            asset: asset.clone(),
            price,
            updated_at,
            source: "mock".to_string(),
        };
        let mut prices = self.prices.write().unwrap();
        prices.insert(asset, read);
    }

    /// Remove a price (for feed-not-found tests)
    pub fn remove_price(&self, asset: &Asset) {
        let mut prices = self.prices.write().unwrap();
        prices.remove(asset);
    }
}

impl Default for MockFeed {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl PriceFeed for MockFeed {
    fn latest_price(&self, asset: &Asset) -> Result<PriceRead, OracleError> {
        let prices = self.prices.read().unwrap();
        prices
            .get(asset)
            .cloned()
            .ok_or_else(|| OracleError::FeedNotFound {
                asset: asset.clone(),
            })
    }
}
