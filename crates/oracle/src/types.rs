//! Core oracle types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use stablebank_core::Asset;

use crate::OracleError;

/// A USD price read for one asset.
///
/// Prices carry 8 decimals (the native feed scale); the risk engine bridges
/// them to 18-decimal accounting precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRead {
    /// The priced asset
    pub asset: Asset,
    /// USD price, 8 decimals (e.g. $2000.00 is 200_000_000_000)
    pub price: i64,
    /// When the feed last updated this price
    pub updated_at: DateTime<Utc>,
    /// Source of the read (e.g. "mock", "chainlink")
    pub source: String,
}

impl PriceRead {
    /// Create a read stamped with the current time
    pub fn new(asset: Asset, price: i64) -> Self {
        Self {
            asset,
            price,
            updated_at: Utc::now(),
            source: "unknown".to_string(),
        }
    }

    /// Age of the read relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.updated_at)
    }

    /// Check if the read is older than `max_age_secs`
    pub fn is_stale(&self, max_age_secs: i64) -> bool {
        self.age(Utc::now()).num_seconds() > max_age_secs
    }
}

/// Price feed trait - interface for USD price sources
///
/// Implementations can be:
/// - MockFeed: fixed, settable prices for tests and demos
/// - An adapter over an external feed (Chainlink-style aggregator, exchange API)
///
/// Feeds are consulted fresh on every valuation; reads are never cached.
pub trait PriceFeed: Send + Sync {
    /// Get the latest USD price for an asset
    fn latest_price(&self, asset: &Asset) -> Result<PriceRead, OracleError>;
}
