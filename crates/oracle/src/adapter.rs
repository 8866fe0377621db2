//! Staleness adapter - the fail-closed gate in front of every feed
//!
//! The engine consumes prices only through this adapter. A read older than
//! the bound, or with a non-positive price, is a hard failure that aborts
//! the calling operation, so the whole system freezes on bad price data
//! rather than valuing collateral against it.

use chrono::Utc;
use stablebank_core::Asset;
use std::sync::Arc;

use crate::error::OracleError;
use crate::types::{PriceFeed, PriceRead};

/// Default staleness bound: 3 hours
pub const DEFAULT_MAX_AGE_SECS: i64 = 3 * 60 * 60;

/// Wraps a feed with a staleness bound and basic price validation
pub struct StalenessAdapter {
    inner: Arc<dyn PriceFeed>,
    max_age_secs: i64,
}

impl StalenessAdapter {
    /// Wrap a feed with an explicit staleness bound in seconds
    pub fn new(inner: Arc<dyn PriceFeed>, max_age_secs: i64) -> Self {
        Self {
            inner,
            max_age_secs,
        }
    }

    /// Wrap a feed with the default 3-hour bound
    pub fn with_default_timeout(inner: Arc<dyn PriceFeed>) -> Self {
        Self::new(inner, DEFAULT_MAX_AGE_SECS)
    }

    /// The configured staleness bound in seconds
    pub fn max_age_secs(&self) -> i64 {
        self.max_age_secs
    }
}

impl PriceFeed for StalenessAdapter {
    fn latest_price(&self, asset: &Asset) -> Result<PriceRead, OracleError> {
        let read = self.inner.latest_price(asset)?;

        let age_secs = read.age(Utc::now()).num_seconds();
        if age_secs > self.max_age_secs {
            return Err(OracleError::StalePrice {
                asset: asset.clone(),
                age_secs,
                max_age_secs: self.max_age_secs,
            });
        }

        if read.price <= 0 {
            return Err(OracleError::InvalidPrice {
                asset: asset.clone(),
                price: read.price,
            });
        }

        Ok(read)
    }
}
