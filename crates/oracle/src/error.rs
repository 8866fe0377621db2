//! Oracle error types

use stablebank_core::Asset;
use thiserror::Error;

/// Oracle-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// No feed knows this asset
    #[error("No price feed for asset {asset}")]
    FeedNotFound { asset: Asset },

    /// Price data is older than the staleness bound
    #[error("Stale price for {asset}: read is {age_secs}s old, bound is {max_age_secs}s")]
    StalePrice {
        asset: Asset,
        age_secs: i64,
        max_age_secs: i64,
    },

    /// Feed returned a non-positive price
    #[error("Invalid price for {asset}: {price}")]
    InvalidPrice { asset: Asset, price: i64 },
}
