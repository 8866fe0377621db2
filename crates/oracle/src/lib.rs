//! Stablebank Price Oracle
//!
//! Provides USD price feeds for collateral valuation. The engine never talks
//! to a raw feed directly: every feed is wrapped in a [`StalenessAdapter`]
//! that rejects old or non-positive reads, freezing valuation-dependent
//! operations until fresh data arrives.

mod adapter;
mod error;
mod mock;
mod types;

pub use adapter::{StalenessAdapter, DEFAULT_MAX_AGE_SECS};
pub use error::OracleError;
pub use mock::MockFeed;
pub use types::{PriceFeed, PriceRead};
