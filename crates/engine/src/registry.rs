//! Asset registry - immutable collateral wiring
//!
//! Maps each allowed collateral asset to its price feed and keeps the
//! construction-order list used for aggregate valuation iteration. The set
//! is fixed at construction; there is no add/remove API.

use std::collections::HashMap;
use std::sync::Arc;

use stablebank_core::Asset;
use stablebank_oracle::PriceFeed;

use crate::error::RegistryError;

/// Immutable mapping of allowed collateral assets to price feeds
pub struct AssetRegistry {
    assets: Vec<Asset>,
    feeds: HashMap<Asset, Arc<dyn PriceFeed>>,
}

impl AssetRegistry {
    /// Build a registry from two equal-length parallel lists.
    ///
    /// Duplicate assets are rejected: a silent overwrite would leave the
    /// asset twice in the iteration list and double-count its value in
    /// aggregate valuation.
    pub fn new(
        assets: Vec<Asset>,
        feeds: Vec<Arc<dyn PriceFeed>>,
    ) -> Result<Self, RegistryError> {
        if assets.len() != feeds.len() {
            return Err(RegistryError::ArrayLengthMismatch {
                assets: assets.len(),
                feeds: feeds.len(),
            });
        }

        let mut by_asset: HashMap<Asset, Arc<dyn PriceFeed>> = HashMap::new();
        for (asset, feed) in assets.iter().zip(feeds) {
            if by_asset.insert(asset.clone(), feed).is_some() {
                return Err(RegistryError::DuplicateAsset {
                    asset: asset.clone(),
                });
            }
        }

        Ok(Self {
            assets,
            feeds: by_asset,
        })
    }

    /// True iff the asset has a registered price feed
    pub fn is_allowed(&self, asset: &Asset) -> bool {
        self.feeds.contains_key(asset)
    }

    /// Allowed assets in construction order
    pub fn allowed_assets(&self) -> &[Asset] {
        &self.assets
    }

    /// The price feed for an asset
    pub fn feed(&self, asset: &Asset) -> Result<&Arc<dyn PriceFeed>, RegistryError> {
        self.feeds.get(asset).ok_or_else(|| RegistryError::NotAllowed {
            asset: asset.clone(),
        })
    }
}
