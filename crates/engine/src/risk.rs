//! Risk engine - stateless computations over ledger snapshots
//!
//! USD valuation, health factor, and liquidation seizure math. Every
//! function reads prices fresh through the registry's feeds and mutates
//! nothing; the controller runs these over projected positions before
//! committing any ledger change.
//!
//! All conversions floor. `usd_value` and `quantity_from_usd` use the same
//! scaled price in opposite directions, so a round-trip is exact whenever
//! the product leaves no truncation remainder.

use std::collections::HashMap;

use stablebank_core::fixed::{
    mul_div, pct_of, ADDITIONAL_FEED_PRECISION, MAX_HEALTH_FACTOR, PRECISION,
};
use stablebank_core::{Asset, MathError};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::registry::AssetRegistry;

/// Collateral quantities owed to a liquidator for covering debt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seizure {
    /// USD-equivalent of the covered debt, in asset units
    pub base: u128,
    /// Liquidator bonus, in asset units
    pub bonus: u128,
}

impl Seizure {
    /// Total asset quantity to seize
    pub fn total(&self) -> Result<u128, MathError> {
        self.base.checked_add(self.bonus).ok_or(MathError::Overflow)
    }
}

/// Stateless risk computations parameterized by the engine config
pub struct RiskEngine {
    config: EngineConfig,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Latest price for an asset bridged to 18-decimal scale
    fn scaled_price(&self, registry: &AssetRegistry, asset: &Asset) -> Result<u128, EngineError> {
        let read = registry.feed(asset)?.latest_price(asset)?;
        // The staleness adapter rejects non-positive prices, so the cast holds.
        (read.price as u128)
            .checked_mul(ADDITIONAL_FEED_PRECISION)
            .ok_or_else(|| EngineError::Math(MathError::Overflow))
    }

    /// USD value (18 decimals) of `quantity` units of `asset`
    pub fn usd_value(
        &self,
        registry: &AssetRegistry,
        asset: &Asset,
        quantity: u128,
    ) -> Result<u128, EngineError> {
        let price = self.scaled_price(registry, asset)?;
        Ok(mul_div(price, quantity, PRECISION)?)
    }

    /// Asset quantity worth `usd` (18 decimals), flooring
    pub fn quantity_from_usd(
        &self,
        registry: &AssetRegistry,
        asset: &Asset,
        usd: u128,
    ) -> Result<u128, EngineError> {
        let price = self.scaled_price(registry, asset)?;
        Ok(mul_div(usd, PRECISION, price)?)
    }

    /// Total USD value of a collateral position.
    ///
    /// Iterates the registry's construction-order asset list; every feed is
    /// consulted, so one stale feed freezes all valuation.
    pub fn collateral_value(
        &self,
        registry: &AssetRegistry,
        position: &HashMap<Asset, u128>,
    ) -> Result<u128, EngineError> {
        let mut total: u128 = 0;
        for asset in registry.allowed_assets() {
            let quantity = position.get(asset).copied().unwrap_or(0);
            let value = self.usd_value(registry, asset, quantity)?;
            total = total
                .checked_add(value)
                .ok_or(EngineError::Math(MathError::Overflow))?;
        }
        Ok(total)
    }

    /// Health factor from a collateral USD value and a debt figure.
    ///
    /// `(collateral_usd * threshold% ) * 1e18 / debt`, or the max sentinel
    /// when the account has no debt.
    pub fn health_factor(&self, collateral_usd: u128, debt: u128) -> Result<u128, EngineError> {
        if debt == 0 {
            return Ok(MAX_HEALTH_FACTOR);
        }
        let adjusted = pct_of(collateral_usd, self.config.liquidation_threshold_pct)?;
        Ok(mul_div(adjusted, PRECISION, debt)?)
    }

    /// Whether a health factor is below the configured minimum
    pub fn is_unhealthy(&self, health_factor: u128) -> bool {
        health_factor < self.config.min_health_factor
    }

    /// Collateral owed for covering `debt_to_cover` of a position's debt:
    /// the USD-equivalent base plus the liquidator bonus, floored per stage.
    ///
    /// Not validated against the target's actual holdings; an over-draw
    /// surfaces when the seizure is applied to the ledger.
    pub fn liquidation_seizure(
        &self,
        registry: &AssetRegistry,
        asset: &Asset,
        debt_to_cover: u128,
    ) -> Result<Seizure, EngineError> {
        let base = self.quantity_from_usd(registry, asset, debt_to_cover)?;
        let bonus = pct_of(base, self.config.liquidation_bonus_pct)?;
        Ok(Seizure { base, bonus })
    }
}
