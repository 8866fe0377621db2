//! Engine configuration

use stablebank_core::fixed::{
    LIQUIDATION_BONUS, LIQUIDATION_THRESHOLD, MIN_HEALTH_FACTOR, PRECISION,
};

/// Risk parameters for the engine
///
/// Defaults are the normative protocol values; tests exercise boundaries by
/// constructing variants.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Minimum healthy health factor, 18-decimal fixed point (1.0 = 1e18)
    pub min_health_factor: u128,
    /// Percent of collateral USD value counted toward the health factor
    pub liquidation_threshold_pct: u128,
    /// Percent bonus of seized collateral awarded to a liquidator
    pub liquidation_bonus_pct: u128,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_health_factor: MIN_HEALTH_FACTOR,
            liquidation_threshold_pct: LIQUIDATION_THRESHOLD,
            liquidation_bonus_pct: LIQUIDATION_BONUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_protocol_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.min_health_factor, PRECISION);
        assert_eq!(config.liquidation_threshold_pct, 50);
        assert_eq!(config.liquidation_bonus_pct, 10);
    }
}
