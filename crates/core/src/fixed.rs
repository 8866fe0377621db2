//! Protocol precision constants and widened integer math
//!
//! All quantities are integers in the smallest denomination: collateral and
//! pegged-token amounts carry 18 decimals, oracle prices carry 8. USD values
//! are 18-decimal fixed point. Products of two 18-decimal values overflow
//! `u128`, so multiplication/division is widened through `U256` and always
//! floors (rounds toward zero).

use primitive_types::U256;
use thiserror::Error;

/// 18-decimal fixed-point scale for amounts and USD values
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Oracle feeds report 8 decimals; this bridges them to 18
pub const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;

/// Native oracle price scale (8 decimals)
pub const FEED_PRECISION: u128 = 100_000_000;

/// Percent of collateral USD value counted toward the health factor.
/// 50% implies a 200% minimum collateralization ratio.
pub const LIQUIDATION_THRESHOLD: u128 = 50;

/// Denominator for the threshold and bonus percentages
pub const LIQUIDATION_PRECISION: u128 = 100;

/// Percent of the repaid value awarded to a liquidator on top of it
pub const LIQUIDATION_BONUS: u128 = 10;

/// Minimum healthy health factor (1.0 in 18-decimal fixed point)
pub const MIN_HEALTH_FACTOR: u128 = PRECISION;

/// Sentinel health factor for accounts with zero debt
pub const MAX_HEALTH_FACTOR: u128 = u128::MAX;

/// Errors that can occur in fixed-point arithmetic
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Compute `a * b / d` with a 256-bit intermediate, flooring the division.
pub fn mul_div(a: u128, b: u128, d: u128) -> Result<u128, MathError> {
    if d == 0 {
        return Err(MathError::DivisionByZero);
    }

    // 128-bit operands cannot overflow a 256-bit product.
    let quotient = (U256::from(a) * U256::from(b)) / U256::from(d);

    if quotient > U256::from(u128::MAX) {
        return Err(MathError::Overflow);
    }
    Ok(quotient.as_u128())
}

/// Compute `pct` percent of `value`, flooring.
pub fn pct_of(value: u128, pct: u128) -> Result<u128, MathError> {
    mul_div(value, pct, LIQUIDATION_PRECISION)
}
