//! Engine error types
//!
//! Three tiers per the error design: input validation (rejected before any
//! mutation), invariant violations (carry the offending computed value),
//! and collaborator failures (propagated unmodified via `#[from]`). Every
//! error aborts the whole call; there is no retry path.

use stablebank_core::{Asset, MathError};
use stablebank_oracle::OracleError;
use stablebank_token::{CustodyError, TokenError};
use thiserror::Error;

/// Errors from asset registry construction and lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Asset and feed lists differ in length: {assets} assets, {feeds} feeds")]
    ArrayLengthMismatch { assets: usize, feeds: usize },

    #[error("Asset registered twice: {asset}")]
    DuplicateAsset { asset: Asset },

    #[error("Asset not allowed as collateral: {asset}")]
    NotAllowed { asset: Asset },
}

/// Errors from the two position ledgers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient {asset} collateral: available {available}, requested {requested}")]
    InsufficientCollateral {
        asset: Asset,
        available: u128,
        requested: u128,
    },

    #[error("Insufficient minted debt: available {available}, requested {requested}")]
    InsufficientDebt { available: u128, requested: u128 },

    #[error("Ledger balance overflow")]
    BalanceOverflow,
}

/// Errors surfaced by the position controller
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Amount must be greater than zero")]
    RequiresMoreThanZero,

    #[error("Asset not allowed as collateral: {asset}")]
    NotAllowedCollateral { asset: Asset },

    #[error("Operation breaks health factor: {health_factor}")]
    BreaksHealthFactor { health_factor: u128 },

    #[error("Insufficient {asset} collateral: available {available}, requested {requested}")]
    NotEnoughCollateral {
        asset: Asset,
        available: u128,
        requested: u128,
    },

    #[error("Insufficient minted debt: available {available}, requested {requested}")]
    NotEnoughDebt { available: u128, requested: u128 },

    #[error("Target account is healthy; nothing to liquidate")]
    HealthFactorOk,

    #[error("Liquidation did not improve target health factor: before {before}, after {after}")]
    HealthFactorNotImproved { before: u128, after: u128 },

    #[error("Re-entrant call rejected")]
    ReentrantCall,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Custody(#[from] CustodyError),

    #[error(transparent)]
    Math(#[from] MathError),
}
