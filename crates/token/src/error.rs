//! Token and custody error types

use stablebank_core::{AccountId, Asset};
use thiserror::Error;

/// Errors from the pegged token ledger
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Cannot mint to the zero identity")]
    ZeroAddressMint,

    #[error("Insufficient token balance for {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        account: AccountId,
        available: u128,
        requested: u128,
    },

    #[error("Token supply overflow")]
    SupplyOverflow,
}

/// Errors from the collateral custody bank
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("Insufficient {asset} balance for {account}: available {available}, requested {requested}")]
    InsufficientBalance {
        asset: Asset,
        account: AccountId,
        available: u128,
        requested: u128,
    },

    #[error("Custody balance overflow for {asset}")]
    BalanceOverflow { asset: Asset },
}
