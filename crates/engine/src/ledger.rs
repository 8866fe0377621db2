//! Position ledgers
//!
//! Per-user collateral and debt books. Accounts are created lazily on first
//! write with default-zero semantics and never removed, only drained. These
//! maps are the system's only durable state; the controller is their sole
//! mutator.

use std::collections::HashMap;

use stablebank_core::{AccountId, Asset};

use crate::error::LedgerError;

/// Per-(user, asset) deposited collateral quantities
#[derive(Debug, Default)]
pub struct CollateralLedger {
    accounts: HashMap<AccountId, HashMap<Asset, u128>>,
}

impl CollateralLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposited quantity for a user/asset (zero if never touched)
    pub fn balance(&self, user: &AccountId, asset: &Asset) -> u128 {
        self.accounts
            .get(user)
            .and_then(|held| held.get(asset))
            .copied()
            .unwrap_or(0)
    }

    /// Snapshot of a user's full position, for projection-based checks.
    ///
    /// Callers adjust the snapshot and value it without touching the ledger.
    pub fn position(&self, user: &AccountId) -> HashMap<Asset, u128> {
        self.accounts.get(user).cloned().unwrap_or_default()
    }

    /// Increase a user's deposited quantity
    pub fn credit(
        &mut self,
        user: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let balance = self
            .balance(user, asset)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.set(user, asset, balance);
        Ok(())
    }

    /// Decrease a user's deposited quantity
    pub fn debit(
        &mut self,
        user: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let available = self.balance(user, asset);
        if available < amount {
            return Err(LedgerError::InsufficientCollateral {
                asset: asset.clone(),
                available,
                requested: amount,
            });
        }
        self.set(user, asset, available - amount);
        Ok(())
    }

    fn set(&mut self, user: &AccountId, asset: &Asset, value: u128) {
        self.accounts
            .entry(user.clone())
            .or_default()
            .insert(asset.clone(), value);
    }

    /// All users that ever held collateral
    pub fn users(&self) -> impl Iterator<Item = &AccountId> {
        self.accounts.keys()
    }
}

/// Per-user minted pegged-token debt
#[derive(Debug, Default)]
pub struct DebtLedger {
    minted: HashMap<AccountId, u128>,
}

impl DebtLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minted debt for a user (zero if never touched)
    pub fn minted(&self, user: &AccountId) -> u128 {
        self.minted.get(user).copied().unwrap_or(0)
    }

    /// Increase a user's minted debt
    pub fn add(&mut self, user: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let total = self
            .minted(user)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow)?;
        self.set(user, total);
        Ok(())
    }

    /// Decrease a user's minted debt
    pub fn sub(&mut self, user: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let available = self.minted(user);
        if available < amount {
            return Err(LedgerError::InsufficientDebt {
                available,
                requested: amount,
            });
        }
        self.set(user, available - amount);
        Ok(())
    }

    fn set(&mut self, user: &AccountId, value: u128) {
        self.minted.insert(user.clone(), value);
    }

    /// Total minted debt across all users
    pub fn total(&self) -> u128 {
        self.minted.values().sum()
    }
}
