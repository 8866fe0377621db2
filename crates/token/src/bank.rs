//! Collateral custody bank
//!
//! Holds wallet balances of the exogenous collateral assets. The position
//! controller uses it with the standard custody contract: pull tokens from
//! the caller into its vault account on deposit, push them back out on
//! redeem. Transfers validate before mutating, so a failed call observes
//! no partial movement.

use std::collections::HashMap;

use stablebank_core::{AccountId, Asset};

use crate::error::CustodyError;

/// Per-(account, asset) wallet balances for collateral assets
#[derive(Debug, Default)]
pub struct CollateralBank {
    balances: HashMap<(AccountId, Asset), u128>,
}

impl CollateralBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Wallet balance of an account for an asset (zero if never touched)
    pub fn balance_of(&self, account: &AccountId, asset: &Asset) -> u128 {
        self.balances
            .get(&(account.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Credit tokens arriving from outside the system (faucet for tests/demos)
    pub fn deposit_external(
        &mut self,
        account: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let balance = self
            .balance_of(account, asset)
            .checked_add(amount)
            .ok_or_else(|| CustodyError::BalanceOverflow {
                asset: asset.clone(),
            })?;
        self.balances
            .insert((account.clone(), asset.clone()), balance);
        Ok(())
    }

    /// Move `amount` of `asset` between two accounts, atomically
    pub fn transfer(
        &mut self,
        asset: &Asset,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), CustodyError> {
        let available = self.balance_of(from, asset);
        if available < amount {
            return Err(CustodyError::InsufficientBalance {
                asset: asset.clone(),
                account: from.clone(),
                available,
                requested: amount,
            });
        }
        let receiving = self
            .balance_of(to, asset)
            .checked_add(amount)
            .ok_or_else(|| CustodyError::BalanceOverflow {
                asset: asset.clone(),
            })?;

        self.balances
            .insert((from.clone(), asset.clone()), available - amount);
        self.balances.insert((to.clone(), asset.clone()), receiving);
        Ok(())
    }
}
