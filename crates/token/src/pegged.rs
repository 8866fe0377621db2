//! The pegged token: a fungible ledger with authority-gated supply
//!
//! "Only the controller may mint or burn" is modeled as a capability, not
//! inheritance: [`PeggedToken::new`] returns the [`MintAuthority`] exactly
//! once, and every supply-changing call demands a reference to it. The
//! authority is deliberately not `Clone`.

use std::collections::HashMap;

use stablebank_core::AccountId;

use crate::error::TokenError;

/// Capability to mint and burn the pegged token.
///
/// Cannot be constructed outside this module and cannot be cloned.
#[derive(Debug)]
pub struct MintAuthority {
    _priv: (),
}

/// Fungible balance ledger for the pegged token
#[derive(Debug, Default)]
pub struct PeggedToken {
    balances: HashMap<AccountId, u128>,
    total_supply: u128,
}

impl PeggedToken {
    /// Create an empty token ledger and its one mint authority
    pub fn new() -> (Self, MintAuthority) {
        (Self::default(), MintAuthority { _priv: () })
    }

    /// Balance of an account (zero if never touched)
    pub fn balance_of(&self, who: &AccountId) -> u128 {
        self.balances.get(who).copied().unwrap_or(0)
    }

    /// Total minted supply
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Mint `amount` to `to`. Requires the mint authority.
    ///
    /// Fails closed on zero amounts and the reserved zero identity.
    pub fn mint(
        &mut self,
        _auth: &MintAuthority,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        if to.is_zero() {
            return Err(TokenError::ZeroAddressMint);
        }

        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.total_supply = supply;
        self.balances.insert(to.clone(), balance);
        Ok(())
    }

    /// Burn `amount` from `from`'s balance. Requires the mint authority.
    ///
    /// Only the holder of record may burn, so the controller first pulls
    /// tokens into its own custody account and burns from there.
    pub fn burn(
        &mut self,
        _auth: &MintAuthority,
        from: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }

        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: from.clone(),
                available,
                requested: amount,
            });
        }

        self.balances.insert(from.clone(), available - amount);
        self.total_supply -= amount;
        Ok(())
    }

    /// Move `amount` from one holder to another.
    ///
    /// Atomic: validates before any mutation.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TokenError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: from.clone(),
                available,
                requested: amount,
            });
        }
        let receiving = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;

        self.balances.insert(from.clone(), available - amount);
        self.balances.insert(to.clone(), receiving);
        Ok(())
    }
}
