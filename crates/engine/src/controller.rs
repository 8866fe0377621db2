//! Position controller - the public operation surface
//!
//! Every mutating operation follows the same shape: validate inputs, build
//! a projection of the post-call position, check the health invariant on the
//! projection, perform external collaborator calls (custody transfers, token
//! mint/burn), and only then commit ledger state. A failure at any stage
//! therefore leaves both ledgers untouched, which gives each call its
//! all-or-nothing contract without an undo log.
//!
//! A whole-call guard rejects re-entrant invocation: a collaborator called
//! mid-operation can never observe or trigger a second mutation against the
//! post-projection-but-pre-commit state.

use std::collections::HashMap;

use stablebank_core::{AccountId, Asset, MathError};
use stablebank_token::{CollateralBank, MintAuthority, PeggedToken};
use tracing::debug;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{EngineEvent, EventLog};
use crate::ledger::{CollateralLedger, DebtLedger};
use crate::registry::AssetRegistry;
use crate::risk::RiskEngine;

/// Orchestrates deposits, mints, redemptions, burns, and liquidations
pub struct PositionController {
    registry: AssetRegistry,
    risk: RiskEngine,
    collateral: CollateralLedger,
    debt: DebtLedger,
    token: PeggedToken,
    authority: MintAuthority,
    bank: CollateralBank,
    events: EventLog,
    custody: AccountId,
    in_call: bool,
}

impl PositionController {
    /// Build a controller around a registry and a pre-funded custody bank.
    ///
    /// The pegged token is created here so the controller holds the one
    /// mint authority.
    pub fn new(registry: AssetRegistry, config: EngineConfig, bank: CollateralBank) -> Self {
        let (token, authority) = PeggedToken::new();
        Self {
            registry,
            risk: RiskEngine::new(config),
            collateral: CollateralLedger::new(),
            debt: DebtLedger::new(),
            token,
            authority,
            bank,
            events: EventLog::new(),
            custody: AccountId::new("VAULT").expect("static identifier"),
            in_call: false,
        }
    }

    // === Reads (never mutate) ===

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn token(&self) -> &PeggedToken {
        &self.token
    }

    pub fn bank(&self) -> &CollateralBank {
        &self.bank
    }

    /// Mutable bank access: the faucet surface for tests and demos
    pub fn bank_mut(&mut self) -> &mut CollateralBank {
        &mut self.bank
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Deposited collateral for a user/asset
    pub fn collateral_balance(&self, user: &AccountId, asset: &Asset) -> u128 {
        self.collateral.balance(user, asset)
    }

    /// Minted debt for a user
    pub fn debt_of(&self, user: &AccountId) -> u128 {
        self.debt.minted(user)
    }

    /// Total minted debt across all users
    pub fn total_debt(&self) -> u128 {
        self.debt.total()
    }

    /// Total USD value of a user's deposited collateral, at current prices
    pub fn account_collateral_value(&self, user: &AccountId) -> Result<u128, EngineError> {
        self.risk
            .collateral_value(&self.registry, &self.collateral.position(user))
    }

    /// Current health factor for a user
    pub fn health_factor_of(&self, user: &AccountId) -> Result<u128, EngineError> {
        let value = self.account_collateral_value(user)?;
        self.risk.health_factor(value, self.debt.minted(user))
    }

    /// (minted debt, collateral USD value) for a user
    pub fn account_information(&self, user: &AccountId) -> Result<(u128, u128), EngineError> {
        Ok((
            self.debt.minted(user),
            self.account_collateral_value(user)?,
        ))
    }

    // === Mutating operations ===

    /// Deposit `amount` of `asset` as collateral for `caller`
    pub fn deposit_collateral(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.with_guard(|c| c.deposit_inner(caller, asset, amount))
    }

    /// Mint `amount` of pegged-token debt for `caller`
    pub fn mint_debt(&mut self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        self.with_guard(|c| c.mint_inner(caller, amount))
    }

    /// Withdraw `amount` of `asset` collateral back to `caller`'s wallet
    pub fn redeem_collateral(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<(), EngineError> {
        self.with_guard(|c| c.redeem_inner(caller, asset, amount))
    }

    /// Repay `amount` of `caller`'s debt with tokens from their wallet
    pub fn burn_debt(&mut self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        self.with_guard(|c| c.burn_inner(caller, amount))
    }

    /// Deposit collateral and mint debt in one atomic call
    pub fn deposit_and_mint(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        collateral_amount: u128,
        mint_amount: u128,
    ) -> Result<(), EngineError> {
        self.with_guard(|c| {
            require_positive(collateral_amount)?;
            require_positive(mint_amount)?;
            c.require_allowed(asset)?;

            // Project both legs before touching anything: the mint's health
            // check must see the post-deposit collateral.
            let mut position = c.collateral.position(caller);
            let deposited = checked_add(c.collateral.balance(caller, asset), collateral_amount)?;
            position.insert(asset.clone(), deposited);
            let projected_debt = checked_add(c.debt.minted(caller), mint_amount)?;
            c.check_health(&position, projected_debt)?;

            c.bank
                .transfer(asset, caller, &c.custody, collateral_amount)?;
            if let Err(err) = c.token.mint(&c.authority, caller, mint_amount) {
                // Undo the pull so the failed call observes no transfer.
                c.bank
                    .transfer(asset, &c.custody, caller, collateral_amount)?;
                return Err(err.into());
            }

            c.collateral.credit(caller, asset, collateral_amount)?;
            c.debt.add(caller, mint_amount)?;
            c.events.record(EngineEvent::CollateralDeposited {
                user: caller.clone(),
                asset: asset.clone(),
                amount: collateral_amount,
            });
            debug!(user = %caller, %asset, collateral_amount, mint_amount, "deposit and mint");
            Ok(())
        })
    }

    /// Burn debt and withdraw collateral in one atomic call.
    ///
    /// Burns first so the redeem's health check runs against post-burn debt.
    pub fn redeem_and_burn(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        collateral_amount: u128,
        burn_amount: u128,
    ) -> Result<(), EngineError> {
        self.with_guard(|c| {
            require_positive(collateral_amount)?;
            require_positive(burn_amount)?;

            let debt = c.debt.minted(caller);
            if debt < burn_amount {
                return Err(EngineError::NotEnoughDebt {
                    available: debt,
                    requested: burn_amount,
                });
            }
            let held = c.collateral.balance(caller, asset);
            if held < collateral_amount {
                return Err(EngineError::NotEnoughCollateral {
                    asset: asset.clone(),
                    available: held,
                    requested: collateral_amount,
                });
            }

            let mut position = c.collateral.position(caller);
            position.insert(asset.clone(), held - collateral_amount);
            let projected_debt = debt - burn_amount;
            c.check_health(&position, projected_debt)?;

            c.token.transfer(caller, &c.custody, burn_amount)?;
            c.token.burn(&c.authority, &c.custody, burn_amount)?;
            c.bank
                .transfer(asset, &c.custody, caller, collateral_amount)?;

            c.debt.sub(caller, burn_amount)?;
            c.collateral.debit(caller, asset, collateral_amount)?;
            c.events.record(EngineEvent::CollateralRedeemed {
                from: caller.clone(),
                to: caller.clone(),
                asset: asset.clone(),
                amount: collateral_amount,
            });
            debug!(user = %caller, %asset, collateral_amount, burn_amount, "redeem and burn");
            Ok(())
        })
    }

    /// Cover `debt_to_cover` of an unhealthy target's debt in exchange for
    /// the USD-equivalent collateral plus the liquidation bonus.
    pub fn liquidate(
        &mut self,
        liquidator: &AccountId,
        asset: &Asset,
        target: &AccountId,
        debt_to_cover: u128,
    ) -> Result<(), EngineError> {
        self.with_guard(|c| {
            require_positive(debt_to_cover)?;
            c.require_allowed(asset)?;

            let target_position = c.collateral.position(target);
            let target_value = c.risk.collateral_value(&c.registry, &target_position)?;
            let target_debt = c.debt.minted(target);
            let hf_before = c.risk.health_factor(target_value, target_debt)?;
            if !c.risk.is_unhealthy(hf_before) {
                return Err(EngineError::HealthFactorOk);
            }

            if target_debt < debt_to_cover {
                return Err(EngineError::NotEnoughDebt {
                    available: target_debt,
                    requested: debt_to_cover,
                });
            }

            let seizure = c.risk.liquidation_seizure(&c.registry, asset, debt_to_cover)?;
            let seized = seizure.total()?;
            let held = c.collateral.balance(target, asset);
            if held < seized {
                return Err(EngineError::NotEnoughCollateral {
                    asset: asset.clone(),
                    available: held,
                    requested: seized,
                });
            }

            // Project the target's post-liquidation position: the call must
            // strictly improve their health factor or abort.
            let mut projected = target_position;
            projected.insert(asset.clone(), held - seized);
            let projected_value = c.risk.collateral_value(&c.registry, &projected)?;
            let projected_debt = target_debt - debt_to_cover;
            let hf_after = c.risk.health_factor(projected_value, projected_debt)?;
            if hf_after <= hf_before {
                return Err(EngineError::HealthFactorNotImproved {
                    before: hf_before,
                    after: hf_after,
                });
            }

            // The liquidator's own post-call position must not be unhealthy.
            // Only a self-cover changes it, in which case it is the target's
            // projected state; clearing one's whole debt is always acceptable.
            let (liq_value, liq_debt) = if liquidator == target {
                (projected_value, projected_debt)
            } else {
                let value = c
                    .risk
                    .collateral_value(&c.registry, &c.collateral.position(liquidator))?;
                (value, c.debt.minted(liquidator))
            };
            let liq_hf = c.risk.health_factor(liq_value, liq_debt)?;
            if c.risk.is_unhealthy(liq_hf) {
                return Err(EngineError::BreaksHealthFactor {
                    health_factor: liq_hf,
                });
            }

            // Collaborator calls: pull the repayment from the liquidator,
            // retire it, hand the seized collateral out of custody.
            c.token
                .transfer(liquidator, &c.custody, debt_to_cover)?;
            c.token.burn(&c.authority, &c.custody, debt_to_cover)?;
            c.bank.transfer(asset, &c.custody, liquidator, seized)?;

            c.collateral.debit(target, asset, seized)?;
            c.debt.sub(target, debt_to_cover)?;
            c.events.record(EngineEvent::CollateralRedeemed {
                from: target.clone(),
                to: liquidator.clone(),
                asset: asset.clone(),
                amount: seized,
            });
            debug!(
                %liquidator, %target, %asset, debt_to_cover, seized,
                hf_before, hf_after, "liquidation"
            );
            Ok(())
        })
    }

    // === Internals ===

    /// Run `f` under the whole-call reentrancy guard
    fn with_guard<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        if self.in_call {
            return Err(EngineError::ReentrantCall);
        }
        self.in_call = true;
        let result = f(self);
        self.in_call = false;
        result
    }

    fn require_allowed(&self, asset: &Asset) -> Result<(), EngineError> {
        if !self.registry.is_allowed(asset) {
            return Err(EngineError::NotAllowedCollateral {
                asset: asset.clone(),
            });
        }
        Ok(())
    }

    /// Health check over a projected position; carries the offending value
    fn check_health(
        &self,
        position: &HashMap<Asset, u128>,
        debt: u128,
    ) -> Result<(), EngineError> {
        let value = self.risk.collateral_value(&self.registry, position)?;
        let hf = self.risk.health_factor(value, debt)?;
        if self.risk.is_unhealthy(hf) {
            return Err(EngineError::BreaksHealthFactor { health_factor: hf });
        }
        Ok(())
    }

    fn deposit_inner(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<(), EngineError> {
        require_positive(amount)?;
        self.require_allowed(asset)?;

        // Overflow is ruled out before the custody pull so the credit below
        // cannot fail after funds have moved.
        checked_add(self.collateral.balance(caller, asset), amount)?;
        self.bank
            .transfer(asset, caller, &self.custody, amount)?;

        self.collateral.credit(caller, asset, amount)?;
        self.events.record(EngineEvent::CollateralDeposited {
            user: caller.clone(),
            asset: asset.clone(),
            amount,
        });
        debug!(user = %caller, %asset, amount, "deposit");
        Ok(())
    }

    fn mint_inner(&mut self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        require_positive(amount)?;

        let projected_debt = checked_add(self.debt.minted(caller), amount)?;
        self.check_health(&self.collateral.position(caller), projected_debt)?;

        self.token.mint(&self.authority, caller, amount)?;
        self.debt.add(caller, amount)?;
        debug!(user = %caller, amount, "mint debt");
        Ok(())
    }

    fn redeem_inner(
        &mut self,
        caller: &AccountId,
        asset: &Asset,
        amount: u128,
    ) -> Result<(), EngineError> {
        require_positive(amount)?;

        let held = self.collateral.balance(caller, asset);
        if held < amount {
            return Err(EngineError::NotEnoughCollateral {
                asset: asset.clone(),
                available: held,
                requested: amount,
            });
        }

        let mut position = self.collateral.position(caller);
        position.insert(asset.clone(), held - amount);
        self.check_health(&position, self.debt.minted(caller))?;

        self.bank
            .transfer(asset, &self.custody, caller, amount)?;

        self.collateral.debit(caller, asset, amount)?;
        self.events.record(EngineEvent::CollateralRedeemed {
            from: caller.clone(),
            to: caller.clone(),
            asset: asset.clone(),
            amount,
        });
        debug!(user = %caller, %asset, amount, "redeem");
        Ok(())
    }

    fn burn_inner(&mut self, caller: &AccountId, amount: u128) -> Result<(), EngineError> {
        require_positive(amount)?;

        let debt = self.debt.minted(caller);
        if debt < amount {
            return Err(EngineError::NotEnoughDebt {
                available: debt,
                requested: amount,
            });
        }

        // Only the holder of record may burn: pull into custody first.
        self.token.transfer(caller, &self.custody, amount)?;
        self.token.burn(&self.authority, &self.custody, amount)?;

        self.debt.sub(caller, amount)?;
        debug!(user = %caller, amount, "burn debt");
        Ok(())
    }
}

fn require_positive(amount: u128) -> Result<(), EngineError> {
    if amount == 0 {
        return Err(EngineError::RequiresMoreThanZero);
    }
    Ok(())
}

fn checked_add(a: u128, b: u128) -> Result<u128, EngineError> {
    a.checked_add(b)
        .ok_or(EngineError::Math(MathError::Overflow))
}
