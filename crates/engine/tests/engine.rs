//! Integration tests for the position controller
//!
//! These drive the full flow: registry wiring, custody pulls/pushes, token
//! mint/burn, health-factor gating, and the liquidation math.

use std::sync::Arc;

use stablebank_core::fixed::{MAX_HEALTH_FACTOR, MIN_HEALTH_FACTOR, PRECISION};
use stablebank_core::{AccountId, Asset};
use stablebank_engine::{
    AssetRegistry, EngineConfig, EngineError, EngineEvent, PositionController,
};
use stablebank_oracle::{MockFeed, OracleError, PriceFeed, StalenessAdapter};
use stablebank_token::CollateralBank;

const WETH_USD: i64 = 2_000_00000000; // $2000, 8 decimals
const WBTC_USD: i64 = 30_000_00000000; // $30000
const ONE: u128 = PRECISION;

fn acct(s: &str) -> AccountId {
    s.parse().unwrap()
}

/// Engine over WETH/WBTC sharing one mock feed; wallets pre-funded
fn setup() -> (Arc<MockFeed>, PositionController) {
    let feed = Arc::new(MockFeed::new());
    feed.set_price(Asset::weth(), WETH_USD);
    feed.set_price(Asset::wbtc(), WBTC_USD);

    let weth: Arc<dyn PriceFeed> = Arc::new(StalenessAdapter::with_default_timeout(feed.clone()));
    let wbtc: Arc<dyn PriceFeed> = Arc::new(StalenessAdapter::with_default_timeout(feed.clone()));
    let registry =
        AssetRegistry::new(vec![Asset::weth(), Asset::wbtc()], vec![weth, wbtc]).unwrap();

    let mut bank = CollateralBank::new();
    for user in ["alice", "bob", "liquidator"] {
        bank.deposit_external(&acct(user), &Asset::weth(), 1_000 * ONE)
            .unwrap();
        bank.deposit_external(&acct(user), &Asset::wbtc(), 1_000 * ONE)
            .unwrap();
    }

    (
        feed,
        PositionController::new(registry, EngineConfig::default(), bank),
    )
}

#[test]
fn test_deposit_moves_tokens_into_custody() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();

    assert_eq!(engine.collateral_balance(&alice, &Asset::weth()), ONE);
    assert_eq!(
        engine.bank().balance_of(&alice, &Asset::weth()),
        999 * ONE
    );
    assert_eq!(engine.events().len(), 1);
}

#[test]
fn test_collateral_valuation() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    // 1 WETH at $2000
    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();
    assert_eq!(
        engine.account_collateral_value(&alice).unwrap(),
        2_000 * ONE
    );

    // plus 1 WBTC at $30000
    engine
        .deposit_collateral(&alice, &Asset::wbtc(), ONE)
        .unwrap();
    assert_eq!(
        engine.account_collateral_value(&alice).unwrap(),
        32_000 * ONE
    );
}

#[test]
fn test_mint_to_exact_boundary_then_one_more_unit_fails() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    // $2000 collateral supports exactly 1000 units of debt
    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();
    engine.mint_debt(&alice, 1_000 * ONE).unwrap();

    assert_eq!(engine.health_factor_of(&alice).unwrap(), MIN_HEALTH_FACTOR);
    assert_eq!(engine.token().balance_of(&alice), 1_000 * ONE);

    let result = engine.mint_debt(&alice, 1);
    assert!(matches!(
        result,
        Err(EngineError::BreaksHealthFactor { health_factor }) if health_factor < MIN_HEALTH_FACTOR
    ));
    // nothing mutated by the failed mint
    assert_eq!(engine.debt_of(&alice), 1_000 * ONE);
    assert_eq!(engine.token().balance_of(&alice), 1_000 * ONE);
}

#[test]
fn test_health_factor_max_with_no_debt() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");
    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();
    assert_eq!(engine.health_factor_of(&alice).unwrap(), MAX_HEALTH_FACTOR);
}

#[test]
fn test_redeem_to_boundary_then_further_breaks() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();
    engine.mint_debt(&alice, 500 * ONE).unwrap();

    // half a WETH leaves exactly $1000 of collateral against 500 debt
    engine
        .redeem_collateral(&alice, &Asset::weth(), ONE / 2)
        .unwrap();
    assert_eq!(engine.health_factor_of(&alice).unwrap(), MIN_HEALTH_FACTOR);
    assert_eq!(
        engine.bank().balance_of(&alice, &Asset::weth()),
        999 * ONE + ONE / 2
    );

    let result = engine.redeem_collateral(&alice, &Asset::weth(), 1);
    assert!(matches!(result, Err(EngineError::BreaksHealthFactor { .. })));
    assert_eq!(engine.collateral_balance(&alice, &Asset::weth()), ONE / 2);
}

#[test]
fn test_redeem_more_than_deposited_rejected() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");
    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();

    let result = engine.redeem_collateral(&alice, &Asset::weth(), 2 * ONE);
    assert!(matches!(
        result,
        Err(EngineError::NotEnoughCollateral { .. })
    ));
}

#[test]
fn test_burn_retires_debt_and_supply() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();
    engine.mint_debt(&alice, 500 * ONE).unwrap();
    engine.burn_debt(&alice, 200 * ONE).unwrap();

    assert_eq!(engine.debt_of(&alice), 300 * ONE);
    assert_eq!(engine.token().balance_of(&alice), 300 * ONE);
    assert_eq!(engine.token().total_supply(), 300 * ONE);
}

#[test]
fn test_burn_more_than_minted_rejected() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();
    engine.mint_debt(&alice, 100 * ONE).unwrap();

    let result = engine.burn_debt(&alice, 200 * ONE);
    assert!(matches!(
        result,
        Err(EngineError::NotEnoughDebt {
            available,
            requested
        }) if available == 100 * ONE && requested == 200 * ONE
    ));
    assert_eq!(engine.debt_of(&alice), 100 * ONE);
}

#[test]
fn test_deposit_and_mint_compound() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_and_mint(&alice, &Asset::weth(), ONE, 1_000 * ONE)
        .unwrap();

    assert_eq!(engine.collateral_balance(&alice, &Asset::weth()), ONE);
    assert_eq!(engine.debt_of(&alice), 1_000 * ONE);
    assert_eq!(engine.health_factor_of(&alice).unwrap(), MIN_HEALTH_FACTOR);
}

#[test]
fn test_deposit_and_mint_rolls_back_wholly_on_broken_health() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    let result = engine.deposit_and_mint(&alice, &Asset::weth(), ONE, 1_000 * ONE + 1);
    assert!(matches!(result, Err(EngineError::BreaksHealthFactor { .. })));

    // neither leg is observed
    assert_eq!(engine.collateral_balance(&alice, &Asset::weth()), 0);
    assert_eq!(engine.debt_of(&alice), 0);
    assert_eq!(engine.token().balance_of(&alice), 0);
    assert_eq!(
        engine.bank().balance_of(&alice, &Asset::weth()),
        1_000 * ONE
    );
    assert!(engine.events().is_empty());
}

#[test]
fn test_redeem_and_burn_uses_post_burn_debt() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_and_mint(&alice, &Asset::weth(), ONE, 1_000 * ONE)
        .unwrap();

    // Redeeming anything at HF == 1.0 without burning would break; burning
    // first makes room. Burn 500, redeem half the collateral: lands exactly
    // back on the boundary.
    engine
        .redeem_and_burn(&alice, &Asset::weth(), ONE / 2, 500 * ONE)
        .unwrap();

    assert_eq!(engine.debt_of(&alice), 500 * ONE);
    assert_eq!(engine.collateral_balance(&alice, &Asset::weth()), ONE / 2);
    assert_eq!(engine.health_factor_of(&alice).unwrap(), MIN_HEALTH_FACTOR);
    assert_eq!(engine.token().total_supply(), 500 * ONE);
}

#[test]
fn test_liquidation_after_price_crash() {
    let (feed, mut engine) = setup();
    let alice = acct("alice");
    let liquidator = acct("liquidator");

    // Alice: 10 WETH at $2000, 100 units of debt. Healthy.
    engine
        .deposit_and_mint(&alice, &Asset::weth(), 10 * ONE, 100 * ONE)
        .unwrap();
    // Liquidator funds the cover with a large healthy position.
    engine
        .deposit_and_mint(&liquidator, &Asset::weth(), 500 * ONE, 100 * ONE)
        .unwrap();

    // WETH crashes to $18: Alice's HF = (180 * 50%) / 100 = 0.9
    feed.set_price(Asset::weth(), 18_00000000);
    let hf_before = engine.health_factor_of(&alice).unwrap();
    assert!(hf_before < MIN_HEALTH_FACTOR);

    let wallet_before = engine.bank().balance_of(&liquidator, &Asset::weth());
    engine
        .liquidate(&liquidator, &Asset::weth(), &alice, 100 * ONE)
        .unwrap();

    // Covering $100 of debt at $18/unit: base = floor(100/18) = 5.555...,
    // bonus = floor(base * 10%), both floored per stage.
    let expected_base = 5_555_555_555_555_555_555u128;
    let expected_bonus = 555_555_555_555_555_555u128;
    let seized = expected_base + expected_bonus;

    assert_eq!(
        engine.bank().balance_of(&liquidator, &Asset::weth()),
        wallet_before + seized
    );
    assert_eq!(
        engine.collateral_balance(&alice, &Asset::weth()),
        10 * ONE - seized
    );
    assert_eq!(engine.debt_of(&alice), 0);

    // target strictly improved
    let hf_after = engine.health_factor_of(&alice).unwrap();
    assert!(hf_after > hf_before);
    assert_eq!(hf_after, MAX_HEALTH_FACTOR);

    // liquidator paid with their own tokens
    assert_eq!(engine.token().balance_of(&liquidator), 0);

    // redeem event records the seizure from target to liquidator
    let last = engine.events().iter().last().unwrap();
    assert_eq!(
        last.event,
        EngineEvent::CollateralRedeemed {
            from: alice.clone(),
            to: liquidator.clone(),
            asset: Asset::weth(),
            amount: seized,
        }
    );
}

#[test]
fn test_self_liquidation_full_cover_clears_position() {
    let (feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_and_mint(&alice, &Asset::weth(), 10 * ONE, 100 * ONE)
        .unwrap();
    feed.set_price(Asset::weth(), 18_00000000);
    assert!(engine.health_factor_of(&alice).unwrap() < MIN_HEALTH_FACTOR);

    // Covering one's own whole debt is judged on the post-call state, which
    // is debt-free and therefore healthy.
    engine
        .liquidate(&alice, &Asset::weth(), &alice, 100 * ONE)
        .unwrap();

    assert_eq!(engine.debt_of(&alice), 0);
    assert_eq!(engine.health_factor_of(&alice).unwrap(), MAX_HEALTH_FACTOR);
    assert_eq!(engine.token().balance_of(&alice), 0);
    assert_eq!(engine.token().total_supply(), 0);

    // seized collateral (base + bonus) comes back to alice's own wallet
    let seized = 5_555_555_555_555_555_555u128 + 555_555_555_555_555_555;
    assert_eq!(
        engine.collateral_balance(&alice, &Asset::weth()),
        10 * ONE - seized
    );
    assert_eq!(
        engine.bank().balance_of(&alice, &Asset::weth()),
        990 * ONE + seized
    );
}

#[test]
fn test_liquidate_healthy_target_rejected() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");
    let liquidator = acct("liquidator");

    engine
        .deposit_and_mint(&alice, &Asset::weth(), 10 * ONE, 100 * ONE)
        .unwrap();

    let result = engine.liquidate(&liquidator, &Asset::weth(), &alice, 100 * ONE);
    assert!(matches!(result, Err(EngineError::HealthFactorOk)));
}

#[test]
fn test_liquidation_that_cannot_improve_aborts() {
    let (feed, mut engine) = setup();
    let alice = acct("alice");
    let liquidator = acct("liquidator");

    engine
        .deposit_and_mint(&alice, &Asset::weth(), 10 * ONE, 100 * ONE)
        .unwrap();
    engine
        .deposit_and_mint(&liquidator, &Asset::weth(), 500 * ONE, 100 * ONE)
        .unwrap();

    // Crash to $10: collateral value (100) < 110% of debt (100), so any
    // partial cover pays out more value than it retires and worsens the
    // target's ratio.
    feed.set_price(Asset::weth(), 10_00000000);

    let result = engine.liquidate(&liquidator, &Asset::weth(), &alice, 50 * ONE);
    assert!(matches!(
        result,
        Err(EngineError::HealthFactorNotImproved { before, after }) if after < before
    ));
    // full rollback
    assert_eq!(engine.debt_of(&alice), 100 * ONE);
    assert_eq!(engine.collateral_balance(&alice, &Asset::weth()), 10 * ONE);
    assert_eq!(engine.token().balance_of(&liquidator), 100 * ONE);
}

#[test]
fn test_unhealthy_liquidator_rejected() {
    let (feed, mut engine) = setup();
    let alice = acct("alice");
    let bob = acct("bob");

    engine
        .deposit_and_mint(&alice, &Asset::weth(), 10 * ONE, 100 * ONE)
        .unwrap();
    // Bob mints right at the boundary; the crash sinks him too.
    engine
        .deposit_and_mint(&bob, &Asset::weth(), ONE, 1_000 * ONE)
        .unwrap();

    feed.set_price(Asset::weth(), 18_00000000);

    let result = engine.liquidate(&bob, &Asset::weth(), &alice, 100 * ONE);
    assert!(matches!(
        result,
        Err(EngineError::BreaksHealthFactor { .. })
    ));
    assert_eq!(engine.debt_of(&alice), 100 * ONE);
}

#[test]
fn test_stale_price_freezes_valuation_dependent_operations() {
    let (feed, mut engine) = setup();
    let alice = acct("alice");

    // deposit needs no valuation and still works
    engine
        .deposit_collateral(&alice, &Asset::weth(), ONE)
        .unwrap();

    feed.set_price_at(
        Asset::weth(),
        WETH_USD,
        chrono::Utc::now() - chrono::Duration::hours(4),
    );

    let result = engine.mint_debt(&alice, ONE);
    assert!(matches!(
        result,
        Err(EngineError::Oracle(OracleError::StalePrice { .. }))
    ));
    assert_eq!(engine.debt_of(&alice), 0);
    assert_eq!(engine.token().total_supply(), 0);

    // fresh data unfreezes
    feed.set_price(Asset::weth(), WETH_USD);
    engine.mint_debt(&alice, ONE).unwrap();
}

#[test]
fn test_reads_are_idempotent() {
    let (_feed, mut engine) = setup();
    let alice = acct("alice");

    engine
        .deposit_and_mint(&alice, &Asset::weth(), 2 * ONE, 100 * ONE)
        .unwrap();

    let v1 = engine.account_collateral_value(&alice).unwrap();
    let v2 = engine.account_collateral_value(&alice).unwrap();
    let h1 = engine.health_factor_of(&alice).unwrap();
    let h2 = engine.health_factor_of(&alice).unwrap();

    assert_eq!(v1, v2);
    assert_eq!(h1, h2);
    assert_eq!(engine.account_information(&alice).unwrap(), (100 * ONE, v1));
}
