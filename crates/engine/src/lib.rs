//! Stablebank Engine - collateral/debt accounting and liquidation core
//!
//! Users lock exogenous collateral and mint pegged-token debt against it at
//! a 200% minimum collateralization ratio. Positions whose health factor
//! drops below 1.0 can be liquidated by third parties for a 10% bonus.
//!
//! Components:
//! - [`AssetRegistry`]: immutable asset -> price feed wiring
//! - [`CollateralLedger`] / [`DebtLedger`]: per-user positions
//! - [`RiskEngine`]: stateless valuation, health factor, and seizure math
//! - [`PositionController`]: the public operations, each atomic with full
//!   rollback on any failure

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod risk;

pub use config::EngineConfig;
pub use controller::PositionController;
pub use error::{EngineError, LedgerError, RegistryError};
pub use events::{EngineEvent, EventLog, EventRecord};
pub use ledger::{CollateralLedger, DebtLedger};
pub use registry::AssetRegistry;
pub use risk::{RiskEngine, Seizure};
