//! Stablebank token collaborators
//!
//! Two external collaborators of the position controller, modeled as
//! in-process ledgers:
//! - [`PeggedToken`]: the USD-pegged token. Supply changes only through
//!   capability-gated mint/burn; the capability is handed out exactly once
//!   at construction.
//! - [`CollateralBank`]: custody for exogenous collateral assets, with the
//!   standard pull-from-caller / push-to-recipient transfer contract.

mod bank;
mod error;
mod pegged;

pub use bank::CollateralBank;
pub use error::{CustodyError, TokenError};
pub use pegged::{MintAuthority, PeggedToken};
