//! Stablebank Core - Domain types
//!
//! This crate contains the fundamental types used across Stablebank:
//! - `AccountId` / `Asset`: validated identity newtypes
//! - `fixed`: protocol precision constants and 256-bit-widened integer math

pub mod fixed;
pub mod identity;

pub use fixed::{mul_div, pct_of, MathError};
pub use identity::{AccountId, Asset, IdentityError};
