//! Identity newtypes for accounts and collateral assets
//!
//! Instead of raw strings, identities are validated once at the boundary
//! and normalized to uppercase. Lookups elsewhere can then use plain
//! equality without re-checking formats.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing identities
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Empty identifier")]
    Empty,

    #[error("Identifier too long (max 32 chars): {0}")]
    TooLong(String),

    #[error("Invalid identifier format: {0}")]
    InvalidFormat(String),
}

const MAX_IDENT_LEN: usize = 32;

fn normalize(s: &str) -> Result<String, IdentityError> {
    let s = s.trim().to_uppercase();

    if s.is_empty() {
        return Err(IdentityError::Empty);
    }
    if s.len() > MAX_IDENT_LEN {
        return Err(IdentityError::TooLong(s));
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(IdentityError::InvalidFormat(s));
    }

    Ok(s)
}

/// A user identity.
///
/// Uppercase-normalized, alphanumeric plus `-`/`_`. The reserved identity
/// `"0"` is the zero sentinel; the pegged token refuses to mint to it.
///
/// # Examples
/// ```
/// use stablebank_core::AccountId;
///
/// let alice: AccountId = "alice".parse().unwrap();
/// assert_eq!(alice.as_str(), "ALICE");
/// assert!(AccountId::zero().is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Create a validated account identity
    pub fn new(s: impl AsRef<str>) -> Result<Self, IdentityError> {
        normalize(s.as_ref()).map(Self)
    }

    /// The reserved zero identity (invalid mint target)
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// Whether this is the reserved zero identity
    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    /// The normalized identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// A collateral asset code (e.g. WETH, WBTC).
///
/// The type is an open set; the asset registry, not the type, decides what
/// is allowed as collateral.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset(String);

impl Asset {
    /// Create a validated asset code
    pub fn new(s: impl AsRef<str>) -> Result<Self, IdentityError> {
        normalize(s.as_ref()).map(Self)
    }

    /// Wrapped Ether
    pub fn weth() -> Self {
        Self("WETH".to_string())
    }

    /// Wrapped Bitcoin
    pub fn wbtc() -> Self {
        Self("WBTC".to_string())
    }

    /// The normalized asset code
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Asset {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Asset {
    type Error = IdentityError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.0
    }
}
