//! Observable engine events
//!
//! Append-only, informational records for external indexers and auditors.
//! The engine never reads them back. Each append is mirrored to tracing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stablebank_core::{AccountId, Asset};
use uuid::Uuid;

/// Events emitted by the position controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    CollateralDeposited {
        user: AccountId,
        asset: Asset,
        amount: u128,
    },
    CollateralRedeemed {
        from: AccountId,
        to: AccountId,
        asset: Asset,
        amount: u128,
    },
}

/// One appended event with its id and timestamp
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: EngineEvent,
}

/// Append-only event log
#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, stamping it with an id and the current time
    pub fn record(&mut self, event: EngineEvent) {
        match &event {
            EngineEvent::CollateralDeposited { user, asset, amount } => {
                tracing::info!(%user, %asset, %amount, "collateral deposited");
            }
            EngineEvent::CollateralRedeemed {
                from,
                to,
                asset,
                amount,
            } => {
                tracing::info!(%from, %to, %asset, %amount, "collateral redeemed");
            }
        }
        self.records.push(EventRecord {
            id: Uuid::new_v4(),
            at: Utc::now(),
            event,
        });
    }

    /// All records, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
