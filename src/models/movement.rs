//! Stock movement - a single entry into or exit out of the site store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a stock movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Goods received from a supplier, increases quantity
    Entry,
    /// Goods sent to a destination (usually a site lot), decreases quantity
    Exit,
}

impl MovementKind {
    /// Signed quantity delta this movement applies to its item.
    #[must_use]
    pub const fn signed(self, quantity: i64) -> i64 {
        match self {
            Self::Entry => quantity,
            Self::Exit => -quantity,
        }
    }
}

/// Sync status of a movement. `Synced` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStatus {
    /// Recorded locally, not yet pushed upstream
    Pending,
    /// Acknowledged by the upstream system
    Synced,
}

/// A recorded stock movement. Immutable after creation except for `status`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    /// Unique identifier
    pub id: String,
    /// Item the movement applies to (may dangle)
    pub item_id: String,
    /// Entry or exit
    #[serde(rename = "type")]
    pub kind: MovementKind,
    /// Number of units moved
    pub quantity: i64,
    /// Storekeeper who recorded the movement
    pub operator: String,
    /// Supplier for entries, destination for exits
    #[serde(rename = "destinationOrSource")]
    pub counterparty: String,
    /// Creation time, assigned once
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Sync status
    pub status: MovementStatus,
}

/// Input for recording a new movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    /// Item the movement applies to
    pub item_id: String,
    /// Entry or exit
    pub kind: MovementKind,
    /// Number of units moved
    pub quantity: i64,
    /// Storekeeper recording the movement
    pub operator: String,
    /// Supplier for entries, destination for exits
    pub counterparty: String,
}
