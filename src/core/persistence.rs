//! Key-value persistence of whole collections.
//!
//! Each collection is stored as one JSON value in the `collection_state` table,
//! keyed by a stable name. Writes replace the whole value; there is no partial
//! update and no cross-collection transaction.

use crate::{
    entities::{CollectionState, collection_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use tracing::{debug, error, warn};

/// Named collections persisted by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    /// Stock items
    Items,
    /// Stock movements
    Movements,
    /// Purchase requisitions
    Requisitions,
    /// Attendance records
    Attendance,
    /// Employees
    Employees,
    /// Tools
    Tools,
    /// Projects
    Projects,
    /// Display currency preference
    Currency,
}

impl CollectionKey {
    /// Every persisted key.
    pub const ALL: [Self; 8] = [
        Self::Items,
        Self::Movements,
        Self::Requisitions,
        Self::Attendance,
        Self::Employees,
        Self::Tools,
        Self::Projects,
        Self::Currency,
    ];

    /// Storage key as written by the mobile client.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Items => "app-items",
            Self::Movements => "app-movements",
            Self::Requisitions => "app-requisitions",
            Self::Attendance => "app-attendance",
            Self::Employees => "app-employees",
            Self::Tools => "app-tools",
            Self::Projects => "app-projects",
            Self::Currency => "app-currency",
        }
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads and decodes the value stored under `key`.
///
/// Returns `Ok(None)` when nothing has been stored yet.
pub async fn load_value<T: DeserializeOwned>(
    db: &DatabaseConnection,
    key: CollectionKey,
) -> Result<Option<T>> {
    let Some(row) = CollectionState::find_by_id(key.as_str()).one(db).await? else {
        return Ok(None);
    };
    Ok(Some(serde_json::from_str(&row.value)?))
}

/// Encodes `value` and stores it under `key`, replacing any previous value.
pub async fn save_value<T: Serialize + ?Sized>(
    db: &DatabaseConnection,
    key: CollectionKey,
    value: &T,
) -> Result<()> {
    let encoded = serde_json::to_string(value)?;
    let now = Utc::now();

    let existing = CollectionState::find_by_id(key.as_str()).one(db).await?;
    if let Some(row) = existing {
        let mut active_model: collection_state::ActiveModel = row.into();
        active_model.value = Set(encoded);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let row = collection_state::ActiveModel {
            key: Set(key.as_str().to_string()),
            value: Set(encoded),
            updated_at: Set(now),
        };
        row.insert(db).await?;
    }

    debug!("Persisted collection {}", key);
    Ok(())
}

/// Loads the value under `key`, falling back to `default` when nothing is stored
/// or the stored value cannot be read. Read failures are logged, never returned.
pub async fn load_or<T: DeserializeOwned>(
    db: &DatabaseConnection,
    key: CollectionKey,
    default: T,
) -> T {
    match load_value(db, key).await {
        Ok(Some(value)) => value,
        Ok(None) => {
            debug!("No stored value for {}, using defaults", key);
            default
        }
        Err(e) => {
            error!("Failed to load {}: {}. Using defaults.", key, e);
            default
        }
    }
}

/// Stores `value` under `key`, logging instead of returning any failure.
pub async fn save_or_log<T: Serialize + ?Sized>(
    db: &DatabaseConnection,
    key: CollectionKey,
    value: &T,
) {
    if let Err(e) = save_value(db, key, value).await {
        warn!("Failed to persist {}: {}", key, e);
    }
}
