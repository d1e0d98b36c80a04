//! Collection state entity - one row per named collection.
//!
//! The site store persists whole collections at once: each row holds the JSON
//! encoding of one collection (or the display-currency preference) under a stable
//! key such as `app-items`. Rows are overwritten on every mutation of their
//! collection.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Collection state database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection_state")]
pub struct Model {
    /// Collection key (e.g. `"app-movements"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    /// JSON-encoded collection
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the collection was last written
    pub updated_at: DateTimeUtc,
}

/// `CollectionState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
