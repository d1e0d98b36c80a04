//! Entity module - Contains the SeaORM entity definitions for the database.
//! The site store keeps whole collections as serialized values, so a single
//! key-value table is enough.

pub mod collection_state;

pub use collection_state::{
    Column as CollectionStateColumn, Entity as CollectionState, Model as CollectionStateModel,
};
