//! Shared test utilities.
//!
//! Helpers for setting up in-memory databases and stores, and for building
//! domain inputs with sensible defaults.

use crate::{
    config::catalog::SeedCatalog,
    core::store::SiteStore,
    errors::Result,
    models::{MovementKind, NewMovement, NewProject, NewTool, ProjectStatus, ToolCondition},
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly tracing subscriber. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Opens a store over a fresh in-memory database seeded with the built-in catalogue.
pub async fn setup_test_store() -> Result<Arc<SiteStore>> {
    init_test_tracing();
    let db = setup_test_db().await?;
    Ok(Arc::new(SiteStore::open(db, SeedCatalog::builtin()).await?))
}

/// Builds a movement input.
///
/// # Defaults
/// * `operator`: `"Magasinier"`
/// * `counterparty`: `"Chantier A"`
#[must_use]
pub fn new_movement(item_id: &str, kind: MovementKind, quantity: i64) -> NewMovement {
    NewMovement {
        item_id: item_id.to_string(),
        kind,
        quantity,
        operator: "Magasinier".to_string(),
        counterparty: "Chantier A".to_string(),
    }
}

/// Builds an exit movement input towards `destination`.
#[must_use]
pub fn exit_to(item_id: &str, quantity: i64, destination: &str) -> NewMovement {
    NewMovement {
        counterparty: destination.to_string(),
        ..new_movement(item_id, MovementKind::Exit, quantity)
    }
}

/// Builds a tool input in good condition, purchased now.
#[must_use]
pub fn new_tool(name: &str) -> NewTool {
    NewTool {
        name: name.to_string(),
        asset_tag: format!("TAG-{name}"),
        category: "Électroportatif".to_string(),
        purchase_date: Utc::now(),
        condition: ToolCondition::Good,
    }
}

/// Builds a draft project input with the given budget in display currency.
#[must_use]
pub fn new_project(name: &str, reference: &str, budget: Option<f64>) -> NewProject {
    NewProject {
        name: name.to_string(),
        reference: reference.to_string(),
        client_name: "Client Test".to_string(),
        address: "Gombe, Kinshasa".to_string(),
        start_date: Utc::now(),
        end_date: None,
        status: ProjectStatus::Draft,
        budget,
    }
}
