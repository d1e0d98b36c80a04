use dotenvy::dotenv;
use sitestock::{
    config::{self, database},
    core::{
        store::SiteStore,
        sync::{RandomDecisions, SyncSimulator},
    },
    errors::Result,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;
    info!("Successfully processed application configuration.");

    // 4. Open the store over the database
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    let store = Arc::new(SiteStore::open(db, app_config.seed_catalog()).await?);

    let summary = store.dashboard_summary().await;
    info!(
        active_projects = summary.active_projects,
        open_requisitions = summary.open_requisitions,
        low_stock_items = summary.low_stock_items,
        tools_in_use = summary.tools_in_use,
        pending_syncs = summary.pending_syncs,
        "Dashboard"
    );

    // 5. Start the sync schedule. Without a connectivity source the device is
    // considered to stay in its configured state.
    let (_online_tx, online_rx) = watch::channel(app_config.sync.start_online);
    let handle = SyncSimulator::new(
        Arc::clone(&store),
        Arc::new(RandomDecisions),
        online_rx,
        app_config.sync.latency(),
    )
    .spawn(app_config.sync.interval());

    // 6. Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutting down.");
    handle.shutdown().await;

    match Arc::try_unwrap(store) {
        Ok(store) => store.close().await?,
        Err(_) => error!("Store still shared at shutdown, skipping final flush"),
    }

    Ok(())
}
