//! Simulated upstream sync.
//!
//! There is no real ERP protocol yet. A sync waits a fixed latency, then applies
//! every sync-tick transition from [`crate::core::lifecycle`] to the store, asking a
//! [`DecisionProvider`] for each requisition's upstream decision. The mock always
//! succeeds; there is nothing to retry.
//!
//! [`SyncSimulator::spawn`] runs syncs on a fixed interval while the connectivity
//! signal reports online, and returns a [`SyncHandle`] to stop it.

use crate::{
    core::store::SiteStore,
    models::{ErpDecision, PurchaseRequisition},
};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, instrument};

/// Source of upstream decisions for synced requisitions.
pub trait DecisionProvider: Send + Sync {
    /// Decision to record for `requisition`.
    fn decide(&self, requisition: &PurchaseRequisition) -> ErpDecision;
}

/// Picks a decision uniformly at random. Stands in for the ERP approval flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDecisions;

impl DecisionProvider for RandomDecisions {
    fn decide(&self, _requisition: &PurchaseRequisition) -> ErpDecision {
        ErpDecision::ALL
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(ErpDecision::Waiting)
    }
}

/// Always returns the same decision.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub ErpDecision);

impl DecisionProvider for FixedDecision {
    fn decide(&self, _requisition: &PurchaseRequisition) -> ErpDecision {
        self.0
    }
}

/// Number of records moved by one sync, per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Movements moved to `synced`
    pub movements: usize,
    /// Requisitions moved to `synced-waiting`
    pub requisitions: usize,
    /// Attendance records moved to `synced`
    pub attendance: usize,
    /// Tools moved to `synced`
    pub tools: usize,
}

impl SyncReport {
    /// Total number of records moved.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.movements + self.requisitions + self.attendance + self.tools
    }
}

/// Runs simulated syncs against a store.
#[derive(Clone)]
pub struct SyncSimulator {
    store: Arc<SiteStore>,
    decisions: Arc<dyn DecisionProvider>,
    online: watch::Receiver<bool>,
    latency: Duration,
}

impl SyncSimulator {
    /// Creates a simulator. `online` carries the host's connectivity signal.
    #[must_use]
    pub fn new(
        store: Arc<SiteStore>,
        decisions: Arc<dyn DecisionProvider>,
        online: watch::Receiver<bool>,
        latency: Duration,
    ) -> Self {
        Self {
            store,
            decisions,
            online,
            latency,
        }
    }

    /// Current connectivity.
    #[must_use]
    pub fn is_online(&self) -> bool {
        *self.online.borrow()
    }

    /// Runs one sync.
    ///
    /// Does nothing and returns `None` while offline. Otherwise waits the simulated
    /// latency and applies the sync transitions to whatever is eligible at that
    /// moment. Going offline during the wait does not abort the sync.
    #[instrument(skip(self))]
    pub async fn sync(&self) -> Option<SyncReport> {
        if !self.is_online() {
            debug!("Offline, skipping sync");
            return None;
        }

        time::sleep(self.latency).await;
        let report = self.store.apply_sync(self.decisions.as_ref()).await;

        info!(
            movements = report.movements,
            requisitions = report.requisitions,
            attendance = report.attendance,
            tools = report.tools,
            "Sync completed."
        );
        Some(report)
    }

    /// Starts syncing every `interval` while online.
    ///
    /// The first tick comes one full interval after start, and again one interval
    /// after each return to online. Ticks are skipped while offline.
    #[must_use]
    pub fn spawn(self, interval: Duration) -> SyncHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(interval, shutdown_rx));
        SyncHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut online = self.online.clone();
        let mut watching_connectivity = true;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Sync scheduler started, every {:?}", period);

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                changed = online.changed(), if watching_connectivity => {
                    if changed.is_err() {
                        debug!("Connectivity signal dropped, keeping last known state");
                        watching_connectivity = false;
                        continue;
                    }
                    if *online.borrow_and_update() {
                        info!("Back online");
                        ticker.reset();
                    } else {
                        info!("Offline, pausing sync");
                    }
                }
                _ = ticker.tick() => {
                    // A started sync always runs to completion.
                    self.sync().await;
                }
            }
        }

        info!("Sync scheduler stopped");
    }
}

/// Handle to a running sync schedule.
#[derive(Debug)]
pub struct SyncHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stops scheduling new syncs and waits for the schedule to wind down. A sync
    /// already in flight completes first.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            error!("Sync scheduler task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Result;
    use crate::models::{MovementKind, MovementStatus, NewRequisition, RequisitionStatus};
    use crate::test_utils::*;
    use std::collections::HashSet;

    fn simulator(store: &Arc<SiteStore>, online: watch::Receiver<bool>) -> SyncSimulator {
        SyncSimulator::new(
            Arc::clone(store),
            Arc::new(FixedDecision(ErpDecision::Waiting)),
            online,
            Duration::from_millis(5),
        )
    }

    async fn wait_until_synced(store: &SiteStore, movement_id: &str) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(m) = store.get_movement_by_id(movement_id).await {
                if m.status == MovementStatus::Synced {
                    return true;
                }
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[test]
    fn test_random_decisions_cover_all_labels() {
        let requisition = PurchaseRequisition {
            id: "req-1".to_string(),
            requester: "Chef".to_string(),
            items: vec![],
            timestamp: chrono::Utc::now(),
            status: RequisitionStatus::Pending,
            erp_decision: None,
        };
        let seen: HashSet<ErpDecision> = (0..300)
            .map(|_| RandomDecisions.decide(&requisition))
            .collect();
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn test_sync_offline_does_nothing() -> Result<()> {
        let store = setup_test_store().await?;
        store
            .add_movement(new_movement("item-1", MovementKind::Entry, 1))
            .await;
        let (_tx, rx) = watch::channel(false);

        assert_eq!(simulator(&store, rx).sync().await, None);
        assert_eq!(store.movements().await[0].status, MovementStatus::Pending);
        Ok(())
    }

    #[tokio::test]
    async fn test_sync_online_applies_transitions() -> Result<()> {
        let store = setup_test_store().await?;
        store
            .add_movement(new_movement("item-1", MovementKind::Entry, 1))
            .await;
        store
            .add_requisition(NewRequisition {
                requester: "Chef".to_string(),
                items: vec![],
            })
            .await;
        let (_tx, rx) = watch::channel(true);

        let report = simulator(&store, rx).sync().await.unwrap();
        assert_eq!(report.movements, 1);
        assert_eq!(report.requisitions, 1);
        assert_eq!(report.total(), 2);

        let requisition = &store.requisitions().await[0];
        assert_eq!(requisition.status, RequisitionStatus::SyncedWaiting);
        assert_eq!(requisition.erp_decision, Some(ErpDecision::Waiting));
        Ok(())
    }

    #[tokio::test]
    async fn test_records_added_during_latency_are_picked_up() -> Result<()> {
        let store = setup_test_store().await?;
        let (_tx, rx) = watch::channel(true);
        let sim = SyncSimulator::new(
            Arc::clone(&store),
            Arc::new(RandomDecisions),
            rx,
            Duration::from_millis(100),
        );

        let in_flight = tokio::spawn(async move { sim.sync().await });
        time::sleep(Duration::from_millis(20)).await;
        let movement = store
            .add_movement(new_movement("item-2", MovementKind::Exit, 10))
            .await;

        let report = in_flight.await.unwrap().unwrap();
        assert_eq!(report.movements, 1);
        assert_eq!(
            store.get_movement_by_id(&movement.id).await.unwrap().status,
            MovementStatus::Synced
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_scheduler_waits_for_connectivity() -> Result<()> {
        let store = setup_test_store().await?;
        let movement = store
            .add_movement(new_movement("item-3", MovementKind::Exit, 1))
            .await;
        let (online_tx, online_rx) = watch::channel(false);
        let handle = simulator(&store, online_rx).spawn(Duration::from_millis(20));

        time::sleep(Duration::from_millis(120)).await;
        assert_eq!(
            store.get_movement_by_id(&movement.id).await.unwrap().status,
            MovementStatus::Pending
        );

        online_tx.send(true).unwrap();
        assert!(wait_until_synced(&store, &movement.id).await);

        handle.shutdown().await;
        Ok(())
    }

    #[tokio::test]
    async fn test_scheduler_stops_after_shutdown() -> Result<()> {
        let store = setup_test_store().await?;
        let (_online_tx, online_rx) = watch::channel(true);
        let handle = simulator(&store, online_rx).spawn(Duration::from_millis(20));
        handle.shutdown().await;

        let movement = store
            .add_movement(new_movement("item-3", MovementKind::Exit, 1))
            .await;
        time::sleep(Duration::from_millis(120)).await;
        assert_eq!(
            store.get_movement_by_id(&movement.id).await.unwrap().status,
            MovementStatus::Pending
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_going_offline_does_not_abort_in_flight_sync() -> Result<()> {
        let store = setup_test_store().await?;
        let movement = store
            .add_movement(new_movement("item-1", MovementKind::Entry, 4))
            .await;
        let (online_tx, online_rx) = watch::channel(true);
        let sim = SyncSimulator::new(
            Arc::clone(&store),
            Arc::new(FixedDecision(ErpDecision::Approved)),
            online_rx,
            Duration::from_millis(100),
        );

        let in_flight = tokio::spawn(async move { sim.sync().await });
        time::sleep(Duration::from_millis(20)).await;
        online_tx.send(false).unwrap();

        let report = in_flight.await.unwrap();
        assert_eq!(report.map(|r| r.movements), Some(1));
        assert_eq!(
            store.get_movement_by_id(&movement.id).await.unwrap().status,
            MovementStatus::Synced
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_scheduler_pauses_after_going_offline() -> Result<()> {
        let store = setup_test_store().await?;
        let first = store
            .add_movement(new_movement("item-1", MovementKind::Exit, 1))
            .await;
        let (online_tx, online_rx) = watch::channel(true);
        let handle = simulator(&store, online_rx).spawn(Duration::from_millis(20));
        assert!(wait_until_synced(&store, &first.id).await);

        online_tx.send(false).unwrap();
        // let a tick that was already running finish
        time::sleep(Duration::from_millis(60)).await;
        let second = store
            .add_movement(new_movement("item-1", MovementKind::Exit, 1))
            .await;
        time::sleep(Duration::from_millis(150)).await;
        assert_eq!(
            store.get_movement_by_id(&second.id).await.unwrap().status,
            MovementStatus::Pending
        );

        online_tx.send(true).unwrap();
        assert!(wait_until_synced(&store, &second.id).await);
        handle.shutdown().await;
        Ok(())
    }
}
