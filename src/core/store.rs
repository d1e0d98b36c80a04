//! Site store - the in-memory collections and every domain operation on them.
//!
//! `SiteStore` owns one copy of each collection behind a single async lock and a
//! database connection used as a write-through backing store. Every mutation
//! updates memory first, then rewrites the touched collections while still holding
//! the lock, so persisted state follows the order of mutations. Persistence
//! failures are logged and never surfaced: the in-memory state stays authoritative.
//!
//! Readers get owned snapshots; derived views in [`crate::core::report`] are
//! computed from those.

use crate::{
    config::catalog::SeedCatalog,
    config::database::create_tables,
    core::{
        attendance_import::parse_attendance,
        lifecycle,
        persistence::{self, CollectionKey, load_or},
        report,
        sync::{DecisionProvider, SyncReport},
    },
    errors::Result,
    models::{
        AttendanceRecord, AttendanceStatus, Currency, Employee, Item, MovementStatus,
        NewAttendance, NewMovement, NewProject, NewRequisition, NewTool, Project,
        PurchaseRequisition, RequisitionStatus, StockMovement, Tool, ToolAction, ToolPatch,
        ToolStatus, ToolSyncStatus, new_id,
    },
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Snapshot of every collection held by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    /// Stock items
    pub items: Vec<Item>,
    /// Stock movements, in creation order
    pub movements: Vec<StockMovement>,
    /// Purchase requisitions, in creation order
    pub requisitions: Vec<PurchaseRequisition>,
    /// Attendance records, in import order
    pub attendance: Vec<AttendanceRecord>,
    /// Employees
    pub employees: Vec<Employee>,
    /// Tools
    pub tools: Vec<Tool>,
    /// Projects
    pub projects: Vec<Project>,
    /// Display currency preference
    pub currency: Currency,
}

/// The site's local data store.
pub struct SiteStore {
    db: DatabaseConnection,
    state: RwLock<Collections>,
}

impl SiteStore {
    /// Opens the store over `db`, loading every collection.
    ///
    /// Collections with nothing persisted start from `seed` (movements,
    /// requisitions and attendance start empty). A stored value that cannot be
    /// decoded is logged and replaced by the same default.
    ///
    /// # Errors
    /// Returns an error if the backing table cannot be created.
    #[instrument(skip(db, seed))]
    pub async fn open(db: DatabaseConnection, seed: SeedCatalog) -> Result<Self> {
        create_tables(&db).await?;

        let state = Collections {
            items: load_or(&db, CollectionKey::Items, seed.items).await,
            movements: load_or(&db, CollectionKey::Movements, Vec::new()).await,
            requisitions: load_or(&db, CollectionKey::Requisitions, Vec::new()).await,
            attendance: load_or(&db, CollectionKey::Attendance, Vec::new()).await,
            employees: load_or(&db, CollectionKey::Employees, seed.employees).await,
            tools: load_or(&db, CollectionKey::Tools, seed.tools).await,
            projects: load_or(&db, CollectionKey::Projects, seed.projects).await,
            currency: load_or(&db, CollectionKey::Currency, Currency::default()).await,
        };

        info!(
            items = state.items.len(),
            movements = state.movements.len(),
            requisitions = state.requisitions.len(),
            attendance = state.attendance.len(),
            tools = state.tools.len(),
            projects = state.projects.len(),
            "Site store opened"
        );

        Ok(Self {
            db,
            state: RwLock::new(state),
        })
    }

    /// Writes every collection one last time and closes the database connection.
    ///
    /// # Errors
    /// Returns an error if the connection cannot be closed cleanly.
    #[instrument(skip(self))]
    pub async fn close(self) -> Result<()> {
        let state = self.state.into_inner();
        for key in CollectionKey::ALL {
            write_collection(&self.db, &state, key).await;
        }
        self.db.close().await?;
        info!("Site store closed");
        Ok(())
    }

    async fn persist(&self, state: &Collections, key: CollectionKey) {
        write_collection(&self.db, state, key).await;
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    /// Owned copy of every collection.
    pub async fn snapshot(&self) -> Collections {
        self.state.read().await.clone()
    }

    /// All stock items.
    pub async fn items(&self) -> Vec<Item> {
        self.state.read().await.items.clone()
    }

    /// All stock movements.
    pub async fn movements(&self) -> Vec<StockMovement> {
        self.state.read().await.movements.clone()
    }

    /// All purchase requisitions.
    pub async fn requisitions(&self) -> Vec<PurchaseRequisition> {
        self.state.read().await.requisitions.clone()
    }

    /// All attendance records.
    pub async fn attendance(&self) -> Vec<AttendanceRecord> {
        self.state.read().await.attendance.clone()
    }

    /// Attendance records still awaiting validation.
    pub async fn pending_attendance(&self) -> Vec<AttendanceRecord> {
        self.state
            .read()
            .await
            .attendance
            .iter()
            .filter(|r| r.status == AttendanceStatus::Pending)
            .cloned()
            .collect()
    }

    /// All employees.
    pub async fn employees(&self) -> Vec<Employee> {
        self.state.read().await.employees.clone()
    }

    /// All tools.
    pub async fn tools(&self) -> Vec<Tool> {
        self.state.read().await.tools.clone()
    }

    /// All projects.
    pub async fn projects(&self) -> Vec<Project> {
        self.state.read().await.projects.clone()
    }

    /// Current display currency.
    pub async fn currency(&self) -> Currency {
        self.state.read().await.currency
    }

    /// Formats a base-currency amount in the current display currency.
    pub async fn format_currency(&self, amount_in_base: f64) -> String {
        self.currency().await.format_amount(amount_in_base)
    }

    /// Number of records waiting for the next sync.
    pub async fn pending_sync_count(&self) -> usize {
        report::pending_sync_count(&*self.state.read().await)
    }

    /// Headline counters for the home screen.
    pub async fn dashboard_summary(&self) -> report::DashboardSummary {
        report::dashboard_summary(&*self.state.read().await)
    }

    /// Looks up an item. Absent ids return `None`.
    pub async fn get_item_by_id(&self, id: &str) -> Option<Item> {
        self.state.read().await.items.iter().find(|i| i.id == id).cloned()
    }

    /// Looks up a stock movement.
    pub async fn get_movement_by_id(&self, id: &str) -> Option<StockMovement> {
        self.state.read().await.movements.iter().find(|m| m.id == id).cloned()
    }

    /// Looks up a requisition.
    pub async fn get_requisition_by_id(&self, id: &str) -> Option<PurchaseRequisition> {
        self.state.read().await.requisitions.iter().find(|r| r.id == id).cloned()
    }

    /// Looks up an employee.
    pub async fn get_employee_by_id(&self, id: &str) -> Option<Employee> {
        self.state.read().await.employees.iter().find(|e| e.id == id).cloned()
    }

    /// Looks up a tool.
    pub async fn get_tool_by_id(&self, id: &str) -> Option<Tool> {
        self.state.read().await.tools.iter().find(|t| t.id == id).cloned()
    }

    /// Looks up a project.
    pub async fn get_project_by_id(&self, id: &str) -> Option<Project> {
        self.state.read().await.projects.iter().find(|p| p.id == id).cloned()
    }

    // ---------------------------------------------------------------------
    // Domain operations
    // ---------------------------------------------------------------------

    /// Records a stock movement and adjusts its item's quantity.
    ///
    /// The movement is recorded even when the item does not exist; no quantity
    /// changes in that case. Quantities are not clamped and may go negative.
    ///
    /// # Arguments
    /// * `movement` - Item, direction, quantity, operator and destination or source
    ///
    /// # Returns
    /// The stored movement, `pending` and timestamped now.
    #[instrument(skip(self, movement), fields(item_id = %movement.item_id))]
    pub async fn add_movement(&self, movement: NewMovement) -> StockMovement {
        let movement = StockMovement {
            id: new_id("mov"),
            item_id: movement.item_id,
            kind: movement.kind,
            quantity: movement.quantity,
            operator: movement.operator,
            counterparty: movement.counterparty,
            timestamp: Utc::now(),
            status: MovementStatus::Pending,
        };

        let mut state = self.state.write().await;
        state.movements.push(movement.clone());
        let item = state.items.iter_mut().find(|i| i.id == movement.item_id);
        let adjusted = if let Some(item) = item {
            item.apply_movement(movement.kind, movement.quantity);
            debug!("Item {} now at {} units", item.id, item.quantity);
            true
        } else {
            warn!("Movement {} references unknown item", movement.id);
            false
        };

        self.persist(&state, CollectionKey::Movements).await;
        if adjusted {
            self.persist(&state, CollectionKey::Items).await;
        }
        movement
    }

    /// Raises a purchase requisition in `pending` status.
    #[instrument(skip(self, requisition), fields(requester = %requisition.requester))]
    pub async fn add_requisition(&self, requisition: NewRequisition) -> PurchaseRequisition {
        let requisition = PurchaseRequisition {
            id: new_id("req"),
            requester: requisition.requester,
            items: requisition.items,
            timestamp: Utc::now(),
            status: RequisitionStatus::Pending,
            erp_decision: None,
        };

        let mut state = self.state.write().await;
        state.requisitions.push(requisition.clone());
        self.persist(&state, CollectionKey::Requisitions).await;
        requisition
    }

    /// Adds imported attendance records, each in `pending` status.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub async fn import_attendance(&self, records: Vec<NewAttendance>) -> Vec<AttendanceRecord> {
        let imported: Vec<AttendanceRecord> = records
            .into_iter()
            .map(|r| AttendanceRecord {
                id: new_id("att"),
                employee_id: r.employee_id,
                check_in: r.check_in,
                check_out: r.check_out,
                worked_hours: r.worked_hours,
                status: AttendanceStatus::Pending,
                site_id: r.site_id,
                device_id: r.device_id,
            })
            .collect();

        if imported.is_empty() {
            return imported;
        }

        let mut state = self.state.write().await;
        state.attendance.extend(imported.iter().cloned());
        self.persist(&state, CollectionKey::Attendance).await;
        info!("Imported {} attendance records", imported.len());
        imported
    }

    /// Parses an attendance export and imports every well-formed line.
    ///
    /// Returns the number of records imported; malformed lines are dropped.
    pub async fn import_attendance_text(&self, text: &str) -> usize {
        self.import_attendance(parse_attendance(text)).await.len()
    }

    /// Validates the pending attendance records whose ids are in `ids`.
    ///
    /// Ids that are unknown or not pending are ignored.
    ///
    /// # Arguments
    /// * `ids` - Attendance record ids selected by the site manager
    ///
    /// # Returns
    /// The number of records moved to `validated`.
    #[instrument(skip(self, ids), fields(selected = ids.len()))]
    pub async fn validate_attendance<S: AsRef<str>>(&self, ids: &[S]) -> usize {
        let selected: HashSet<&str> = ids.iter().map(AsRef::as_ref).collect();

        let mut state = self.state.write().await;
        let validated = state
            .attendance
            .iter_mut()
            .map(|record| lifecycle::validate_attendance(record, &selected))
            .filter(|changed| *changed)
            .count();

        if validated > 0 {
            self.persist(&state, CollectionKey::Attendance).await;
        }
        info!("Validated {} attendance records", validated);
        validated
    }

    /// Registers a new tool: available, unassigned, `pending_add`.
    #[instrument(skip(self, tool), fields(name = %tool.name))]
    pub async fn add_tool(&self, tool: NewTool) -> Tool {
        let tool = Tool {
            id: new_id("tool"),
            name: tool.name,
            asset_tag: tool.asset_tag,
            category: tool.category,
            status: ToolStatus::Available,
            assigned_to: None,
            purchase_date: tool.purchase_date,
            condition: tool.condition,
            last_maintenance_date: None,
            sync_status: ToolSyncStatus::PendingAdd,
        };

        let mut state = self.state.write().await;
        state.tools.push(tool.clone());
        self.persist(&state, CollectionKey::Tools).await;
        tool
    }

    /// Edits a tool's descriptive fields and marks it for sync.
    ///
    /// Returns the updated tool, or `None` if no tool has this id.
    #[instrument(skip(self, patch))]
    pub async fn update_tool(&self, tool_id: &str, patch: ToolPatch) -> Option<Tool> {
        let mut state = self.state.write().await;
        let tool = state.tools.iter_mut().find(|t| t.id == tool_id)?;
        patch.apply_to(tool);
        tool.sync_status = lifecycle::tool_sync_after_update(tool.sync_status);
        let updated = tool.clone();

        self.persist(&state, CollectionKey::Tools).await;
        Some(updated)
    }

    /// Applies a user action to a tool's operational status.
    ///
    /// # Arguments
    /// * `tool_id` - Tool to act on
    /// * `action` - Assign, return to stock, start or finish maintenance, declare lost
    ///
    /// # Returns
    /// The updated tool, or `Ok(None)` if no tool has this id.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::InvalidToolTransition`] when the action is not
    /// allowed from the tool's current status; the tool is left unchanged.
    #[instrument(skip(self))]
    pub async fn apply_tool_action(
        &self,
        tool_id: &str,
        action: ToolAction,
    ) -> Result<Option<Tool>> {
        let mut state = self.state.write().await;
        let Some(tool) = state.tools.iter_mut().find(|t| t.id == tool_id) else {
            return Ok(None);
        };
        lifecycle::apply_tool_action(tool, action, Utc::now())?;
        let updated = tool.clone();

        self.persist(&state, CollectionKey::Tools).await;
        info!("Tool {} is now {}", updated.id, updated.status);
        Ok(Some(updated))
    }

    /// Creates a project.
    ///
    /// # Arguments
    /// * `project` - Project details; `budget` is read in the current display currency
    ///
    /// # Returns
    /// The stored project, with its budget converted to base currency.
    #[instrument(skip(self, project), fields(name = %project.name))]
    pub async fn add_project(&self, project: NewProject) -> Project {
        let mut state = self.state.write().await;
        let currency = state.currency;
        let project = Project {
            id: new_id("proj"),
            name: project.name,
            reference: project.reference,
            client_name: project.client_name,
            address: project.address,
            start_date: project.start_date,
            end_date: project.end_date,
            status: project.status,
            budget: project.budget.map(|b| currency.to_base(b)),
        };

        state.projects.push(project.clone());
        self.persist(&state, CollectionKey::Projects).await;
        project
    }

    /// Sets the display currency preference.
    #[instrument(skip(self))]
    pub async fn set_currency(&self, currency: Currency) {
        let mut state = self.state.write().await;
        state.currency = currency;
        self.persist(&state, CollectionKey::Currency).await;
    }

    /// Applies every sync-tick transition to the current collections.
    ///
    /// Eligibility is read from the records' status at call time. Only the
    /// collections where something changed are written back.
    pub(crate) async fn apply_sync(&self, decisions: &dyn DecisionProvider) -> SyncReport {
        let mut state = self.state.write().await;

        let movements = state
            .movements
            .iter_mut()
            .map(lifecycle::sync_movement)
            .filter(|changed| *changed)
            .count();
        let requisitions = state
            .requisitions
            .iter_mut()
            .map(|r| lifecycle::sync_requisition(r, |r| decisions.decide(r)))
            .filter(|changed| *changed)
            .count();
        let attendance = state
            .attendance
            .iter_mut()
            .map(lifecycle::sync_attendance)
            .filter(|changed| *changed)
            .count();
        let tools = state
            .tools
            .iter_mut()
            .map(lifecycle::sync_tool)
            .filter(|changed| *changed)
            .count();

        let report = SyncReport {
            movements,
            requisitions,
            attendance,
            tools,
        };

        for (changed, key) in [
            (movements, CollectionKey::Movements),
            (requisitions, CollectionKey::Requisitions),
            (attendance, CollectionKey::Attendance),
            (tools, CollectionKey::Tools),
        ] {
            if changed > 0 {
                self.persist(&state, key).await;
            }
        }

        report
    }
}

async fn write_collection(db: &DatabaseConnection, state: &Collections, key: CollectionKey) {
    match key {
        CollectionKey::Items => save(db, key, &state.items).await,
        CollectionKey::Movements => save(db, key, &state.movements).await,
        CollectionKey::Requisitions => save(db, key, &state.requisitions).await,
        CollectionKey::Attendance => save(db, key, &state.attendance).await,
        CollectionKey::Employees => save(db, key, &state.employees).await,
        CollectionKey::Tools => save(db, key, &state.tools).await,
        CollectionKey::Projects => save(db, key, &state.projects).await,
        CollectionKey::Currency => save(db, key, &state.currency).await,
    }
}

async fn save<T: Serialize + ?Sized>(db: &DatabaseConnection, key: CollectionKey, value: &T) {
    persistence::save_or_log(db, key, value).await;
}
