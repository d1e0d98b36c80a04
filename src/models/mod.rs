//! Domain records held by the site store.
//!
//! Every record is a plain serde type. Field and variant names serialize to the
//! camelCase / lowercase strings the mobile client has always written, so a
//! persisted collection keeps the same shape across versions.
//!
//! Cross-record references (`item_id`, `employee_id`, `assigned_to`) are bare ids.
//! They are never owning pointers and may dangle; resolve them through the
//! store's `get_*_by_id` lookups, which return `Option`.

pub mod attendance;
pub mod currency;
pub mod employee;
pub mod item;
pub mod movement;
pub mod project;
pub mod requisition;
pub mod tool;

pub use attendance::{AttendanceRecord, AttendanceStatus, NewAttendance};
pub use currency::{Currency, USD_TO_CDF_RATE};
pub use employee::Employee;
pub use item::Item;
pub use movement::{MovementKind, MovementStatus, NewMovement, StockMovement};
pub use project::{NewProject, Project, ProjectStatus};
pub use requisition::{
    ErpDecision, NewRequisition, PurchaseRequisition, RequisitionLine, RequisitionStatus,
};
pub use tool::{NewTool, Tool, ToolAction, ToolCondition, ToolPatch, ToolStatus, ToolSyncStatus};

/// Generates a fresh record id of the form `<prefix>-<uuid>`.
///
/// Ids are never reused, even after the record they named is gone.
#[must_use]
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}
