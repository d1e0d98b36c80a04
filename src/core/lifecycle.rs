//! Status lifecycle rules.
//!
//! Pure transition functions for every record kind that moves through a sync or
//! approval lifecycle. They take a record, decide whether it is eligible, and
//! mutate it in place. Each returns `true` when the record changed, so callers can
//! count transitions and skip writes when nothing moved.
//!
//! Two triggers drive them: explicit user actions (attendance validation, tool
//! edits and actions) and the periodic sync tick.

use crate::{
    errors::{Error, Result},
    models::{
        AttendanceRecord, AttendanceStatus, ErpDecision, MovementStatus, PurchaseRequisition,
        RequisitionStatus, StockMovement, Tool, ToolAction, ToolStatus, ToolSyncStatus,
    },
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Sync tick: `pending → synced`.
pub fn sync_movement(movement: &mut StockMovement) -> bool {
    if movement.status != MovementStatus::Pending {
        return false;
    }
    movement.status = MovementStatus::Synced;
    true
}

/// Sync tick: `pending → synced-waiting`, recording the upstream decision.
///
/// `decide` is only called for eligible requisitions. The decision is stored next
/// to the status and never written into it.
pub fn sync_requisition(
    requisition: &mut PurchaseRequisition,
    decide: impl FnOnce(&PurchaseRequisition) -> ErpDecision,
) -> bool {
    if requisition.status != RequisitionStatus::Pending {
        return false;
    }
    let decision = decide(requisition);
    requisition.status = RequisitionStatus::SyncedWaiting;
    requisition.erp_decision = Some(decision);
    true
}

/// User validation: `pending → validated` when the record id is in `selected`.
pub fn validate_attendance(record: &mut AttendanceRecord, selected: &HashSet<&str>) -> bool {
    if record.status != AttendanceStatus::Pending || !selected.contains(record.id.as_str()) {
        return false;
    }
    record.status = AttendanceStatus::Validated;
    true
}

/// Sync tick: `validated → synced`.
pub fn sync_attendance(record: &mut AttendanceRecord) -> bool {
    if record.status != AttendanceStatus::Validated {
        return false;
    }
    record.status = AttendanceStatus::Synced;
    true
}

/// Sync status after a local edit: a synced tool becomes `pending_update`, a tool
/// that is already pending keeps its pending kind.
#[must_use]
pub const fn tool_sync_after_update(previous: ToolSyncStatus) -> ToolSyncStatus {
    match previous {
        ToolSyncStatus::Synced => ToolSyncStatus::PendingUpdate,
        pending => pending,
    }
}

/// Sync tick: any pending tool becomes `synced`.
pub fn sync_tool(tool: &mut Tool) -> bool {
    if tool.sync_status == ToolSyncStatus::Synced {
        return false;
    }
    tool.sync_status = ToolSyncStatus::Synced;
    true
}

/// Operational status every accepted `action` leads to.
#[must_use]
pub const fn tool_action_target(action: &ToolAction) -> ToolStatus {
    match action {
        ToolAction::Assign { .. } => ToolStatus::InUse,
        ToolAction::ReturnToStock | ToolAction::FinishMaintenance => ToolStatus::Available,
        ToolAction::StartMaintenance => ToolStatus::InMaintenance,
        ToolAction::DeclareLost => ToolStatus::Lost,
    }
}

/// Operational status reached by `action` from `from`.
///
/// Repeating the transition that led to `from` is accepted and keeps the status.
///
/// # Errors
/// Returns [`Error::InvalidToolTransition`] when the action would move the tool
/// to another status along an edge that does not exist.
pub fn next_tool_status(
    tool_id: &str,
    from: ToolStatus,
    action: &ToolAction,
) -> Result<ToolStatus> {
    let target = tool_action_target(action);
    let allowed = from == target
        || matches!(
            (from, action),
            (ToolStatus::Available, ToolAction::Assign { .. })
                | (ToolStatus::InUse, ToolAction::ReturnToStock)
                | (ToolStatus::InMaintenance, ToolAction::FinishMaintenance)
                | (
                    ToolStatus::Available | ToolStatus::InUse,
                    ToolAction::StartMaintenance
                )
                | (_, ToolAction::DeclareLost)
        );

    if allowed {
        Ok(target)
    } else {
        Err(Error::InvalidToolTransition {
            tool_id: tool_id.to_string(),
            from: from.to_string(),
            action: action.to_string(),
        })
    }
}

/// Applies a user action to a tool: moves its operational status, keeps the
/// assignment consistent with it, stamps maintenance, and marks the tool for sync.
///
/// The tool is left untouched when the action is rejected.
///
/// # Errors
/// Returns [`Error::InvalidToolTransition`] when the action is not allowed from the
/// tool's current status.
pub fn apply_tool_action(tool: &mut Tool, action: ToolAction, now: DateTime<Utc>) -> Result<()> {
    let next = next_tool_status(&tool.id, tool.status, &action)?;

    match action {
        ToolAction::Assign { employee_id } => tool.assigned_to = Some(employee_id),
        ToolAction::StartMaintenance => {
            tool.assigned_to = None;
            tool.last_maintenance_date = Some(now);
        }
        ToolAction::ReturnToStock | ToolAction::FinishMaintenance | ToolAction::DeclareLost => {
            tool.assigned_to = None;
        }
    }
    tool.status = next;
    tool.sync_status = tool_sync_after_update(tool.sync_status);
    Ok(())
}
