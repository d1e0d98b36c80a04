//! Tools and equipment tracked per asset tag.
//!
//! A tool carries two independent state machines: its operational status
//! (available, in use, in maintenance, lost), driven by user actions, and its
//! sync status, driven by local edits and the periodic sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operational status of a tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    /// In the store, can be assigned
    Available,
    /// Assigned to an employee
    InUse,
    /// Out for maintenance
    InMaintenance,
    /// Declared lost
    Lost,
}

impl ToolStatus {
    /// French display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Disponible",
            Self::InUse => "En utilisation",
            Self::InMaintenance => "En maintenance",
            Self::Lost => "Perdu",
        }
    }
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "available",
            Self::InUse => "in_use",
            Self::InMaintenance => "in_maintenance",
            Self::Lost => "lost",
        };
        f.write_str(name)
    }
}

/// Physical condition of a tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCondition {
    /// Never used
    New,
    /// Fully functional
    Good,
    /// Worn but usable
    Fair,
    /// Needs replacement soon
    Poor,
}

impl ToolCondition {
    /// French display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "Neuf",
            Self::Good => "Bon",
            Self::Fair => "Moyen",
            Self::Poor => "Mauvais",
        }
    }
}

/// Sync status of a tool record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSyncStatus {
    /// Matches the upstream copy
    Synced,
    /// Created locally, never pushed
    PendingAdd,
    /// Edited locally since the last push
    PendingUpdate,
}

/// A tracked tool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Serial number or internal tag
    pub asset_tag: String,
    /// Category label
    pub category: String,
    /// Operational status
    pub status: ToolStatus,
    /// Employee holding the tool; set exactly when `status` is `InUse`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Purchase date
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub purchase_date: DateTime<Utc>,
    /// Physical condition
    pub condition: ToolCondition,
    /// Last time the tool was sent to maintenance
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_maintenance_date: Option<DateTime<Utc>>,
    /// Sync status
    pub sync_status: ToolSyncStatus,
}

/// Input for registering a new tool. New tools start available and unassigned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTool {
    /// Display name
    pub name: String,
    /// Serial number or internal tag
    pub asset_tag: String,
    /// Category label
    pub category: String,
    /// Purchase date
    pub purchase_date: DateTime<Utc>,
    /// Physical condition
    pub condition: ToolCondition,
}

/// Partial edit of a tool's descriptive fields. `None` leaves a field untouched.
///
/// Operational status changes go through [`ToolAction`] instead so the
/// assignment invariant is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPatch {
    /// New display name
    pub name: Option<String>,
    /// New asset tag
    pub asset_tag: Option<String>,
    /// New category
    pub category: Option<String>,
    /// New condition
    pub condition: Option<ToolCondition>,
    /// Corrected purchase date
    pub purchase_date: Option<DateTime<Utc>>,
}

impl ToolPatch {
    /// Copies every provided field onto `tool`.
    pub fn apply_to(self, tool: &mut Tool) {
        if let Some(name) = self.name {
            tool.name = name;
        }
        if let Some(asset_tag) = self.asset_tag {
            tool.asset_tag = asset_tag;
        }
        if let Some(category) = self.category {
            tool.category = category;
        }
        if let Some(condition) = self.condition {
            tool.condition = condition;
        }
        if let Some(purchase_date) = self.purchase_date {
            tool.purchase_date = purchase_date;
        }
    }
}

/// User action on a tool's operational status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolAction {
    /// Hand an available tool to an employee
    Assign {
        /// Employee receiving the tool
        employee_id: String,
    },
    /// Bring a tool in use back to the store
    ReturnToStock,
    /// Send an available or in-use tool to maintenance
    StartMaintenance,
    /// Bring a tool back from maintenance
    FinishMaintenance,
    /// Declare the tool lost, from any status
    DeclareLost,
}

impl fmt::Display for ToolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assign { .. } => "assign",
            Self::ReturnToStock => "return to stock",
            Self::StartMaintenance => "start maintenance",
            Self::FinishMaintenance => "finish maintenance",
            Self::DeclareLost => "declare lost",
        };
        f.write_str(name)
    }
}
