//! Purchase requisition - a request for one or more items, approved upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Local lifecycle status of a requisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequisitionStatus {
    /// Created on the device, not yet pushed
    Pending,
    /// Pushed upstream; the decision lives in [`PurchaseRequisition::erp_decision`]
    SyncedWaiting,
    /// Approved upstream
    Approved,
    /// Rejected upstream
    Rejected,
}

/// Decision label reported by the ERP for a synced requisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErpDecision {
    /// Still under review upstream
    #[serde(rename = "En attente")]
    Waiting,
    /// Approved upstream
    #[serde(rename = "Approuvée")]
    Approved,
    /// Rejected upstream
    #[serde(rename = "Rejetée")]
    Rejected,
}

impl ErpDecision {
    /// Every decision the upstream system can report.
    pub const ALL: [Self; 3] = [Self::Approved, Self::Rejected, Self::Waiting];

    /// Label exactly as the ERP reports it.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Waiting => "En attente",
            Self::Approved => "Approuvée",
            Self::Rejected => "Rejetée",
        }
    }
}

/// One requested item and its quantity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionLine {
    /// Requested item (may dangle)
    pub item_id: String,
    /// Requested quantity
    pub quantity: i64,
}

/// A purchase requisition raised on site.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequisition {
    /// Unique identifier
    pub id: String,
    /// Site manager who raised the request
    #[serde(rename = "siteManager")]
    pub requester: String,
    /// Requested lines, in entry order
    pub items: Vec<RequisitionLine>,
    /// Creation time, assigned once
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Local lifecycle status
    pub status: RequisitionStatus,
    /// Decision reported by the ERP once synced
    #[serde(rename = "odooStatus", default, skip_serializing_if = "Option::is_none")]
    pub erp_decision: Option<ErpDecision>,
}

impl PurchaseRequisition {
    /// Status as the user should see it.
    ///
    /// The sync step only ever stores `SyncedWaiting` plus a decision label; a final
    /// upstream decision is folded back into the status here.
    #[must_use]
    pub const fn effective_status(&self) -> RequisitionStatus {
        match self.erp_decision {
            Some(ErpDecision::Approved) => RequisitionStatus::Approved,
            Some(ErpDecision::Rejected) => RequisitionStatus::Rejected,
            Some(ErpDecision::Waiting) | None => self.status,
        }
    }

    /// Whether the requisition still awaits a final decision.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(
            self.effective_status(),
            RequisitionStatus::Approved | RequisitionStatus::Rejected
        )
    }
}

/// Input for raising a new requisition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRequisition {
    /// Site manager raising the request
    pub requester: String,
    /// Requested lines
    pub items: Vec<RequisitionLine>,
}
