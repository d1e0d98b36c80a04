//! Employee reference data.

use serde::{Deserialize, Serialize};

/// A site employee. Static reference data seeded from configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// Reference in the ERP HR module
    #[serde(rename = "odooRef")]
    pub erp_ref: String,
}
