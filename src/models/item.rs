//! Stock item - one line of the site inventory.

use super::MovementKind;
use serde::{Deserialize, Serialize};

/// An inventory item. Quantity only changes through stock movements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier
    pub id: String,
    /// Display name (e.g. "Ciment Portland 50kg")
    pub name: String,
    /// Reference code in the ERP catalogue
    #[serde(rename = "odooRef")]
    pub erp_ref: String,
    /// Quantity on hand. Not clamped: exits larger than the stock drive it negative.
    pub quantity: i64,
    /// Free-form category label used for grouping in reports
    pub category: String,
    /// Cost of one unit in base currency
    pub unit_cost: f64,
}

impl Item {
    /// Value of the quantity on hand, in base currency.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.unit_cost
    }

    /// Adjusts the quantity on hand for one movement of `quantity` units.
    pub const fn apply_movement(&mut self, kind: MovementKind, quantity: i64) {
        self.quantity += kind.signed(quantity);
    }
}
