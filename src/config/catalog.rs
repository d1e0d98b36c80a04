//! Seed catalogue loaded from config.toml.
//!
//! Reference data (items, employees, tools, projects) is seeded into the store the
//! first time a collection is opened and nothing has been persisted for it yet. Each
//! section of config.toml is optional; a missing section falls back to the built-in
//! demo catalogue.

use crate::models::{
    Employee, Item, Project, ProjectStatus, Tool, ToolCondition, ToolStatus, ToolSyncStatus,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

/// Seed entry for a stock item
#[derive(Debug, Deserialize, Clone)]
pub struct ItemSeed {
    /// Item identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// ERP reference code
    pub erp_ref: String,
    /// Opening quantity
    pub quantity: i64,
    /// Category label
    pub category: String,
    /// Unit cost in base currency
    pub unit_cost: f64,
}

/// Seed entry for an employee
#[derive(Debug, Deserialize, Clone)]
pub struct EmployeeSeed {
    /// Employee identifier
    pub id: String,
    /// Full name
    pub name: String,
    /// ERP reference
    pub erp_ref: String,
}

/// Seed entry for a tool
#[derive(Debug, Deserialize, Clone)]
pub struct ToolSeed {
    /// Tool identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Serial number or internal tag
    pub asset_tag: String,
    /// Category label
    pub category: String,
    /// Opening status, `available` if omitted
    #[serde(default = "default_tool_status")]
    pub status: ToolStatus,
    /// Employee holding the tool, only kept when `status` is `in_use`
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Purchase date (`YYYY-MM-DD`)
    pub purchase_date: NaiveDate,
    /// Physical condition
    pub condition: ToolCondition,
    /// Last maintenance date (`YYYY-MM-DD`)
    #[serde(default)]
    pub last_maintenance_date: Option<NaiveDate>,
}

const fn default_tool_status() -> ToolStatus {
    ToolStatus::Available
}

/// Seed entry for a project
#[derive(Debug, Deserialize, Clone)]
pub struct ProjectSeed {
    /// Project identifier
    pub id: String,
    /// Project name
    pub name: String,
    /// Reference code
    pub reference: String,
    /// Client name
    pub client_name: String,
    /// Site address
    pub address: String,
    /// Start date (`YYYY-MM-DD`)
    pub start_date: NaiveDate,
    /// End date (`YYYY-MM-DD`)
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Progress status
    pub status: ProjectStatus,
    /// Budget in base currency
    #[serde(default)]
    pub budget: Option<f64>,
}

/// Reference data used to populate empty collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedCatalog {
    /// Opening stock
    pub items: Vec<Item>,
    /// Site employees
    pub employees: Vec<Employee>,
    /// Tool park
    pub tools: Vec<Tool>,
    /// Known projects
    pub projects: Vec<Project>,
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

fn ymd(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(midnight_utc)
        .unwrap_or_default()
}

impl From<ItemSeed> for Item {
    fn from(seed: ItemSeed) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            erp_ref: seed.erp_ref,
            quantity: seed.quantity,
            category: seed.category,
            unit_cost: seed.unit_cost,
        }
    }
}

impl From<EmployeeSeed> for Employee {
    fn from(seed: EmployeeSeed) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            erp_ref: seed.erp_ref,
        }
    }
}

impl From<ToolSeed> for Tool {
    fn from(seed: ToolSeed) -> Self {
        let assigned_to = if seed.status == ToolStatus::InUse {
            seed.assigned_to
        } else {
            None
        };
        Self {
            id: seed.id,
            name: seed.name,
            asset_tag: seed.asset_tag,
            category: seed.category,
            status: seed.status,
            assigned_to,
            purchase_date: midnight_utc(seed.purchase_date),
            condition: seed.condition,
            last_maintenance_date: seed.last_maintenance_date.map(midnight_utc),
            sync_status: ToolSyncStatus::Synced,
        }
    }
}

impl From<ProjectSeed> for Project {
    fn from(seed: ProjectSeed) -> Self {
        Self {
            id: seed.id,
            name: seed.name,
            reference: seed.reference,
            client_name: seed.client_name,
            address: seed.address,
            start_date: midnight_utc(seed.start_date),
            end_date: seed.end_date.map(midnight_utc),
            status: seed.status,
            budget: seed.budget,
        }
    }
}

impl SeedCatalog {
    /// The demo catalogue shipped with the application. Costs and budgets are in CDF.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            items: builtin_items(),
            employees: builtin_employees(),
            tools: builtin_tools(),
            projects: builtin_projects(),
        }
    }
}

fn item(
    id: &str,
    name: &str,
    erp_ref: &str,
    quantity: i64,
    category: &str,
    unit_cost: f64,
) -> Item {
    Item {
        id: id.to_string(),
        name: name.to_string(),
        erp_ref: erp_ref.to_string(),
        quantity,
        category: category.to_string(),
        unit_cost,
    }
}

fn builtin_items() -> Vec<Item> {
    vec![
        item("item-1", "Ciment Portland 50kg", "CEM-001", 120, "Matériaux bruts", 22_400.0),
        item("item-2", "Brique pleine", "BRI-004", 5000, "Maçonnerie", 1_400.0),
        item("item-3", "Barre d'acier 12mm", "AC-012", 350, "Ferraillage", 42_000.0),
        item("item-4", "Sable de rivière (m3)", "SAB-002", 45, "Matériaux bruts", 70_000.0),
    ]
}

fn builtin_employees() -> Vec<Employee> {
    [
        ("emp-1", "Jean Dupont", "E-1001"),
        ("emp-2", "Marie Curie", "E-1002"),
        ("emp-3", "Pierre Martin", "E-1003"),
    ]
    .into_iter()
    .map(|(id, name, erp_ref)| Employee {
        id: id.to_string(),
        name: name.to_string(),
        erp_ref: erp_ref.to_string(),
    })
    .collect()
}

fn builtin_tools() -> Vec<Tool> {
    vec![
        Tool {
            id: "tool-1".to_string(),
            name: "Perceuse-visseuse Bosch".to_string(),
            asset_tag: "BOSCH-1001".to_string(),
            category: "Électroportatif".to_string(),
            status: ToolStatus::Available,
            assigned_to: None,
            purchase_date: ymd(2023, 1, 15),
            condition: ToolCondition::Good,
            last_maintenance_date: None,
            sync_status: ToolSyncStatus::Synced,
        },
        Tool {
            id: "tool-2".to_string(),
            name: "Marteau-piqueur Hilti".to_string(),
            asset_tag: "HILTI-2005".to_string(),
            category: "Gros outillage".to_string(),
            status: ToolStatus::InUse,
            assigned_to: Some("emp-1".to_string()),
            purchase_date: ymd(2022, 11, 1),
            condition: ToolCondition::Good,
            last_maintenance_date: None,
            sync_status: ToolSyncStatus::Synced,
        },
        Tool {
            id: "tool-3".to_string(),
            name: "Scie circulaire Makita".to_string(),
            asset_tag: "MAKITA-3002".to_string(),
            category: "Électroportatif".to_string(),
            status: ToolStatus::InMaintenance,
            assigned_to: None,
            purchase_date: ymd(2023, 3, 20),
            condition: ToolCondition::Fair,
            last_maintenance_date: Some(Utc::now()),
            sync_status: ToolSyncStatus::Synced,
        },
    ]
}

fn builtin_projects() -> Vec<Project> {
    vec![
        Project {
            id: "proj-1".to_string(),
            name: "Villa de luxe - Lot A".to_string(),
            reference: "CHA-2024-001".to_string(),
            client_name: "Client Particulier".to_string(),
            address: "123 Rue de la Plage, Nice".to_string(),
            start_date: ymd(2024, 5, 10),
            end_date: None,
            status: ProjectStatus::InProgress,
            budget: Some(420_000_000.0),
        },
        Project {
            id: "proj-2".to_string(),
            name: "Immeuble de bureaux - B2".to_string(),
            reference: "CHA-2024-002".to_string(),
            client_name: "SCI Invest".to_string(),
            address: "45 Avenue du Progrès, Lyon".to_string(),
            start_date: ymd(2024, 3, 1),
            end_date: None,
            status: ProjectStatus::InProgress,
            budget: Some(2_100_000_000.0),
        },
        Project {
            id: "proj-3".to_string(),
            name: "Rénovation École Primaire".to_string(),
            reference: "CHA-2023-015".to_string(),
            client_name: "Mairie de Paris".to_string(),
            address: "1 Place de la République, Paris".to_string(),
            start_date: ymd(2023, 9, 1),
            end_date: Some(ymd(2024, 6, 30)),
            status: ProjectStatus::Completed,
            budget: Some(280_000_000.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_builtin_catalog_keeps_assignment_invariant() {
        let catalog = SeedCatalog::builtin();
        assert_eq!(catalog.items.len(), 4);
        assert_eq!(catalog.employees.len(), 3);
        for tool in &catalog.tools {
            assert_eq!(tool.assigned_to.is_some(), tool.status == ToolStatus::InUse);
        }
    }

    #[test]
    fn test_tool_seed_drops_assignment_unless_in_use() {
        let seed = ToolSeed {
            id: "tool-9".to_string(),
            name: "Niveau laser".to_string(),
            asset_tag: "LASER-1".to_string(),
            category: "Mesure".to_string(),
            status: ToolStatus::Available,
            assigned_to: Some("emp-2".to_string()),
            purchase_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            condition: ToolCondition::New,
            last_maintenance_date: None,
        };
        let tool = Tool::from(seed);
        assert_eq!(tool.assigned_to, None);
        assert_eq!(tool.sync_status, ToolSyncStatus::Synced);
        assert_eq!(tool.purchase_date.to_rfc3339(), "2024-01-02T00:00:00+00:00");
    }
}
