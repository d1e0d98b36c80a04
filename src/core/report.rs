//! Derived reporting views.
//!
//! Every function here is a pure computation over collection snapshots: stock
//! valuation, low-stock detection, cost attribution by category and by project,
//! attendance totals, and the list filters and dashboard counters shown by the
//! client. Nothing is cached; callers recompute whenever their inputs change.
//! Amounts are in base currency.

use crate::{
    core::store::Collections,
    models::{
        AttendanceRecord, AttendanceStatus, Employee, Item, MovementKind, MovementStatus, Project,
        ProjectStatus, PurchaseRequisition, RequisitionStatus, StockMovement, ToolStatus,
        ToolSyncStatus,
    },
};
use chrono::{DateTime, NaiveDate, Utc};

/// Items strictly below this quantity count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 50;

/// Placeholder shown for references that do not resolve.
pub const UNKNOWN_LABEL: &str = "Inconnu";

/// Value (or cost) accumulated for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryValue {
    /// Category label
    pub category: String,
    /// Accumulated amount
    pub value: f64,
}

/// Total stock value: Σ quantity × unit cost.
#[must_use]
pub fn stock_valuation(items: &[Item]) -> f64 {
    items.iter().map(Item::stock_value).sum()
}

/// Whether `item` is below the low-stock threshold.
#[must_use]
pub const fn is_low_stock(item: &Item) -> bool {
    item.quantity < LOW_STOCK_THRESHOLD
}

/// Items below the low-stock threshold, in collection order.
#[must_use]
pub fn low_stock_items(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|i| is_low_stock(i)).collect()
}

fn add_to_category(groups: &mut Vec<CategoryValue>, category: &str, amount: f64) {
    if let Some(group) = groups.iter_mut().find(|g| g.category == category) {
        group.value += amount;
    } else {
        groups.push(CategoryValue {
            category: category.to_string(),
            value: amount,
        });
    }
}

/// Stock value per category, highest value first.
#[must_use]
pub fn category_valuation(items: &[Item]) -> Vec<CategoryValue> {
    let mut groups = Vec::new();
    for item in items {
        add_to_category(&mut groups, &item.category, item.stock_value());
    }
    groups.sort_by(|a, b| b.value.total_cmp(&a.value));
    groups
}

/// Distinct item categories, in order of first appearance.
#[must_use]
pub fn item_categories(items: &[Item]) -> Vec<&str> {
    let mut categories: Vec<&str> = Vec::new();
    for item in items {
        if !categories.contains(&item.category.as_str()) {
            categories.push(&item.category);
        }
    }
    categories
}

/// Inventory list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    /// Keep only low-stock items
    pub low_stock_only: bool,
    /// Keep only this category
    pub category: Option<String>,
}

/// Items matching `filter`, in collection order.
#[must_use]
pub fn filter_inventory<'a>(items: &'a [Item], filter: &InventoryFilter) -> Vec<&'a Item> {
    items
        .iter()
        .filter(|item| !filter.low_stock_only || is_low_stock(item))
        .filter(|item| filter.category.as_ref().is_none_or(|c| &item.category == c))
        .collect()
}

/// Inclusive calendar-day range. Open ends are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Whether the UTC calendar day of `at` falls inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Filter for the material cost report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialCostFilter {
    /// Case-insensitive substring of the movement destination (e.g. a site lot)
    pub destination: Option<String>,
    /// Movement dates to include
    pub dates: DateRange,
}

/// Material cost grouped by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialCostReport {
    /// Cost per item category, in order of first appearance
    pub categories: Vec<CategoryValue>,
    /// Sum over all categories
    pub total: f64,
}

#[allow(clippy::cast_precision_loss)]
fn movement_cost(movement: &StockMovement, item: &Item) -> f64 {
    movement.quantity as f64 * item.unit_cost
}

fn find_item<'a>(items: &'a [Item], id: &str) -> Option<&'a Item> {
    items.iter().find(|i| i.id == id)
}

/// Cost of material sent out of the store, grouped by item category.
///
/// Only exit movements count. Movements whose item no longer exists are skipped.
#[must_use]
pub fn material_cost_by_category(
    movements: &[StockMovement],
    items: &[Item],
    filter: &MaterialCostFilter,
) -> MaterialCostReport {
    let mut report = MaterialCostReport::default();

    let matching = movements
        .iter()
        .filter(|m| m.kind == MovementKind::Exit)
        .filter(|m| filter.dates.contains(m.timestamp))
        .filter(|m| {
            filter
                .destination
                .as_deref()
                .is_none_or(|d| d.is_empty() || contains_ignore_case(&m.counterparty, d))
        });

    for movement in matching {
        let Some(item) = find_item(items, &movement.item_id) else {
            continue;
        };
        let cost = movement_cost(movement, item);
        report.total += cost;
        add_to_category(&mut report.categories, &item.category, cost);
    }

    report
}

/// Whether an exit movement is attributed to `project`.
///
/// There is no explicit link between movements and projects: a movement belongs
/// to a project when its destination mentions the project's name or reference,
/// ignoring case.
#[must_use]
pub fn movement_matches_project(movement: &StockMovement, project: &Project) -> bool {
    movement.kind == MovementKind::Exit
        && (contains_ignore_case(&movement.counterparty, &project.name)
            || contains_ignore_case(&movement.counterparty, &project.reference))
}

/// One movement's contribution to a project's material cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCostLine {
    /// Movement id
    pub movement_id: String,
    /// Item name
    pub item_name: String,
    /// Units sent
    pub quantity: i64,
    /// When the material left the store
    pub timestamp: DateTime<Utc>,
    /// Quantity × unit cost
    pub cost: f64,
}

/// Material cost attributed to one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectCostReport {
    /// Contributing movements, in collection order
    pub lines: Vec<ProjectCostLine>,
    /// Sum of line costs
    pub total: f64,
}

/// Material cost attributed to `project` through [`movement_matches_project`].
#[must_use]
pub fn project_material_costs(
    project: &Project,
    movements: &[StockMovement],
    items: &[Item],
) -> ProjectCostReport {
    let lines: Vec<ProjectCostLine> = movements
        .iter()
        .filter(|m| movement_matches_project(m, project))
        .filter_map(|m| {
            let item = find_item(items, &m.item_id)?;
            Some(ProjectCostLine {
                movement_id: m.id.clone(),
                item_name: item.name.clone(),
                quantity: m.quantity,
                timestamp: m.timestamp,
                cost: movement_cost(m, item),
            })
        })
        .collect();
    let total = lines.iter().map(|l| l.cost).sum();

    ProjectCostReport { lines, total }
}

/// Hours worked by one employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeHours {
    /// Employee id
    pub employee_id: String,
    /// Employee name, or [`UNKNOWN_LABEL`]
    pub name: String,
    /// Sum of worked hours
    pub hours: f64,
    /// Number of records summed
    pub records: usize,
}

/// Name of an employee, or [`UNKNOWN_LABEL`] when the id does not resolve.
#[must_use]
pub fn employee_name<'a>(employees: &'a [Employee], id: &str) -> &'a str {
    employees
        .iter()
        .find(|e| e.id == id)
        .map_or(UNKNOWN_LABEL, |e| e.name.as_str())
}

/// Worked hours per employee, in order of first appearance.
#[must_use]
pub fn attendance_totals(
    records: &[AttendanceRecord],
    employees: &[Employee],
) -> Vec<EmployeeHours> {
    let mut totals: Vec<EmployeeHours> = Vec::new();
    for record in records {
        if let Some(total) = totals.iter_mut().find(|t| t.employee_id == record.employee_id) {
            total.hours += record.worked_hours;
            total.records += 1;
        } else {
            totals.push(EmployeeHours {
                employee_id: record.employee_id.clone(),
                name: employee_name(employees, &record.employee_id).to_string(),
                hours: record.worked_hours,
                records: 1,
            });
        }
    }
    totals
}

/// Which requisitions a list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequisitionView {
    /// Everything
    #[default]
    All,
    /// Not yet synced
    PendingSync,
    /// Synced, decision still "En attente"
    AwaitingDecision,
    /// Approved upstream
    Approved,
    /// Rejected upstream
    Rejected,
}

impl RequisitionView {
    /// Whether `requisition` belongs in this view.
    #[must_use]
    pub fn matches(self, requisition: &PurchaseRequisition) -> bool {
        match self {
            Self::All => true,
            Self::PendingSync => requisition.status == RequisitionStatus::Pending,
            Self::AwaitingDecision => {
                requisition.status == RequisitionStatus::SyncedWaiting
                    && requisition.effective_status() == RequisitionStatus::SyncedWaiting
            }
            Self::Approved => requisition.effective_status() == RequisitionStatus::Approved,
            Self::Rejected => requisition.effective_status() == RequisitionStatus::Rejected,
        }
    }
}

/// Requisition list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequisitionFilter {
    /// Status view
    pub view: RequisitionView,
    /// Creation dates to include
    pub dates: DateRange,
}

/// Requisitions matching `filter`, newest first.
#[must_use]
pub fn filter_requisitions<'a>(
    requisitions: &'a [PurchaseRequisition],
    filter: &RequisitionFilter,
) -> Vec<&'a PurchaseRequisition> {
    let mut matching: Vec<&PurchaseRequisition> = requisitions
        .iter()
        .filter(|r| filter.dates.contains(r.timestamp))
        .filter(|r| filter.view.matches(r))
        .collect();
    matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    matching
}

/// Records waiting for the next sync: pending movements and requisitions,
/// validated attendance, and tools with local changes.
#[must_use]
pub fn pending_sync_count(collections: &Collections) -> usize {
    let movements = collections
        .movements
        .iter()
        .filter(|m| m.status == MovementStatus::Pending)
        .count();
    let requisitions = collections
        .requisitions
        .iter()
        .filter(|r| r.status == RequisitionStatus::Pending)
        .count();
    let attendance = collections
        .attendance
        .iter()
        .filter(|a| a.status == AttendanceStatus::Validated)
        .count();
    let tools = collections
        .tools
        .iter()
        .filter(|t| t.sync_status != ToolSyncStatus::Synced)
        .count();

    movements + requisitions + attendance + tools
}

/// Headline counters for the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Projects in progress
    pub active_projects: usize,
    /// Requisitions without a final decision
    pub open_requisitions: usize,
    /// Items below the low-stock threshold
    pub low_stock_items: usize,
    /// Tools assigned to someone
    pub tools_in_use: usize,
    /// Tools out for maintenance
    pub tools_in_maintenance: usize,
    /// Records waiting for the next sync
    pub pending_syncs: usize,
}

/// Computes the dashboard counters.
#[must_use]
pub fn dashboard_summary(collections: &Collections) -> DashboardSummary {
    let tools_with = |status: ToolStatus| {
        collections
            .tools
            .iter()
            .filter(|t| t.status == status)
            .count()
    };

    DashboardSummary {
        active_projects: collections
            .projects
            .iter()
            .filter(|p| p.status == ProjectStatus::InProgress)
            .count(),
        open_requisitions: collections.requisitions.iter().filter(|r| r.is_open()).count(),
        low_stock_items: low_stock_items(&collections.items).len(),
        tools_in_use: tools_with(ToolStatus::InUse),
        tools_in_maintenance: tools_with(ToolStatus::InMaintenance),
        pending_syncs: pending_sync_count(collections),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::catalog::SeedCatalog;
    use crate::models::{ErpDecision, ToolCondition};
    use chrono::TimeZone;

    fn item(id: &str, quantity: i64, category: &str, unit_cost: f64) -> Item {
        Item {
            id: id.to_string(),
            name: format!("Article {id}"),
            erp_ref: format!("REF-{id}"),
            quantity,
            category: category.to_string(),
            unit_cost,
        }
    }

    fn exit(id: &str, item_id: &str, quantity: i64, destination: &str, day: u32) -> StockMovement {
        StockMovement {
            id: id.to_string(),
            item_id: item_id.to_string(),
            kind: MovementKind::Exit,
            quantity,
            operator: "Magasinier".to_string(),
            counterparty: destination.to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, day, 14, 30, 0).unwrap(),
            status: MovementStatus::Pending,
        }
    }

    fn project(name: &str, reference: &str) -> Project {
        Project {
            id: "proj-1".to_string(),
            name: name.to_string(),
            reference: reference.to_string(),
            client_name: "Client".to_string(),
            address: "Adresse".to_string(),
            start_date: Utc::now(),
            end_date: None,
            status: ProjectStatus::InProgress,
            budget: None,
        }
    }

    fn requisition(id: &str, day: u32, decision: Option<ErpDecision>) -> PurchaseRequisition {
        PurchaseRequisition {
            id: id.to_string(),
            requester: "Chef".to_string(),
            items: vec![],
            timestamp: Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap(),
            status: if decision.is_some() {
                RequisitionStatus::SyncedWaiting
            } else {
                RequisitionStatus::Pending
            },
            erp_decision: decision,
        }
    }

    fn day(d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(2024, 6, d)
    }

    #[test]
    fn test_stock_valuation_is_linear_and_deterministic() {
        let items = SeedCatalog::builtin().items;
        let expected = 120.0 * 22_400.0 + 5000.0 * 1_400.0 + 350.0 * 42_000.0 + 45.0 * 70_000.0;
        assert_eq!(stock_valuation(&items), expected);
        assert_eq!(stock_valuation(&items), stock_valuation(&items));
        assert_eq!(stock_valuation(&[]), 0.0);
    }

    #[test]
    fn test_low_stock_is_strictly_below_threshold() {
        let items = vec![
            item("a", 49, "X", 1.0),
            item("b", 50, "X", 1.0),
            item("c", -3, "X", 1.0),
        ];
        let low: Vec<&str> = low_stock_items(&items).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(low, vec!["a", "c"]);
    }

    #[test]
    fn test_category_valuation_sorted_descending() {
        let items = SeedCatalog::builtin().items;
        let groups = category_valuation(&items);
        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["Ferraillage", "Maçonnerie", "Matériaux bruts"]);
        assert_eq!(groups[2].value, 120.0 * 22_400.0 + 45.0 * 70_000.0);
        let total: f64 = groups.iter().map(|g| g.value).sum();
        assert_eq!(total, stock_valuation(&items));
    }

    #[test]
    fn test_inventory_filter_and_categories() {
        let items = SeedCatalog::builtin().items;
        assert_eq!(
            item_categories(&items),
            vec!["Matériaux bruts", "Maçonnerie", "Ferraillage"]
        );

        let low = filter_inventory(
            &items,
            &InventoryFilter {
                low_stock_only: true,
                category: None,
            },
        );
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, "item-4");

        let raw = filter_inventory(
            &items,
            &InventoryFilter {
                low_stock_only: false,
                category: Some("Matériaux bruts".to_string()),
            },
        );
        assert_eq!(raw.len(), 2);
        assert_eq!(filter_inventory(&items, &InventoryFilter::default()).len(), 4);
    }

    #[test]
    fn test_material_cost_counts_exits_only() {
        let items = vec![item("i1", 0, "Ciment", 100.0), item("i2", 0, "Acier", 10.0)];
        let mut entry = exit("m0", "i1", 1000, "Fournisseur X", 1);
        entry.kind = MovementKind::Entry;
        let movements = vec![
            entry,
            exit("m1", "i1", 3, "Chantier A - Lot 1", 2),
            exit("m2", "i2", 5, "Chantier B", 3),
            exit("m3", "i1", 2, "chantier a - lot 2", 4),
            exit("m4", "missing", 7, "Chantier A", 4),
        ];

        let all = material_cost_by_category(&movements, &items, &MaterialCostFilter::default());
        assert_eq!(all.total, 550.0);
        assert_eq!(
            all.categories,
            vec![
                CategoryValue {
                    category: "Ciment".to_string(),
                    value: 500.0
                },
                CategoryValue {
                    category: "Acier".to_string(),
                    value: 50.0
                },
            ]
        );

        let lot_a = material_cost_by_category(
            &movements,
            &items,
            &MaterialCostFilter {
                destination: Some("CHANTIER A".to_string()),
                dates: DateRange::default(),
            },
        );
        assert_eq!(lot_a.total, 500.0);
        assert_eq!(lot_a.categories.len(), 1);
    }

    #[test]
    fn test_material_cost_date_range_is_inclusive() {
        let items = vec![item("i1", 0, "Ciment", 1.0)];
        let movements = vec![
            exit("m1", "i1", 1, "A", 1),
            exit("m2", "i1", 10, "A", 2),
            exit("m3", "i1", 100, "A", 3),
            exit("m4", "i1", 1000, "A", 4),
        ];
        let report = material_cost_by_category(
            &movements,
            &items,
            &MaterialCostFilter {
                destination: None,
                dates: DateRange {
                    from: day(2),
                    to: day(3),
                },
            },
        );
        assert_eq!(report.total, 110.0);
    }

    #[test]
    fn test_project_costs_match_name_or_reference() {
        let items = vec![item("i1", 0, "Ciment", 22_400.0)];
        let movements = vec![
            exit("m1", "i1", 10, "Villa de luxe - Lot A", 1),
            exit("m2", "i1", 5, "livraison cha-2024-001", 2),
            exit("m3", "i1", 7, "Immeuble B2", 3),
            exit("m4", "ghost", 1, "Villa de luxe - Lot A", 3),
        ];
        let p = project("Villa de luxe - Lot A", "CHA-2024-001");

        let report = project_material_costs(&p, &movements, &items);
        let ids: Vec<&str> = report.lines.iter().map(|l| l.movement_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert_eq!(report.lines[0].item_name, "Article i1");
        assert_eq!(report.total, 15.0 * 22_400.0);
    }

    #[test]
    fn test_entries_never_attributed_to_projects() {
        let p = project("Villa", "CHA-1");
        let mut entry = exit("m1", "i1", 1, "Villa", 1);
        entry.kind = MovementKind::Entry;
        assert!(!movement_matches_project(&entry, &p));
    }

    #[test]
    fn test_attendance_totals_with_unknown_employee() {
        let employees = SeedCatalog::builtin().employees;
        let record = |employee_id: &str, hours: f64| AttendanceRecord {
            id: format!("att-{employee_id}-{hours}"),
            employee_id: employee_id.to_string(),
            check_in: Utc::now(),
            check_out: Utc::now(),
            worked_hours: hours,
            status: AttendanceStatus::Pending,
            site_id: "s".to_string(),
            device_id: "d".to_string(),
        };
        let records = vec![record("emp-1", 8.0), record("emp-9", 4.0), record("emp-1", 7.5)];

        let totals = attendance_totals(&records, &employees);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].name, "Jean Dupont");
        assert_eq!(totals[0].hours, 15.5);
        assert_eq!(totals[0].records, 2);
        assert_eq!(totals[1].name, UNKNOWN_LABEL);
    }

    #[test]
    fn test_filter_requisitions_by_view_and_date() {
        let requisitions = vec![
            requisition("r1", 1, None),
            requisition("r2", 5, Some(ErpDecision::Waiting)),
            requisition("r3", 3, Some(ErpDecision::Approved)),
            requisition("r4", 4, Some(ErpDecision::Rejected)),
        ];
        let ids = |filter: RequisitionFilter| -> Vec<String> {
            filter_requisitions(&requisitions, &filter)
                .iter()
                .map(|r| r.id.clone())
                .collect()
        };

        assert_eq!(ids(RequisitionFilter::default()), vec!["r2", "r4", "r3", "r1"]);
        let view = |view| RequisitionFilter {
            view,
            dates: DateRange::default(),
        };
        assert_eq!(ids(view(RequisitionView::PendingSync)), vec!["r1"]);
        assert_eq!(ids(view(RequisitionView::AwaitingDecision)), vec!["r2"]);
        assert_eq!(ids(view(RequisitionView::Approved)), vec!["r3"]);
        assert_eq!(ids(view(RequisitionView::Rejected)), vec!["r4"]);
        assert_eq!(
            ids(RequisitionFilter {
                view: RequisitionView::All,
                dates: DateRange {
                    from: day(3),
                    to: day(4)
                },
            }),
            vec!["r4", "r3"]
        );
    }

    #[test]
    fn test_dashboard_summary_on_builtin_catalog() {
        let seed = SeedCatalog::builtin();
        let mut collections = Collections {
            items: seed.items,
            employees: seed.employees,
            tools: seed.tools,
            projects: seed.projects,
            ..Collections::default()
        };
        collections.requisitions = vec![
            requisition("r1", 1, None),
            requisition("r2", 2, Some(ErpDecision::Approved)),
        ];
        collections.tools[0].sync_status = ToolSyncStatus::PendingUpdate;
        collections.tools[0].condition = ToolCondition::Poor;

        let summary = dashboard_summary(&collections);
        assert_eq!(
            summary,
            DashboardSummary {
                active_projects: 2,
                open_requisitions: 1,
                low_stock_items: 1,
                tools_in_use: 1,
                tools_in_maintenance: 1,
                pending_syncs: 2,
            }
        );
    }
}
