//! Printable vouchers.
//!
//! Plain-text documents the storekeeper prints and has signed: a stock exit
//! voucher for material leaving the store, and a requisition voucher for a
//! purchase request. Labels are French, as printed on site.

use crate::{
    core::report::UNKNOWN_LABEL,
    models::{Item, PurchaseRequisition, StockMovement},
};
use chrono::{DateTime, Utc};

const RULE: &str = "----------------------------------------";

/// Body returned when the exit voucher has nothing to print.
pub const EXIT_VOUCHER_NOT_FOUND: &str = "Bon de sortie non trouvé.";

/// Body returned when the requisition voucher has nothing to print.
pub const REQUISITION_VOUCHER_NOT_FOUND: &str = "Bon de réquisition non trouvé.";

/// Last six characters of an id, used as the short voucher number.
fn short_number(id: &str) -> &str {
    let start = id
        .char_indices()
        .rev()
        .nth(5)
        .map_or(0, |(index, _)| index);
    &id[start..]
}

fn item_name<'a>(items: &'a [Item], id: &str) -> &'a str {
    items
        .iter()
        .find(|i| i.id == id)
        .map_or(UNKNOWN_LABEL, |i| i.name.as_str())
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y").to_string()
}

fn signature_block() -> String {
    format!("{RULE}\nSignature (Magasinier):\nSignature (Chef de Site):")
}

fn voucher_line(item_name: &str, quantity: i64) -> String {
    format!("{item_name} | {quantity}\n")
}

/// Renders the exit voucher for `movement`.
///
/// # Arguments
/// * `movement` - The movement to print, `None` when the id did not resolve
/// * `items` - Current items, used to name the moved item
///
/// # Returns
/// The voucher text, or [`EXIT_VOUCHER_NOT_FOUND`].
#[must_use]
pub fn render_stock_exit_voucher(movement: Option<&StockMovement>, items: &[Item]) -> String {
    let Some(movement) = movement else {
        return EXIT_VOUCHER_NOT_FOUND.to_string();
    };

    let mut out = format!(
        "BON DE SORTIE MATÉRIEL\n{RULE}\n\
         N° Bon : {}\n\
         Date : {}\n\
         Destination : {}\n\
         Opérateur : {}\n\
         {RULE}\n\
         Article | Quantité\n",
        short_number(&movement.id),
        format_date(movement.timestamp),
        movement.counterparty,
        movement.operator,
    );
    out.push_str(&voucher_line(
        item_name(items, &movement.item_id),
        movement.quantity,
    ));
    out.push_str(&signature_block());
    out
}

/// Renders the requisition voucher for `requisition`, one row per requested line.
///
/// # Arguments
/// * `requisition` - The requisition to print, `None` when the id did not resolve
/// * `items` - Current items, used to name the requested items
///
/// # Returns
/// The voucher text, or [`REQUISITION_VOUCHER_NOT_FOUND`].
#[must_use]
pub fn render_requisition_voucher(
    requisition: Option<&PurchaseRequisition>,
    items: &[Item],
) -> String {
    let Some(requisition) = requisition else {
        return REQUISITION_VOUCHER_NOT_FOUND.to_string();
    };

    let mut out = format!(
        "BON DE RÉQUISITION MATÉRIEL\n{RULE}\n\
         N° Demande : {}\n\
         Date : {}\n\
         Demandeur : {}\n\
         {RULE}\n\
         Article | Quantité Demandée\n",
        short_number(&requisition.id),
        format_date(requisition.timestamp),
        requisition.requester,
    );
    for line in &requisition.items {
        out.push_str(&voucher_line(item_name(items, &line.item_id), line.quantity));
    }
    out.push_str(&signature_block());
    out
}
