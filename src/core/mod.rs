//! Core business logic: the site store, record lifecycles, the simulated sync,
//! and the reporting views built on top of them.

/// Biometric attendance export parsing
pub mod attendance_import;
/// State transitions for every record type
pub mod lifecycle;
/// Write-through persistence of whole collections
pub mod persistence;
/// Derived views: valuation, costs, filters, dashboard
pub mod report;
/// The in-memory store and its domain operations
pub mod store;
/// Periodic simulated upstream sync
pub mod sync;
/// Printable stock exit and requisition vouchers
pub mod voucher;
