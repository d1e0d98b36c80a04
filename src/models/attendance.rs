//! Attendance records imported from biometric terminals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an attendance record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    /// Imported, awaiting validation by the site manager
    Pending,
    /// Validated, waiting for the next sync
    Validated,
    /// Pushed upstream
    Synced,
}

/// One check-in / check-out pair for an employee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Unique identifier
    pub id: String,
    /// Employee the record belongs to (may dangle)
    pub employee_id: String,
    /// Check-in time
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub check_in: DateTime<Utc>,
    /// Check-out time
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub check_out: DateTime<Utc>,
    /// Hours between check-in and check-out, as imported (sign not checked)
    pub worked_hours: f64,
    /// Lifecycle status
    pub status: AttendanceStatus,
    /// Site the terminal is installed on
    pub site_id: String,
    /// Terminal that produced the record
    #[serde(rename = "biometricDeviceId")]
    pub device_id: String,
}

/// An attendance record as parsed from an import file, before it gets an id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewAttendance {
    /// Employee identifier from the terminal
    pub employee_id: String,
    /// Check-in time
    pub check_in: DateTime<Utc>,
    /// Check-out time
    pub check_out: DateTime<Utc>,
    /// Hours worked
    pub worked_hours: f64,
    /// Site identifier
    pub site_id: String,
    /// Terminal identifier
    pub device_id: String,
}
