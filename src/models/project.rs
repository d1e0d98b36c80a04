//! Construction projects (chantiers).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project progress status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Not started
    Draft,
    /// Work ongoing
    InProgress,
    /// Paused
    OnHold,
    /// Delivered
    Completed,
    /// Abandoned
    Cancelled,
}

impl ProjectStatus {
    /// French display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Brouillon",
            Self::InProgress => "En cours",
            Self::OnHold => "En pause",
            Self::Completed => "Terminé",
            Self::Cancelled => "Annulé",
        }
    }
}

/// A construction project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: String,
    /// Project name; also matched against movement destinations
    pub name: String,
    /// Project reference code (e.g. "CHA-2024-001")
    pub reference: String,
    /// Client name
    pub client_name: String,
    /// Site address
    pub address: String,
    /// Start date
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_date: DateTime<Utc>,
    /// End date, if known
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<DateTime<Utc>>,
    /// Progress status
    pub status: ProjectStatus,
    /// Budget in base currency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
}

/// Input for creating a project. `budget` is expressed in the display currency
/// selected at entry time and converted once on creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    /// Project name
    pub name: String,
    /// Reference code
    pub reference: String,
    /// Client name
    pub client_name: String,
    /// Site address
    pub address: String,
    /// Start date
    pub start_date: DateTime<Utc>,
    /// End date, if known
    pub end_date: Option<DateTime<Utc>>,
    /// Progress status
    pub status: ProjectStatus,
    /// Budget in the current display currency
    pub budget: Option<f64>,
}
