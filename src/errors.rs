//! Unified error type for the site stock core.
//!
//! Most failures in this crate are absorbed where they happen (persistence is
//! write-through and best effort, dangling lookups return `None`), so the variants
//! here cover what callers can actually observe: configuration problems, database
//! setup, serialization, and rejected tool actions.

use thiserror::Error;

/// All errors surfaced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Underlying `SeaORM` / `SQLite` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A collection could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A tool action was requested from a status that does not allow it
    #[error("Tool {tool_id} cannot {action} while {from}")]
    InvalidToolTransition {
        /// Tool the action targeted
        tool_id: String,
        /// Operational status at the time of the request
        from: String,
        /// Name of the rejected action
        action: String,
    },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
