//! Domain error types
//!
//! A closed set of failure kinds; every batch entry point maps internal
//! failures to one of these before reporting. Nothing is retried.

use std::fmt;

#[derive(Debug)]
pub enum ReportError {
    /// Store access failed (connection, open, query)
    Store(String),
    /// An expected field was absent or undecodable after the join
    DataShape(String),
    /// A schema constraint rejected a write
    Constraint(String),
    /// Anything else (I/O, rendering, regression)
    Unexpected(String),
}

impl ReportError {
    /// Short label for structured log events.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Store(_) => "store",
            ReportError::DataShape(_) => "data-shape",
            ReportError::Constraint(_) => "constraint",
            ReportError::Unexpected(_) => "unexpected",
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Store(msg) => write!(f, "Store error: {}", msg),
            ReportError::DataShape(msg) => write!(f, "Data shape error: {}", msg),
            ReportError::Constraint(msg) => write!(f, "Constraint violation: {}", msg),
            ReportError::Unexpected(msg) => write!(f, "Unexpected error: {}", msg),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<sea_orm::DbErr> for ReportError {
    fn from(e: sea_orm::DbErr) -> Self {
        let msg = e.to_string();
        // SQLite phrases every CHECK/UNIQUE/NOT NULL/FOREIGN KEY rejection
        // as "... constraint failed".
        if msg.contains("constraint failed") {
            ReportError::Constraint(msg)
        } else {
            ReportError::Store(msg)
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(e: std::io::Error) -> Self {
        ReportError::Unexpected(e.to_string())
    }
}
