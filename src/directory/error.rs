use std::fmt;
use std::time::Duration;

use crate::backend::{StoreError, Table};

/// Failure of a directory operation.
#[derive(Debug)]
pub enum DirectoryError {
    /// Malformed identifier or query. Raised before any backend call.
    Validation(String),
    /// A backend query did not answer within the configured interval.
    Timeout { table: Table, after: Duration },
    /// The backend rejected or failed a query, or returned rows that did not decode.
    Backend { table: Table, source: StoreError },
}

impl DirectoryError {
    pub fn backend(table: Table, source: StoreError) -> Self {
        DirectoryError::Backend { table, source }
    }
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryError::Validation(msg) => write!(f, "validation error: {msg}"),
            DirectoryError::Timeout { table, after } => {
                write!(f, "request to '{table}' timed out after {}ms", after.as_millis())
            }
            DirectoryError::Backend { table, source } => {
                write!(f, "backend error on '{table}': {source}")
            }
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryError::Backend { source, .. } => Some(source),
            _ => None,
        }
    }
}
