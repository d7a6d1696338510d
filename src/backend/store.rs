use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::query::Query;

/// PostgREST error code for "the result contains 0 rows" on a single-object request.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Errors that can occur while talking to the table store.
#[derive(Debug)]
pub enum StoreError {
    /// Store misconfigured (missing URL or key). Not retryable.
    Config(String),
    /// Network-level failure (DNS, connection refused, reset).
    Network(String),
    /// The store answered with an error response.
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    /// A response body or row did not match the expected shape.
    Parse(String),
    /// A single-row request matched no row.
    NoRows,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Config(msg) => write!(f, "config error: {msg}"),
            StoreError::Network(msg) => write!(f, "network error: {msg}"),
            StoreError::Api {
                status,
                code: Some(code),
                message,
            } => write!(f, "API error (HTTP {status}, {code}): {message}"),
            StoreError::Api {
                status,
                code: None,
                message,
            } => write!(f, "API error (HTTP {status}): {message}"),
            StoreError::Parse(msg) => write!(f, "parse error: {msg}"),
            StoreError::NoRows => write!(f, "no rows returned"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A remote (or in-process) table store that answers filtered selects.
///
/// Rows come back as raw JSON; decoding into typed records happens in the
/// directory layer so every implementation shares one contract.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Returns the name of the store.
    fn name(&self) -> &str;

    /// Runs a select and returns the matching rows.
    ///
    /// For single-row queries ([`Query::single`]) the result holds exactly one
    /// row, or the call fails with [`StoreError::NoRows`].
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;
}
