//! In-process table store over a JSON snapshot.
//!
//! Snapshot layout (every table optional):
//!
//! ```json
//! {
//!   "categories": [ { "id": "...", "name_key": "restaurants", ... } ],
//!   "category_translations": [ ... ],
//!   "businesses": [ ... ],
//!   "business_translations": [ ... ]
//! }
//! ```
//!
//! Queries are evaluated with the same semantics the PostgREST store relies on,
//! so the directory layer behaves identically against either store.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use log::{debug, info};
use serde_json::{Map, Value};

use super::query::{Filter, Query, Table};
use super::store::{StoreError, TableStore};

#[derive(Default)]
pub struct MemoryStore {
    tables: HashMap<Table, Vec<Value>>,
    queries: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a snapshot object keyed by table name.
    pub fn from_snapshot(snapshot: &Value) -> Result<Self, StoreError> {
        let object = snapshot
            .as_object()
            .ok_or_else(|| StoreError::Parse("snapshot must be a JSON object".to_string()))?;

        let mut store = Self::new();
        for table in Table::ALL {
            match object.get(table.as_str()) {
                Some(Value::Array(rows)) => store = store.with_rows(table, rows.clone()),
                Some(_) => {
                    return Err(StoreError::Parse(format!(
                        "snapshot table '{table}' must be an array"
                    )));
                }
                None => {}
            }
        }
        Ok(store)
    }

    /// Reads a snapshot file from disk.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| StoreError::Config(format!("{}: {e}", path.display())))?;
        let snapshot: Value =
            serde_json::from_str(&contents).map_err(|e| StoreError::Parse(e.to_string()))?;
        let store = Self::from_snapshot(&snapshot)?;
        info!("Loaded table snapshot from {}", path.display());
        Ok(store)
    }

    pub fn with_rows(mut self, table: Table, rows: Vec<Value>) -> Self {
        self.tables.entry(table).or_default().extend(rows);
        self
    }

    /// Number of selects answered so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);

        let rows = self
            .tables
            .get(&query.table())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut matched: Vec<&Value> = rows
            .iter()
            .filter(|row| query.filters().iter().all(|f| filter_matches(f, row)))
            .collect();

        if let Some(column) = query.order_column() {
            // Stable sort keeps snapshot order among equal keys.
            matched.sort_by(|a, b| compare_values(a.get(column), b.get(column)));
        }
        if let Some(limit) = query.row_limit() {
            matched.truncate(limit);
        }

        debug!(
            "Memory select on {} matched {} rows",
            query.table(),
            matched.len()
        );

        if query.is_single() && matched.len() != 1 {
            return Err(StoreError::NoRows);
        }

        Ok(matched
            .into_iter()
            .map(|row| project(row, query.columns()))
            .collect())
    }
}

fn filter_matches(filter: &Filter, row: &Value) -> bool {
    match filter {
        Filter::Eq { column, value } => row
            .get(column)
            .is_some_and(|cell| cell_text(cell).as_deref() == Some(value.as_str())),
        Filter::In { column, values } => row.get(column).is_some_and(|cell| {
            cell_text(cell).is_some_and(|text| values.iter().any(|v| *v == text))
        }),
        Filter::ILike { column, pattern } => row
            .get(column)
            .and_then(Value::as_str)
            .is_some_and(|text| like_matches(pattern, text)),
    }
}

/// Text form of a scalar cell, as PostgREST compares filter values.
fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        // Nulls sort last, as with Postgres ascending order.
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }
    let mut out = Map::new();
    for column in columns.split(',').map(str::trim) {
        if let Some(value) = row.get(column) {
            out.insert(column.to_string(), value.clone());
        }
    }
    Value::Object(out)
}

#[derive(Debug, PartialEq)]
enum LikeToken {
    Literal(char),
    AnyOne,
    AnyMany,
}

fn tokenize_like(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => tokens.push(LikeToken::Literal(chars.next().unwrap_or('\\'))),
            '%' | '*' => tokens.push(LikeToken::AnyMany),
            '_' => tokens.push(LikeToken::AnyOne),
            other => tokens.push(LikeToken::Literal(other)),
        }
    }
    tokens
}

/// Case-insensitive SQL `LIKE` match. `*` is a `%` alias, as in PostgREST.
pub fn like_matches(pattern: &str, text: &str) -> bool {
    let tokens = tokenize_like(&pattern.to_lowercase());
    let text: Vec<char> = text.to_lowercase().chars().collect();

    // reachable[j]: the tokens consumed so far can match text[..j]
    let mut reachable = vec![false; text.len() + 1];
    reachable[0] = true;

    for token in &tokens {
        let mut next = vec![false; text.len() + 1];
        match token {
            LikeToken::AnyMany => {
                let mut seen = false;
                for j in 0..=text.len() {
                    seen |= reachable[j];
                    next[j] = seen;
                }
            }
            LikeToken::AnyOne => {
                for j in 0..text.len() {
                    next[j + 1] = reachable[j];
                }
            }
            LikeToken::Literal(c) => {
                for j in 0..text.len() {
                    next[j + 1] = reachable[j] && text[j] == *c;
                }
            }
        }
        reachable = next;
    }

    reachable[text.len()]
}
