//! # Query Model
//!
//! A small, store-agnostic description of a filtered select. `PostgrestStore`
//! encodes it as PostgREST query parameters; `MemoryStore` evaluates it over
//! JSON rows directly.
//!
//! ```text
//! Query::from(Table::Businesses)
//!     .eq("category_id", id)
//!     .eq("is_active", "true")
//!     .order("created_at")
//!
//!   → GET /businesses?select=*&category_id=eq.<id>&is_active=eq.true&order=created_at.asc
//! ```

use std::fmt;

/// The four tables the directory reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Categories,
    CategoryTranslations,
    Businesses,
    BusinessTranslations,
}

impl Table {
    pub const ALL: [Table; 4] = [
        Table::Categories,
        Table::CategoryTranslations,
        Table::Businesses,
        Table::BusinessTranslations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Categories => "categories",
            Table::CategoryTranslations => "category_translations",
            Table::Businesses => "businesses",
            Table::BusinessTranslations => "business_translations",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single column predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: String },
    /// `column IN (values...)`
    In { column: String, values: Vec<String> },
    /// Case-insensitive LIKE. `%` (or `*`) and `_` are wildcards, `\` escapes.
    ILike { column: String, pattern: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: Table,
    columns: String,
    filters: Vec<Filter>,
    order: Option<String>,
    limit: Option<usize>,
    single: bool,
}

impl From<Table> for Query {
    fn from(table: Table) -> Self {
        Self {
            table,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            single: false,
        }
    }
}

impl Query {
    /// Restricts the returned columns (comma separated, PostgREST syntax).
    pub fn select(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn in_list<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.filters.push(Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(|v| v.to_string()).collect(),
        });
        self
    }

    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.filters.push(Filter::ILike {
            column: column.to_string(),
            pattern: pattern.to_string(),
        });
        self
    }

    /// Ascending order by `column`.
    pub fn order(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Requests exactly one row; zero rows is reported as `StoreError::NoRows`.
    pub fn single(mut self) -> Self {
        self.single = true;
        self
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn columns(&self) -> &str {
        &self.columns
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order_column(&self) -> Option<&str> {
        self.order.as_deref()
    }

    pub fn row_limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    /// Encodes the query as PostgREST URL parameters (unescaped; the HTTP
    /// client percent-encodes them).
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];

        for filter in &self.filters {
            let (column, expr) = match filter {
                Filter::Eq { column, value } => (column, format!("eq.{value}")),
                Filter::In { column, values } => {
                    let list: Vec<String> = values.iter().map(|v| quote_list_item(v)).collect();
                    (column, format!("in.({})", list.join(",")))
                }
                Filter::ILike { column, pattern } => (column, format!("ilike.{pattern}")),
            };
            params.push((column.clone(), expr));
        }

        if let Some(ref column) = self.order {
            params.push(("order".to_string(), format!("{column}.asc")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// PostgREST list items containing reserved characters must be double-quoted.
fn quote_list_item(value: &str) -> String {
    if value.contains([',', '(', ')', '"', '\\']) {
        let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}
