//! # Directory
//!
//! The data-access layer: typed fetch operations over a [`TableStore`].
//!
//! Every operation follows the same shape:
//!
//! ```text
//! validate input ──✗──▶ Validation (no query issued)
//!       │
//!       ▼
//! base query ──(deadline)──▶ decode rows ──▶ keep active only
//!       │ empty? ──▶ []
//!       ▼
//! translation query ──(deadline)──▶ decode rows
//!       │
//!       ▼
//! merge (first matching translation wins, defaults otherwise)
//! ```
//!
//! Each public operation gets one deadline, `timeout` after it starts, and
//! every query it issues races that same deadline. Queries inside one
//! operation run sequentially. Nothing is retried here; a failed query fails
//! the whole operation, except a missing translation row on a single-record
//! lookup, which falls back to defaults.

mod error;

pub use error::DirectoryError;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info};
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use uuid::Uuid;

use crate::backend::{Query, StoreError, Table, TableStore};
use crate::core::merge::{merge_businesses, merge_categories, translate_business};
use crate::core::models::{
    Business, BusinessTranslation, BusinessWithTranslation, Category, CategoryTranslation,
    CategoryWithName, Language, TranslationMatch,
};
use crate::core::validation::{is_valid_uuid, sanitize_search_query, search_query_len};

/// Default time limit for one operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shorter search queries return no results without touching the backend.
pub const MIN_SEARCH_QUERY_LEN: usize = 2;

pub struct Directory {
    store: Arc<dyn TableStore>,
    timeout: Duration,
}

impl Directory {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self::with_timeout(store, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(store: Arc<dyn TableStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    // ------------------------------------------------------------------------
    // Query plumbing
    // ------------------------------------------------------------------------

    fn deadline(&self) -> Instant {
        Instant::now() + self.timeout
    }

    /// Runs one query against the operation deadline and decodes every row.
    async fn rows<T: DeserializeOwned>(
        &self,
        query: Query,
        deadline: Instant,
    ) -> Result<Vec<T>, DirectoryError> {
        let table = query.table();
        let raw = tokio::time::timeout_at(deadline, self.store.select(&query))
            .await
            .map_err(|_| DirectoryError::Timeout {
                table,
                after: self.timeout,
            })?
            .map_err(|e| DirectoryError::backend(table, e))?;

        debug!("{} returned {} rows", table, raw.len());

        raw.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    DirectoryError::backend(table, StoreError::Parse(format!("bad {table} row: {e}")))
                })
            })
            .collect()
    }

    /// Single-row variant: `NoRows` becomes `None`.
    async fn maybe_row<T: DeserializeOwned>(
        &self,
        query: Query,
        deadline: Instant,
    ) -> Result<Option<T>, DirectoryError> {
        match self.rows(query.single(), deadline).await {
            Ok(mut rows) => Ok(rows.pop()),
            Err(DirectoryError::Backend {
                source: StoreError::NoRows,
                ..
            }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn active_businesses(
        &self,
        query: Query,
        deadline: Instant,
    ) -> Result<Vec<Business>, DirectoryError> {
        let mut businesses: Vec<Business> =
            self.rows(query.eq("is_active", true), deadline).await?;
        let before = businesses.len();
        businesses.retain(|b| b.is_active);
        if businesses.len() != before {
            debug!("Dropped {} inactive rows", before - businesses.len());
        }
        Ok(businesses)
    }

    /// Fetches translations for `businesses` and merges. Empty input issues no query.
    async fn with_translations(
        &self,
        businesses: Vec<Business>,
        ids: &[Uuid],
        language: Language,
        deadline: Instant,
    ) -> Result<Vec<BusinessWithTranslation>, DirectoryError> {
        if businesses.is_empty() {
            return Ok(Vec::new());
        }
        let translations: Vec<BusinessTranslation> = self
            .rows(
                Query::from(Table::BusinessTranslations)
                    .in_list("business_id", ids)
                    .eq("language", language),
                deadline,
            )
            .await?;
        Ok(merge_businesses(businesses, &translations, language))
    }

    async fn categories(&self, deadline: Instant) -> Result<Vec<Category>, DirectoryError> {
        self.rows(Query::from(Table::Categories).order("created_at"), deadline)
            .await
    }

    async fn category_translations(
        &self,
        language: Language,
        deadline: Instant,
    ) -> Result<Vec<CategoryTranslation>, DirectoryError> {
        self.rows(
            Query::from(Table::CategoryTranslations).eq("language", language),
            deadline,
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Categories
    // ------------------------------------------------------------------------

    /// All categories, oldest first.
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, DirectoryError> {
        self.categories(self.deadline())
            .await
            .inspect_err(|e| log_api_error("fetch_categories", e))
    }

    pub async fn fetch_category_translations(
        &self,
        language: Language,
    ) -> Result<Vec<CategoryTranslation>, DirectoryError> {
        self.category_translations(language, self.deadline())
            .await
            .inspect_err(|e| log_api_error("fetch_category_translations", e))
    }

    /// Categories with their name in `language`, or the raw key when untranslated.
    pub async fn fetch_categories_with_translations(
        &self,
        language: Language,
    ) -> Result<Vec<CategoryWithName>, DirectoryError> {
        let deadline = self.deadline();
        let result: Result<Vec<CategoryWithName>, DirectoryError> = async {
            let categories = self.categories(deadline).await?;
            let translations = self.category_translations(language, deadline).await?;
            info!(
                "Merged {} categories with {} '{}' translations",
                categories.len(),
                translations.len(),
                language
            );
            Ok(merge_categories(categories, &translations, language))
        }
        .await;
        result.inspect_err(|e| log_api_error("fetch_categories_with_translations", e))
    }

    // ------------------------------------------------------------------------
    // Businesses
    // ------------------------------------------------------------------------

    /// Active businesses in one category, oldest first.
    pub async fn fetch_businesses_by_category(
        &self,
        category_id: &str,
        language: Language,
    ) -> Result<Vec<BusinessWithTranslation>, DirectoryError> {
        let deadline = self.deadline();
        let result: Result<Vec<BusinessWithTranslation>, DirectoryError> = async {
            let category_id = parse_id("category id", category_id)?;
            let businesses = self
                .active_businesses(
                    Query::from(Table::Businesses)
                        .eq("category_id", category_id)
                        .order("created_at"),
                    deadline,
                )
                .await?;
            let ids: Vec<Uuid> = businesses.iter().map(|b| b.id).collect();
            self.with_translations(businesses, &ids, language, deadline)
                .await
        }
        .await;
        result.inspect_err(|e| log_api_error("fetch_businesses_by_category", e))
    }

    /// One active business, or `None` when no active business has that id.
    pub async fn fetch_business_by_id(
        &self,
        business_id: &str,
        language: Language,
    ) -> Result<Option<BusinessWithTranslation>, DirectoryError> {
        let deadline = self.deadline();
        let result: Result<Option<BusinessWithTranslation>, DirectoryError> = async {
            let business_id = parse_id("business id", business_id)?;
            let business: Option<Business> = self
                .maybe_row(
                    Query::from(Table::Businesses)
                        .eq("id", business_id)
                        .eq("is_active", true),
                    deadline,
                )
                .await?;

            let Some(business) = business.filter(|b| b.is_active) else {
                debug!("No active business {business_id}");
                return Ok(None);
            };

            let translation: Option<BusinessTranslation> = self
                .maybe_row(
                    Query::from(Table::BusinessTranslations)
                        .eq("business_id", business_id)
                        .eq("language", language)
                        .limit(1),
                    deadline,
                )
                .await?;

            Ok(Some(translate_business(business, translation.as_ref())))
        }
        .await;
        result.inspect_err(|e| log_api_error("fetch_business_by_id", e))
    }

    /// Every active business, oldest first (map view).
    pub async fn fetch_all_businesses(
        &self,
        language: Language,
    ) -> Result<Vec<BusinessWithTranslation>, DirectoryError> {
        let deadline = self.deadline();
        let result: Result<Vec<BusinessWithTranslation>, DirectoryError> = async {
            let businesses = self
                .active_businesses(Query::from(Table::Businesses).order("created_at"), deadline)
                .await?;
            let ids: Vec<Uuid> = businesses.iter().map(|b| b.id).collect();
            self.with_translations(businesses, &ids, language, deadline)
                .await
        }
        .await;
        result.inspect_err(|e| log_api_error("fetch_all_businesses", e))
    }

    /// Active businesses whose name in `language` contains `query` (any case).
    ///
    /// Wildcards in `query` match literally and `*` is ignored. Queries shorter
    /// than two searchable characters return an empty list without a backend
    /// call.
    pub async fn search_businesses(
        &self,
        query: &str,
        language: Language,
    ) -> Result<Vec<BusinessWithTranslation>, DirectoryError> {
        let visible_len = search_query_len(query);
        if visible_len < MIN_SEARCH_QUERY_LEN {
            debug!("Search query too short ({visible_len} chars), skipping backend");
            return Ok(Vec::new());
        }
        let pattern = format!("%{}%", sanitize_search_query(query));
        let deadline = self.deadline();

        let result: Result<Vec<BusinessWithTranslation>, DirectoryError> = async {
            let matches: Vec<TranslationMatch> = self
                .rows(
                    Query::from(Table::BusinessTranslations)
                        .select("business_id")
                        .eq("language", language)
                        .ilike("name", &pattern),
                    deadline,
                )
                .await?;

            let mut ids: Vec<Uuid> = Vec::with_capacity(matches.len());
            for m in matches {
                if !ids.contains(&m.business_id) {
                    ids.push(m.business_id);
                }
            }
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let businesses = self
                .active_businesses(
                    Query::from(Table::Businesses)
                        .in_list("id", &ids)
                        .order("created_at"),
                    deadline,
                )
                .await?;
            info!(
                "Search '{}' matched {} names, {} active businesses",
                pattern,
                ids.len(),
                businesses.len()
            );
            self.with_translations(businesses, &ids, language, deadline)
                .await
        }
        .await;
        result.inspect_err(|e| log_api_error("search_businesses", e))
    }
}

fn parse_id(what: &str, value: &str) -> Result<Uuid, DirectoryError> {
    if !is_valid_uuid(value) {
        return Err(DirectoryError::Validation(format!("invalid {what}: '{value}'")));
    }
    Uuid::parse_str(value)
        .map_err(|e| DirectoryError::Validation(format!("invalid {what}: {e}")))
}

fn log_api_error(operation: &str, err: &DirectoryError) {
    match err {
        DirectoryError::Validation(msg) => debug!("{operation} rejected input: {msg}"),
        other => error!("API error in {operation}: {other}"),
    }
}
