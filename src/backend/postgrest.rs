//! PostgREST table store (the REST interface of a hosted Postgres project).
//!
//! Wire conventions used here:
//! - tables live under `<base>/rest/v1/<table>`
//! - the anon key goes in both `apikey` and `Authorization: Bearer`
//! - single-row reads ask for `application/vnd.pgrst.object+json`; when the
//!   filter matches nothing the server answers 406 with code `PGRST116`

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;

use super::query::Query;
use super::store::{NO_ROWS_CODE, StoreError, TableStore};

const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// Error body returned by PostgREST on failure.
#[derive(Deserialize, Debug)]
struct PostgrestErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Option<String>,
}

pub struct PostgrestStore {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl PostgrestStore {
    /// Creates a new PostgREST store.
    ///
    /// # Arguments
    /// * `project_url` - Project URL (`https://xyz.supabase.co`) or a URL that
    ///   already ends in `/rest/v1`
    /// * `anon_key` - Public anon key used for both auth headers
    pub fn new(project_url: &str, anon_key: String) -> Result<Self, StoreError> {
        if project_url.trim().is_empty() {
            return Err(StoreError::Config("backend URL is empty".to_string()));
        }
        if anon_key.trim().is_empty() {
            return Err(StoreError::Config("backend anon key is empty".to_string()));
        }

        Ok(Self {
            base_url: normalize_base_url(project_url),
            anon_key,
            client: reqwest::Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turns a non-2xx response into a `StoreError`, recognizing "no rows".
    async fn error_from_response(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());

        match serde_json::from_str::<PostgrestErrorBody>(&body) {
            Ok(err) if err.code.as_deref() == Some(NO_ROWS_CODE) => {
                debug!("PostgREST reported no rows: {:?}", err.details);
                StoreError::NoRows
            }
            Ok(err) => {
                warn!("PostgREST error: {} {:?} - {}", status, err.code, err.message);
                StoreError::Api {
                    status,
                    code: err.code,
                    message: err.message,
                }
            }
            Err(_) => {
                warn!("PostgREST error: {} - {}", status, body);
                StoreError::Api {
                    status,
                    code: None,
                    message: body,
                }
            }
        }
    }
}

#[async_trait]
impl TableStore for PostgrestStore {
    fn name(&self) -> &str {
        "postgrest"
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let url = format!("{}/{}", self.base_url, query.table());
        let params = query.to_params();

        info!(
            "PostgREST select: table={}, filters={}, single={}",
            query.table(),
            query.filters().len(),
            query.is_single()
        );

        let mut request = self
            .client
            .get(&url)
            .query(&params)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key));

        if query.is_single() {
            request = request.header("Accept", SINGLE_OBJECT_MEDIA_TYPE);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        debug!("PostgREST response status: {}", response.status());

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        if query.is_single() {
            let row: Value = response
                .json()
                .await
                .map_err(|e| StoreError::Parse(e.to_string()))?;
            return Ok(vec![row]);
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        debug!("PostgREST returned {} rows from {}", rows.len(), query.table());
        Ok(rows)
    }
}

fn normalize_base_url(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.ends_with("/rest/v1") {
        trimmed.to_string()
    } else {
        format!("{}/rest/v1", trimmed)
    }
}
