//! Hosted backend client
//!
//! Speaks the PostgREST dialect exposed by the hosted backend:
//! `POST/PATCH/DELETE/GET {url}/rest/v1/{table}` with `column=eq.value`
//! filters. Table rows use snake_case column names; the dashboard's JSON
//! shape uses a few camelCase keys, remapped in both directions here.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::RemoteStore;
use crate::error::RemoteError;
use crate::models::{Project, ProjectDraft, ProjectPatch, ProjectQuery, QueryOrder};
use crate::utils::http::{rate_limiters, with_retry, RetryConfig};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Dashboard key to table column
const COLUMN_RENAMES: [(&str, &str); 3] = [
    ("primaryUrl", "primary_url"),
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
];

/// Rename dashboard keys to table columns
fn to_row(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| {
                    let column = COLUMN_RENAMES
                        .iter()
                        .find(|(from, _)| *from == key)
                        .map(|(_, to)| to.to_string())
                        .unwrap_or(key);
                    (column, v)
                })
                .collect(),
        ),
        other => other,
    }
}

/// Rename table columns to dashboard keys. Null columns are dropped so that
/// the field defaults apply.
fn from_row(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(column, v)| {
                    let key = COLUMN_RENAMES
                        .iter()
                        .find(|(_, to)| *to == column)
                        .map(|(from, _)| from.to_string())
                        .unwrap_or(column);
                    (key, v)
                })
                .collect(),
        ),
        other => other,
    }
}

/// Patch body with table column names. Blank text clears its column, the
/// same way [`ProjectPatch::apply`] clears the local field.
fn patch_row(patch: &ProjectPatch) -> Result<Value, RemoteError> {
    let value = serde_json::to_value(patch).map_err(|e| RemoteError::Decode(e.to_string()))?;
    let cleared = match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| match v {
                    Value::String(s) if s.trim().is_empty() => (key, Value::Null),
                    other => (key, other),
                })
                .collect(),
        ),
        other => other,
    };
    Ok(to_row(cleared))
}

fn decode_project(row: Value) -> Result<Project, RemoteError> {
    serde_json::from_value(from_row(row)).map_err(|e| RemoteError::Decode(e.to_string()))
}

fn order_clause(order: QueryOrder) -> &'static str {
    match order {
        QueryOrder::CreatedDesc => "created_at.desc",
        QueryOrder::DisplayOrder => "display_order.asc.nullslast,created_at.desc",
    }
}

/// Connection details for the hosted backend
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub url: String,
    pub anon_key: String,
    /// Session token of the signed-in user. Without it requests run as anon.
    pub access_token: Option<String>,
    /// Attached to inserts so row-level ownership checks pass
    pub user_id: Option<String>,
    pub table: String,
}

/// Client for the hosted backend's REST interface
pub struct RestBackend {
    client: Client,
    config: RestConfig,
}

impl RestBackend {
    pub fn new(config: RestConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| RemoteError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a new client with an existing reqwest client
    pub fn with_client(client: Client, config: RestConfig) -> Self {
        Self { client, config }
    }

    /// Swap the session token after a sign-in or token refresh
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.config.access_token = token;
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }

    fn id_filter_url(&self, id: &str) -> String {
        format!("{}?id=eq.{}", self.table_url(), urlencoding::encode(id))
    }

    fn query_url(&self, query: &ProjectQuery) -> String {
        let mut url = format!("{}?select=*&order={}", self.table_url(), order_clause(query.order));
        if let Some(status) = query.status {
            url.push_str(&format!("&status=eq.{}", urlencoding::encode(status.as_str())));
        }
        url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self
            .config
            .access_token
            .as_deref()
            .unwrap_or(&self.config.anon_key);

        self.client
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Send a request with retry, returning the response body on 2xx
    async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
        prefer: &'static str,
        retry: &RetryConfig,
    ) -> Result<String, RemoteError> {
        rate_limiters::BACKEND.wait_for_slot("backend").await;

        with_retry(
            retry,
            &format!("{} {}", method, url),
            || {
                let mut req = self.request(method.clone(), &url).header("Prefer", prefer);
                if let Some(body) = &body {
                    req = req.json(body);
                }
                async move {
                    let resp = req
                        .send()
                        .await
                        .map_err(|e| RemoteError::Network(e.to_string()))?;

                    let status = resp.status();
                    let text = resp
                        .text()
                        .await
                        .map_err(|e| RemoteError::Network(e.to_string()))?;

                    if !status.is_success() {
                        return Err(RemoteError::Status {
                            status: status.as_u16(),
                            body: text,
                        });
                    }
                    Ok(text)
                }
            },
            RemoteError::is_retryable,
        )
        .await
    }

    fn insert_body(&self, draft: &ProjectDraft) -> Result<Value, RemoteError> {
        let mut row = to_row(
            serde_json::to_value(draft).map_err(|e| RemoteError::Decode(e.to_string()))?,
        );
        if let (Some(user_id), Value::Object(map)) = (&self.config.user_id, &mut row) {
            map.insert("user_id".to_string(), Value::String(user_id.clone()));
        }
        Ok(row)
    }
}

#[async_trait]
impl RemoteStore for RestBackend {
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        let body = self.insert_body(draft)?;

        // Inserts are not idempotent, never retried
        let text = self
            .send(
                Method::POST,
                self.table_url(),
                Some(body),
                "return=representation",
                &RetryConfig::none(),
            )
            .await?;

        let rows: Vec<Value> =
            serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::Rejected("insert returned no row".to_string()))?;

        let project = decode_project(row)?;
        debug!("Backend assigned id {} to '{}'", project.id, project.name);
        Ok(project)
    }

    async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<(), RemoteError> {
        let body = patch_row(patch)?;
        self.send(
            Method::PATCH,
            self.id_filter_url(id),
            Some(body),
            "return=minimal",
            &RetryConfig::default(),
        )
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.send(
            Method::DELETE,
            self.id_filter_url(id),
            None,
            "return=minimal",
            &RetryConfig::default(),
        )
        .await?;
        Ok(())
    }

    async fn query(&self, query: &ProjectQuery) -> Result<Vec<Project>, RemoteError> {
        let text = self
            .send(
                Method::GET,
                self.query_url(query),
                None,
                "count=none",
                &RetryConfig::default(),
            )
            .await?;

        let rows: Vec<Value> =
            serde_json::from_str(&text).map_err(|e| RemoteError::Decode(e.to_string()))?;
        rows.into_iter().map(decode_project).collect()
    }
}
