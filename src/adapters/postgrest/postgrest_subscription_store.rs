//! PostgREST subscription store adapter.
//!
//! Implements `SubscriptionStore` against a PostgREST endpoint (Supabase's
//! `/rest/v1` API). Rows live in one table keyed by a unique
//! `phone_number` column.
//!
//! # Configuration
//!
//! ```ignore
//! let config = PostgrestConfig::new("https://project.supabase.co", api_key)
//!     .with_table("users")
//!     .with_timeout(Duration::from_secs(10));
//! let store = PostgrestSubscriptionStore::new(config)?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};

use super::row::SubscriptionRow;
use crate::domain::foundation::PhoneNumber;
use crate::domain::subscription::SubscriptionRecord;
use crate::ports::{StoreError, SubscriptionStore, UpdateResult};

const PREFER: &str = "Prefer";
const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MINIMAL: &str = "return=minimal";
const PREFER_MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=minimal";

const KEY_COLUMN: &str = "phone_number";

/// PostgREST connection configuration.
#[derive(Clone)]
pub struct PostgrestConfig {
    /// Project base URL, without the `/rest/v1` suffix.
    base_url: String,

    /// Service or anon key, sent as `apikey` and bearer token.
    api_key: SecretString,

    /// Table holding subscription rows.
    table: String,

    /// Upper bound for each outbound request.
    timeout: Duration,

    /// Use `on_conflict` upserts instead of update-then-insert.
    native_upsert: bool,
}

impl PostgrestConfig {
    /// Create a configuration with the default table (`users`) and a
    /// 10 second timeout.
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            table: "users".to_string(),
            timeout: Duration::from_secs(10),
            native_upsert: false,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_native_upsert(mut self, enabled: bool) -> Self {
        self.native_upsert = enabled;
        self
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }
}

/// Subscription store backed by PostgREST.
pub struct PostgrestSubscriptionStore {
    config: PostgrestConfig,
    http_client: reqwest::Client,
}

impl PostgrestSubscriptionStore {
    /// Create a new adapter. Every request carries the API key headers and
    /// is bounded by the configured timeout.
    pub fn new(config: PostgrestConfig) -> Result<Self, StoreError> {
        let key = config.api_key.expose_secret();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|_| StoreError::Transport("API key is not a valid header value".to_string()))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key))
            .map_err(|_| StoreError::Transport("API key is not a valid header value".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn key_filter(phone_number: &PhoneNumber) -> [(&'static str, String); 1] {
        [(KEY_COLUMN, format!("eq.{}", phone_number))]
    }

    /// Maps a non-success response to a store error.
    async fn error_from(response: Response, operation: &'static str) -> StoreError {
        let status = response.status();
        let message = response.text().await.unwrap_or_default();
        tracing::warn!(
            operation,
            status = status.as_u16(),
            error = %message,
            "Record store rejected request"
        );
        match status {
            StatusCode::NOT_FOUND => StoreError::NotFound,
            StatusCode::CONFLICT => StoreError::Conflict,
            _ => StoreError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }
}

fn transport(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Transport(format!("Request timed out: {}", e))
    } else {
        StoreError::Transport(e.to_string())
    }
}

#[async_trait]
impl SubscriptionStore for PostgrestSubscriptionStore {
    async fn update_by_phone(&self, record: &SubscriptionRecord) -> Result<UpdateResult, StoreError> {
        let response = self
            .http_client
            .patch(self.config.table_url())
            .query(&Self::key_filter(&record.phone_number))
            .header(PREFER, PREFER_REPRESENTATION)
            .json(&SubscriptionRow::from(record))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "update").await);
        }

        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("Failed to parse update response: {}", e)))?;

        if rows.is_empty() {
            Ok(UpdateResult::NotFound)
        } else {
            Ok(UpdateResult::Updated)
        }
    }

    async fn insert(&self, record: &SubscriptionRecord) -> Result<(), StoreError> {
        let response = self
            .http_client
            .post(self.config.table_url())
            .header(PREFER, PREFER_MINIMAL)
            .json(&SubscriptionRow::from(record))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "insert").await);
        }
        Ok(())
    }

    fn supports_native_upsert(&self) -> bool {
        self.config.native_upsert
    }

    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), StoreError> {
        let response = self
            .http_client
            .post(self.config.table_url())
            .query(&[("on_conflict", KEY_COLUMN)])
            .header(PREFER, PREFER_MERGE_DUPLICATES)
            .json(&SubscriptionRow::from(record))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "upsert").await);
        }
        Ok(())
    }

    async fn find_by_phone(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<Option<SubscriptionRecord>, StoreError> {
        let response = self
            .http_client
            .get(self.config.table_url())
            .query(&Self::key_filter(phone_number))
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "find").await);
        }

        let rows: Vec<SubscriptionRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("Failed to parse rows: {}", e)))?;

        rows.into_iter()
            .next()
            .map(SubscriptionRecord::try_from)
            .transpose()
    }
}
