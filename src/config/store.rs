//! Record store configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How the reconciler writes to the record store.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Targeted update, falling back to insert.
    #[default]
    UpdateThenInsert,
    /// Single `on_conflict` upsert.
    NativeUpsert,
    /// Process-local store; nothing is persisted.
    InMemory,
}

/// Record store configuration (PostgREST / Supabase)
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// API key sent as `apikey` and bearer token
    pub api_key: Option<SecretString>,

    /// Table holding one row per phone number
    #[serde(default = "default_table")]
    pub table: String,

    /// Write strategy
    #[serde(default)]
    pub write_mode: WriteMode,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Get outbound timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate store configuration
    pub fn validate(&self, require_https: bool) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidStoreTimeout);
        }
        if self.write_mode == WriteMode::InMemory {
            return Ok(());
        }

        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("STORE__URL"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidStoreUrl);
        }
        if require_https && !self.url.starts_with("https://") {
            return Err(ValidationError::StoreUrlMustBeHttps);
        }

        let has_key = self
            .api_key
            .as_ref()
            .map(|key| !key.expose_secret().is_empty())
            .unwrap_or(false);
        if !has_key {
            return Err(ValidationError::MissingRequired("STORE__API_KEY"));
        }
        if self.table.is_empty() {
            return Err(ValidationError::MissingRequired("STORE__TABLE"));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            table: default_table(),
            write_mode: WriteMode::default(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_table() -> String {
    "users".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> StoreConfig {
        StoreConfig {
            url: "https://project.supabase.co".to_string(),
            api_key: Some(SecretString::new("service-key".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_store_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.table, "users");
        assert_eq!(config.write_mode, WriteMode::UpdateThenInsert);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate(true).is_ok());
    }

    #[test]
    fn test_validation_missing_url() {
        let config = StoreConfig {
            url: String::new(),
            ..valid()
        };
        assert_eq!(
            config.validate(false),
            Err(ValidationError::MissingRequired("STORE__URL"))
        );
    }

    #[test]
    fn test_validation_invalid_url_scheme() {
        let config = StoreConfig {
            url: "ftp://project.supabase.co".to_string(),
            ..valid()
        };
        assert_eq!(config.validate(false), Err(ValidationError::InvalidStoreUrl));
    }

    #[test]
    fn test_validation_https_required_in_production() {
        let config = StoreConfig {
            url: "http://localhost:54321".to_string(),
            ..valid()
        };
        assert!(config.validate(false).is_ok());
        assert_eq!(config.validate(true), Err(ValidationError::StoreUrlMustBeHttps));
    }

    #[test]
    fn test_validation_missing_api_key() {
        let config = StoreConfig {
            api_key: Some(SecretString::new(String::new())),
            ..valid()
        };
        assert_eq!(
            config.validate(false),
            Err(ValidationError::MissingRequired("STORE__API_KEY"))
        );
    }

    #[test]
    fn test_in_memory_needs_no_credentials() {
        let config = StoreConfig {
            write_mode: WriteMode::InMemory,
            ..Default::default()
        };
        assert!(config.validate(true).is_ok());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = StoreConfig {
            timeout_secs: 0,
            ..valid()
        };
        assert_eq!(config.validate(false), Err(ValidationError::InvalidStoreTimeout));
    }
}
